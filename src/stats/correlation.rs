//! Pairwise Pearson correlation matrices.
//!
//! Correlation is computed once per query from a *separately prepared* base
//! table (positive GI and positive TM only, independent of which cleaning
//! stage is being displayed), over six variables: the three sensors plus the
//! day/hour/month grouping keys. Both the 3-variable sensor matrix and the
//! full 6-variable matrix come from the same complete-row set — the derived
//! keys can never be missing, so completeness is decided by the sensors.

use chrono::Datelike;
use nalgebra::DMatrix;

use crate::domain::{CorrelationMatrix, Record, RecordTable};

/// Variables of the full matrix, in emission order.
const FULL_VARS: [&str; 6] = ["EAC", "GI", "TM", "day", "hour", "month"];

/// Sensor-only variables (a prefix of `FULL_VARS`).
const SENSOR_VARS: usize = 3;

/// Both correlation matrices of one query.
#[derive(Debug, Clone, Default)]
pub struct CorrelationPair {
    pub sensor: CorrelationMatrix,
    pub full: CorrelationMatrix,
}

/// Prepare the correlation base table: keep only rows with GI > 0 and TM > 0.
pub fn correlation_base(table: &RecordTable) -> RecordTable {
    let mut base = table.clone();
    base.retain(|row| row.gi.is_some_and(|gi| gi > 0.0) && row.tm.is_some_and(|tm| tm > 0.0));
    base
}

/// Compute the sensor-only and full matrices from the base table.
///
/// Rows missing any of the six variables are dropped; with fewer than 2
/// complete rows both matrices are empty. Non-finite coefficients (from
/// zero-variance columns) are emitted as null.
pub fn correlation_pair(base: &RecordTable) -> CorrelationPair {
    let complete: Vec<[f64; 6]> = base.rows().iter().filter_map(variables).collect();
    if complete.len() < 2 {
        return CorrelationPair::default();
    }

    let n = complete.len();
    let data = DMatrix::from_fn(n, FULL_VARS.len(), |r, c| complete[r][c]);

    CorrelationPair {
        sensor: correlation_matrix(&data.columns(0, SENSOR_VARS).into_owned(), &FULL_VARS[..SENSOR_VARS]),
        full: correlation_matrix(&data, &FULL_VARS),
    }
}

fn variables(record: &Record) -> Option<[f64; 6]> {
    Some([
        record.eac?,
        record.gi?,
        record.tm?,
        record.date.day() as f64,
        record.hour as f64,
        record.date.month() as f64,
    ])
}

/// Pearson correlation via standardized columns: Z^T * Z / (n - 1).
///
/// A zero-variance column standardizes to NaN, which propagates to its whole
/// row/column of coefficients and is sanitized to null on emission (matching
/// what pandas reports for a constant column).
fn correlation_matrix(data: &DMatrix<f64>, names: &[&str]) -> CorrelationMatrix {
    let n = data.nrows();
    let mut z = data.clone();
    for mut col in z.column_iter_mut() {
        let mean = col.mean();
        let variance = col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n as f64 - 1.0);
        let sd = variance.sqrt();
        for v in col.iter_mut() {
            *v = (*v - mean) / sd;
        }
    }

    let corr = z.transpose() * &z / (n as f64 - 1.0);

    let values = (0..names.len())
        .map(|i| {
            (0..names.len())
                .map(|j| {
                    let v = corr[(i, j)];
                    v.is_finite().then_some(v)
                })
                .collect()
        })
        .collect();

    CorrelationMatrix {
        variables: names.iter().map(|s| s.to_string()).collect(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawRecord;
    use chrono::NaiveDate;

    fn record(day: u32, hour: u32, gi: f64, tm: f64, eac: Option<f64>) -> RawRecord {
        RawRecord {
            date: NaiveDate::from_ymd_opt(2024, 1 + day % 3, 1 + day).unwrap(),
            hour,
            gi: Some(gi),
            tm: Some(tm),
            eac,
        }
    }

    #[test]
    fn base_table_excludes_non_positive_gi_and_tm() {
        let table = RecordTable::from_records(vec![
            record(1, 0, 0.0, 20.0, Some(1.0)),
            record(1, 1, 100.0, -5.0, Some(1.0)),
            record(1, 2, 100.0, 20.0, Some(1.0)),
        ]);
        let base = correlation_base(&table);
        assert_eq!(base.len(), 1);
        assert_eq!(base.rows()[0].hour, 2);
    }

    #[test]
    fn perfectly_correlated_sensors() {
        let table = RecordTable::from_records(
            (0..10)
                .map(|i| record(i, i % 24, 100.0 + i as f64 * 10.0, 20.0 + i as f64, Some(i as f64)))
                .collect(),
        );
        let pair = correlation_pair(&correlation_base(&table));

        assert_eq!(pair.sensor.variables, vec!["EAC", "GI", "TM"]);
        assert_eq!(pair.full.variables.len(), 6);

        // EAC, GI and TM are all affine in i, so every sensor pair is 1.0.
        for i in 0..3 {
            for j in 0..3 {
                let v = pair.sensor.values[i][j].unwrap();
                assert!((v - 1.0).abs() < 1e-9, "corr[{i}][{j}] = {v}");
            }
        }
    }

    #[test]
    fn fewer_than_two_complete_rows_is_empty() {
        let table = RecordTable::from_records(vec![
            record(1, 0, 100.0, 20.0, Some(1.0)),
            record(1, 1, 100.0, 20.0, None),
        ]);
        let pair = correlation_pair(&correlation_base(&table));
        assert!(pair.sensor.is_empty());
        assert!(pair.full.is_empty());
    }

    #[test]
    fn zero_variance_column_emits_null() {
        let table = RecordTable::from_records(
            (0..6)
                .map(|i| record(i, i, 100.0 + i as f64, 20.0, Some(i as f64)))
                .collect(),
        );
        let pair = correlation_pair(&correlation_base(&table));
        // TM is constant: its coefficients (including the diagonal) are null.
        assert_eq!(pair.sensor.values[2][2], None);
        assert_eq!(pair.sensor.values[0][2], None);
        // EAC/GI is still well-defined.
        assert!(pair.sensor.values[0][1].is_some());
    }
}
