//! Linear gap interpolation over the time-sorted row sequence.

use crate::domain::{Column, RecordTable};

/// Fill missing values in every sensor column by linear interpolation over
/// the row sequence, extending boundaries in both directions (leading and
/// trailing gaps take the nearest known value).
///
/// Columns with fewer than 2 known values are left untouched. The table must
/// already be time-sorted; interpolation never looks across stage boundaries.
pub fn interpolate_missing(table: &mut RecordTable) {
    for column in Column::ALL {
        let mut values = table.column(column);
        fill_linear(&mut values);
        table.set_column(column, &values);
    }
}

/// In-place linear fill of `None` entries, interpolating between the nearest
/// known neighbors by index distance and extending flat past the ends.
fn fill_linear(values: &mut [Option<f64>]) {
    let known: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .collect();

    if known.len() < 2 {
        return;
    }

    let (first_idx, first_val) = known[0];
    let (last_idx, last_val) = known[known.len() - 1];

    for i in 0..first_idx {
        values[i] = Some(first_val);
    }
    for i in (last_idx + 1)..values.len() {
        values[i] = Some(last_val);
    }

    for pair in known.windows(2) {
        let (i0, v0) = pair[0];
        let (i1, v1) = pair[1];
        let span = (i1 - i0) as f64;
        for i in (i0 + 1)..i1 {
            let u = (i - i0) as f64 / span;
            values[i] = Some(v0 + u * (v1 - v0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawRecord;
    use chrono::NaiveDate;

    fn table(eac: &[Option<f64>]) -> RecordTable {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        RecordTable::from_records(
            eac.iter()
                .enumerate()
                .map(|(hour, &v)| RawRecord {
                    date,
                    hour: hour as u32,
                    gi: Some(100.0),
                    tm: Some(20.0),
                    eac: v,
                })
                .collect(),
        )
    }

    #[test]
    fn complete_table_is_unchanged() {
        let mut t = table(&[Some(1.0), Some(2.0), Some(3.0)]);
        let before = t.clone();
        interpolate_missing(&mut t);
        assert_eq!(t, before);
    }

    #[test]
    fn interior_gap_is_linearly_filled() {
        let mut t = table(&[Some(1.0), None, None, Some(4.0)]);
        interpolate_missing(&mut t);
        let eac = t.column(Column::Eac);
        assert_eq!(eac, vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn boundary_gaps_extend_from_nearest_known() {
        let mut t = table(&[None, Some(2.0), Some(6.0), None, None]);
        interpolate_missing(&mut t);
        let eac = t.column(Column::Eac);
        assert_eq!(
            eac,
            vec![Some(2.0), Some(2.0), Some(6.0), Some(6.0), Some(6.0)]
        );
    }

    #[test]
    fn single_known_value_leaves_column_sparse() {
        let mut t = table(&[None, Some(5.0), None]);
        interpolate_missing(&mut t);
        let eac = t.column(Column::Eac);
        assert_eq!(eac, vec![None, Some(5.0), None]);
    }
}
