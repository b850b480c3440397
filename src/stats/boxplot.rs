//! Grouped box-plot summaries over EAC.

use std::collections::BTreeMap;

use chrono::Datelike;

use crate::domain::{BoxSummary, Column, Record, RecordTable};
use crate::math::quantile;

/// Whisker multiplier (Tukey's 1.5 * IQR rule).
const WHISKER_FACTOR: f64 = 1.5;

/// Grouping keys for the three box-plot families.
#[derive(Debug, Clone, Copy)]
pub enum GroupKey {
    Month,
    /// Plain day-of-month (not day-of-year).
    Day,
    Hour,
}

impl GroupKey {
    fn of(self, record: &Record) -> u32 {
        match self {
            GroupKey::Month => record.date.month(),
            GroupKey::Day => record.date.day(),
            GroupKey::Hour => record.hour,
        }
    }
}

/// Per-group five-number summaries over non-missing EAC values.
///
/// Groups with no values are skipped. `suppress_outliers` empties the
/// per-group outlier lists (whisker math is unaffected) — used when the
/// caller has already asked for outlier removal.
pub fn box_plots_by(
    table: &RecordTable,
    key: GroupKey,
    suppress_outliers: bool,
) -> BTreeMap<u32, BoxSummary> {
    let mut grouped: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for row in table.rows() {
        if let Some(eac) = row.value(Column::Eac) {
            grouped.entry(key.of(row)).or_default().push(eac);
        }
    }

    grouped
        .into_iter()
        .map(|(group, mut values)| {
            let mut summary = summarize(&mut values);
            if suppress_outliers {
                summary.outliers.clear();
            }
            (group, summary)
        })
        .collect()
}

/// Five-number summary plus whiskers and outside-whisker values.
///
/// Sorts in place. When the IQR is 0 both whiskers degenerate to the median.
fn summarize(values: &mut [f64]) -> BoxSummary {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let q1 = quantile(values, 0.25);
    let median = quantile(values, 0.5);
    let q3 = quantile(values, 0.75);
    let iqr = q3 - q1;

    let (whisker_low, whisker_high) = if iqr == 0.0 {
        (median, median)
    } else {
        (q1 - WHISKER_FACTOR * iqr, q3 + WHISKER_FACTOR * iqr)
    };

    let outliers = values
        .iter()
        .copied()
        .filter(|&v| v < whisker_low || v > whisker_high)
        .collect();

    BoxSummary {
        min: values[0],
        q1,
        median,
        q3,
        max: values[values.len() - 1],
        whisker_low,
        whisker_high,
        outliers,
    }
}
