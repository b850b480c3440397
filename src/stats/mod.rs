//! Descriptive/diagnostic statistics for one cleaning stage.
//!
//! `build_bundle` assembles the fixed-shape per-stage output: histograms,
//! scatter pairs, grouped box plots, and the query-level correlation
//! matrices. Every emitted float is finite or null; data sparsity degrades
//! each artifact independently (an empty histogram never empties a scatter
//! pair).

pub mod boxplot;
pub mod correlation;
pub mod histogram;
pub mod scatter;

use std::collections::BTreeMap;

use crate::domain::{AnomalyMask, Column, RecordTable, StageBundle};

pub use boxplot::{box_plots_by, GroupKey};
pub use correlation::{correlation_base, correlation_pair, CorrelationPair};
pub use histogram::histogram;
pub use scatter::scatter_pairs;

/// Assemble the diagnostic bundle for one stage.
///
/// `mask` must be aligned with `table`'s rows (reindexed beforehand if it was
/// computed against a different stage). `corr` is the query-level correlation
/// pair, shared verbatim by all three stage bundles.
pub fn build_bundle(
    table: &RecordTable,
    mask: &AnomalyMask,
    corr: &CorrelationPair,
    suppress_box_outliers: bool,
) -> StageBundle {
    debug_assert_eq!(table.len(), mask.len());

    let mut histograms = BTreeMap::new();
    for column in Column::ALL {
        let values: Vec<f64> = table.column(column).into_iter().flatten().collect();
        histograms.insert(column.as_str().to_string(), histogram(&values));
    }

    StageBundle {
        row_count: table.len(),
        flagged_rows: mask.iter().filter(|&&f| f).count(),
        histograms,
        scatter_pairs: scatter_pairs(table, mask),
        box_plots_by_month: box_plots_by(table, GroupKey::Month, suppress_box_outliers),
        box_plots_by_day: box_plots_by(table, GroupKey::Day, suppress_box_outliers),
        box_plots_by_hour: box_plots_by(table, GroupKey::Hour, suppress_box_outliers),
        correlation_matrix: corr.sensor.clone(),
        correlation_matrix_full: corr.full.clone(),
    }
}
