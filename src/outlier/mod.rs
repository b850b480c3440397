//! Outlier-detection policies.
//!
//! `detect` produces a boolean anomaly mask aligned with the table's rows.
//! Every method combines per-column (or per-rule) masks with logical OR: a
//! row is anomalous if *any* column or rule flags it. Columns that cannot
//! support a method (too few values, zero spread) are skipped silently; they
//! disable that column's contribution, never the whole detection.

pub mod custom;
pub mod iforest;
pub mod iqr;
pub mod zscore;

use crate::domain::{AnomalyMask, OutlierMethod, RecordTable};
use crate::error::AppError;

/// Run the configured detection method against a table.
///
/// The only error surface here is parameter validation (contamination range);
/// data sparsity degrades to an all-false mask.
pub fn detect(table: &RecordTable, method: &OutlierMethod) -> Result<AnomalyMask, AppError> {
    let mut mask = vec![false; table.len()];

    match *method {
        OutlierMethod::None => {}
        OutlierMethod::Iqr { factor } | OutlierMethod::IqrSingle { factor } => {
            for &column in method.columns() {
                if let Some(column_mask) = iqr::column_mask(&table.column(column), factor) {
                    or_into(&mut mask, &column_mask);
                }
            }
        }
        OutlierMethod::Zscore { threshold } => {
            for &column in method.columns() {
                if let Some(column_mask) = zscore::column_mask(&table.column(column), threshold) {
                    or_into(&mut mask, &column_mask);
                }
            }
        }
        OutlierMethod::IsolationForest { contamination } => {
            let forest_mask = iforest::detect(table, method.columns(), contamination)?;
            or_into(&mut mask, &forest_mask);
        }
        OutlierMethod::Custom => {
            or_into(&mut mask, &custom::detect(table));
        }
    }

    Ok(mask)
}

fn or_into(mask: &mut [bool], other: &[bool]) {
    debug_assert_eq!(mask.len(), other.len());
    for (m, &o) in mask.iter_mut().zip(other) {
        *m |= o;
    }
}
