//! Z-score detection.

use crate::math::{mean, sample_std};

/// Flag values with |value - mean| / stddev above `threshold`.
///
/// Uses the sample standard deviation (ddof = 1). Returns `None` (column
/// skipped) when no non-missing values exist or the deviation is 0 or
/// non-finite. Missing entries are never flagged.
pub fn column_mask(values: &[Option<f64>], threshold: f64) -> Option<Vec<bool>> {
    let known: Vec<f64> = values.iter().filter_map(|v| *v).collect();
    if known.is_empty() {
        return None;
    }

    let sd = sample_std(&known);
    if sd == 0.0 || !sd.is_finite() {
        return None;
    }
    let m = mean(&known);

    Some(
        values
            .iter()
            .map(|v| v.is_some_and(|v| ((v - m) / sd).abs() > threshold))
            .collect(),
    )
}
