//! IQR detection with Tukey fences.
//!
//! Resistant to the extreme values that inflate stddev-based methods, which
//! matters for yield columns where a single stuck-sensor spike can be three
//! orders of magnitude off.

use crate::math::quantile;

/// Minimum non-missing values for quartiles to be meaningful.
const MIN_VALUES: usize = 10;

/// Flag values strictly outside [Q1 - k*IQR, Q3 + k*IQR].
///
/// Returns `None` (column skipped) when fewer than `MIN_VALUES` non-missing
/// values exist or the IQR is exactly 0. Missing entries are never flagged.
pub fn column_mask(values: &[Option<f64>], factor: f64) -> Option<Vec<bool>> {
    let mut known: Vec<f64> = values.iter().filter_map(|v| *v).collect();
    if known.len() < MIN_VALUES {
        return None;
    }

    known.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let q1 = quantile(&known, 0.25);
    let q3 = quantile(&known, 0.75);
    let iqr = q3 - q1;
    if iqr == 0.0 {
        return None;
    }

    let lower = q1 - factor * iqr;
    let upper = q3 + factor * iqr;

    Some(
        values
            .iter()
            .map(|v| v.is_some_and(|v| v < lower || v > upper))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::quantile;

    #[test]
    fn flags_only_values_outside_fences() {
        let values: Vec<Option<f64>> = [10.0, 12.0, 11.0, 13.0, 1000.0, 11.5, 12.5, 10.5, 11.0, 12.0]
            .iter()
            .map(|&v| Some(v))
            .collect();
        let mask = column_mask(&values, 1.5).unwrap();

        // Verify the fence property directly against the sorted sample.
        let mut known: Vec<f64> = values.iter().filter_map(|v| *v).collect();
        known.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let q1 = quantile(&known, 0.25);
        let q3 = quantile(&known, 0.75);
        let iqr = q3 - q1;
        let (lower, upper) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

        for (v, flagged) in values.iter().zip(&mask) {
            let v = v.unwrap();
            assert_eq!(*flagged, v < lower || v > upper, "value {v}");
        }
        assert_eq!(mask.iter().filter(|&&f| f).count(), 1);
        assert!(mask[4], "the 1000.0 spike must be flagged");
    }

    #[test]
    fn skips_small_samples() {
        let values: Vec<Option<f64>> = vec![Some(10.0), Some(12.0), Some(11.0), Some(13.0), Some(1000.0)];
        assert!(column_mask(&values, 1.5).is_none());
    }

    #[test]
    fn skips_zero_iqr() {
        let values: Vec<Option<f64>> = vec![Some(5.0); 20];
        assert!(column_mask(&values, 1.5).is_none());

        // Even with one deviant value, identical quartiles mean no fences.
        let mut values = vec![Some(5.0); 20];
        values[0] = Some(100.0);
        assert!(column_mask(&values, 1.5).is_none());
    }

    #[test]
    fn missing_entries_are_never_flagged() {
        let mut values: Vec<Option<f64>> = (0..15).map(|i| Some(10.0 + (i % 4) as f64)).collect();
        values.push(None);
        values.push(Some(9999.0));
        let mask = column_mask(&values, 1.5).unwrap();
        assert!(!mask[15]);
        assert!(mask[16]);
    }
}
