//! Fixed-width histograms.

use crate::domain::Histogram;

/// Number of bins in every histogram.
const BINS: usize = 10;

/// Minimum non-missing values; below this the histogram is empty.
const MIN_VALUES: usize = 5;

/// Build a 10-bin histogram over the full value range.
///
/// Mirrors `numpy.histogram`: 11 edges spanning [min, max], values equal to
/// the maximum land in the last bin, and a degenerate range (all values
/// identical) expands to +/- 0.5 around the value.
pub fn histogram(values: &[f64]) -> Histogram {
    if values.len() < MIN_VALUES {
        return Histogram::default();
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / BINS as f64;
    let bins: Vec<f64> = (0..=BINS).map(|i| min + i as f64 * width).collect();

    let mut counts = vec![0u64; BINS];
    for &v in values {
        let idx = (((v - min) / width) as usize).min(BINS - 1);
        counts[idx] += 1;
    }

    Histogram { bins, counts }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_sum_to_value_count() {
        let values: Vec<f64> = (0..37).map(|i| (i as f64) * 1.7 - 3.0).collect();
        let h = histogram(&values);
        assert_eq!(h.bins.len(), 11);
        assert_eq!(h.counts.len(), 10);
        assert_eq!(h.counts.iter().sum::<u64>(), 37);
    }

    #[test]
    fn fewer_than_five_values_is_empty() {
        let h = histogram(&[1.0, 2.0, 3.0, 4.0]);
        assert!(h.is_empty());
        assert!(h.bins.is_empty());
    }

    #[test]
    fn max_value_lands_in_last_bin() {
        let values = [0.0, 1.0, 2.0, 5.0, 10.0];
        let h = histogram(&values);
        assert_eq!(h.counts[9], 1);
        assert_eq!(h.counts.iter().sum::<u64>(), 5);
    }

    #[test]
    fn degenerate_range_expands() {
        let values = [7.0; 6];
        let h = histogram(&values);
        assert_eq!(h.counts.iter().sum::<u64>(), 6);
        assert!((h.bins[0] - 6.5).abs() < 1e-12);
        assert!((h.bins[10] - 7.5).abs() < 1e-12);
    }
}
