//! Quantiles and moments.

/// Compute a quantile over a sorted slice using linear interpolation between
/// closest ranks (the pandas/numpy default, so fences match the reference
/// tooling people eyeball these datasets with).
///
/// `q` is in [0, 1]. Returns 0.0 for an empty slice; callers are expected to
/// gate on emptiness themselves where it matters.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;

    if upper >= sorted.len() {
        sorted[sorted.len() - 1]
    } else {
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (ddof = 1, matching `Series.std()`).
///
/// Returns 0.0 when fewer than 2 values are given.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() as f64 - 1.0);
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantile_linear_interpolation() {
        let sorted = [10.0, 11.0, 12.0, 13.0, 1000.0];
        assert!((quantile(&sorted, 0.25) - 11.0).abs() < 1e-12);
        assert!((quantile(&sorted, 0.5) - 12.0).abs() < 1e-12);
        assert!((quantile(&sorted, 0.75) - 13.0).abs() < 1e-12);
    }

    #[test]
    fn quantile_midpoint_between_ranks() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        // rank = 0.25 * 3 = 0.75 -> between 1 and 2
        assert!((quantile(&sorted, 0.25) - 1.75).abs() < 1e-12);
    }

    #[test]
    fn sample_std_matches_ddof1() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        // Sample variance of this classic set is 32/7.
        let expected = (32.0_f64 / 7.0).sqrt();
        assert!((sample_std(&values) - expected).abs() < 1e-12);
    }

    #[test]
    fn sample_std_degenerate() {
        assert_eq!(sample_std(&[]), 0.0);
        assert_eq!(sample_std(&[3.0]), 0.0);
        assert_eq!(sample_std(&[5.0, 5.0, 5.0]), 0.0);
    }
}
