//! Plotting positions and order-statistic helpers

use crate::{Result, StatsError};

/// Probabilities assigned to the order statistics of a sample of `nobs`
///
/// The i-th position (1-based) is `(i - a) / (nobs - 2a + 1)`. `a = 0`
/// gives `i / (n + 1)`, `a = 0.5` gives Hazen's `(i - 0.5) / n`.
pub fn plotting_positions(nobs: usize, a: f64) -> Result<Vec<f64>> {
    if !(0.0..=1.0).contains(&a) {
        return Err(StatsError::InvalidPlottingPosition(a));
    }
    if nobs == 0 {
        return Err(StatsError::InsufficientData(
            "plotting positions need at least one observation".to_string(),
        ));
    }
    let denom = nobs as f64 - 2.0 * a + 1.0;
    Ok((1..=nobs).map(|i| (i as f64 - a) / denom).collect())
}

/// Score at percentile `p` (0..=100) of sorted data, interpolating linearly
/// between neighbouring order statistics
pub fn score_at_percentile(sorted: &[f64], p: f64) -> Result<f64> {
    if sorted.is_empty() {
        return Err(StatsError::InsufficientData(
            "percentile of an empty sample".to_string(),
        ));
    }
    if !(0.0..=100.0).contains(&p) {
        return Err(StatsError::InvalidProbability(p / 100.0));
    }
    let idx = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;
    if lower == upper {
        Ok(sorted[lower])
    } else {
        let fraction = idx - lower as f64;
        Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
    }
}

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation with divisor `n`
pub fn population_std(values: &[f64]) -> f64 {
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Median of unsorted values. NaN for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_plotting_positions_default() {
        let pos = plotting_positions(4, 0.0).unwrap();
        assert_eq!(pos.len(), 4);
        assert_relative_eq!(pos[0], 0.2);
        assert_relative_eq!(pos[3], 0.8);
    }

    #[test]
    fn test_plotting_positions_hazen() {
        let pos = plotting_positions(5, 0.5).unwrap();
        assert_relative_eq!(pos[0], 0.1);
        assert_relative_eq!(pos[2], 0.5);
        assert_relative_eq!(pos[4], 0.9);
    }

    #[test]
    fn test_plotting_positions_symmetric() {
        let pos = plotting_positions(37, 0.375).unwrap();
        for (lo, hi) in pos.iter().zip(pos.iter().rev()) {
            assert_relative_eq!(lo + hi, 1.0, epsilon = 1e-12);
        }
        assert!(pos.iter().all(|p| *p > 0.0 && *p < 1.0));
    }

    #[test]
    fn test_plotting_positions_invalid() {
        assert!(matches!(
            plotting_positions(10, 1.5),
            Err(StatsError::InvalidPlottingPosition(_))
        ));
        assert!(plotting_positions(0, 0.0).is_err());
    }

    #[test]
    fn test_score_at_percentile() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(score_at_percentile(&sorted, 0.0).unwrap(), 1.0);
        assert_relative_eq!(score_at_percentile(&sorted, 25.0).unwrap(), 2.0);
        assert_relative_eq!(score_at_percentile(&sorted, 50.0).unwrap(), 3.0);
        assert_relative_eq!(score_at_percentile(&sorted, 100.0).unwrap(), 5.0);

        let sorted = [10.0, 20.0, 30.0, 40.0];
        assert_relative_eq!(score_at_percentile(&sorted, 25.0).unwrap(), 17.5);
        assert!(score_at_percentile(&[], 50.0).is_err());
        assert!(score_at_percentile(&sorted, 101.0).is_err());
    }

    #[test]
    fn test_moments() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&values), 5.0);
        assert_relative_eq!(population_std(&values), 2.0);
        assert_relative_eq!(median(&values), 4.5);
        assert_relative_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert!(median(&[]).is_nan());
    }
}
