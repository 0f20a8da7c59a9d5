//! Probability-scale tick marks

use dv_core::Tick;
use dv_stats::ReferenceDistribution;

use crate::Result;

const SMALL_SAMPLE: [f64; 15] = [
    1.0, 2.0, 5.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 95.0, 98.0, 99.0,
];

const MEDIUM_SAMPLE: [f64; 21] = [
    0.1, 0.2, 0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 95.0,
    98.0, 99.0, 99.5, 99.8, 99.9,
];

const LARGE_SAMPLE: [f64; 27] = [
    0.01, 0.02, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0,
    80.0, 90.0, 95.0, 98.0, 99.0, 99.5, 99.8, 99.9, 99.95, 99.98, 99.99,
];

/// Probabilities, as fractions, labelled on a probability plot of `nobs`
/// points. Larger samples reach further into the tails.
pub fn probplot_probabilities(nobs: usize) -> Vec<f64> {
    let percents: &[f64] = if nobs < 50 {
        &SMALL_SAMPLE
    } else if nobs < 500 {
        &MEDIUM_SAMPLE
    } else {
        &LARGE_SAMPLE
    };
    percents.iter().map(|p| p / 100.0).collect()
}

/// Ticks at `dist.ppf(p)` labelled with `p` as a percentage
pub fn probability_ticks(dist: &ReferenceDistribution, nobs: usize) -> Result<Vec<Tick>> {
    probplot_probabilities(nobs)
        .into_iter()
        .map(|p| {
            Ok(Tick {
                value: dist.ppf(p)?,
                label: format_percent(p * 100.0),
            })
        })
        .collect()
}

fn format_percent(percent: f64) -> String {
    let text = format!("{:.2}", percent);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dv_stats::Family;

    #[test]
    fn test_tick_set_grows_with_sample_size() {
        assert_eq!(probplot_probabilities(37).len(), 15);
        assert_eq!(probplot_probabilities(49).len(), 15);
        assert_eq!(probplot_probabilities(50).len(), 21);
        assert_eq!(probplot_probabilities(499).len(), 21);
        assert_eq!(probplot_probabilities(500).len(), 27);
        assert_eq!(probplot_probabilities(37)[0], 0.01);
        assert!((probplot_probabilities(5000)[26] - 0.9999).abs() < 1e-12);
    }

    #[test]
    fn test_labels() {
        assert_eq!(format_percent(1.0), "1");
        assert_eq!(format_percent(0.1), "0.1");
        assert_eq!(format_percent(99.95), "99.95");
        assert_eq!(format_percent(0.2 * 100.0), "20");
    }

    #[test]
    fn test_ticks_follow_reference_quantiles() {
        let dist = ReferenceDistribution::standard(Family::Normal).unwrap();
        let ticks = probability_ticks(&dist, 16).unwrap();
        assert_eq!(ticks.len(), 15);
        assert_eq!(ticks[7].label, "50");
        assert!(ticks[7].value.abs() < 1e-9);
        assert!(ticks.windows(2).all(|w| w[0].value < w[1].value));
        assert!((ticks[0].value + ticks[14].value).abs() < 1e-9);
    }
}
