//! Sample-versus-reference mapping behind Q-Q, P-P and probability plots

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::distribution::{Family, ReferenceDistribution};
use crate::fit::FitResult;
use crate::positions::plotting_positions;
use crate::{check_sample, Result, StatsError};

/// Construction parameters for a [`ProbPlot`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbPlotConfig {
    /// Reference family and its shape arguments
    pub family: Family,
    /// Estimate loc/scale from the data and compare in standardized units
    pub fit: bool,
    /// Location of the frozen reference; ignored when `fit` is set
    pub loc: f64,
    /// Scale of the frozen reference; ignored when `fit` is set
    pub scale: f64,
    /// Plotting-position offset in `[0, 1]`
    pub a: f64,
}

impl Default for ProbPlotConfig {
    fn default() -> Self {
        Self {
            family: Family::Normal,
            fit: false,
            loc: 0.0,
            scale: 1.0,
            a: 0.0,
        }
    }
}

impl ProbPlotConfig {
    pub fn with_family(mut self, family: Family) -> Self {
        self.family = family;
        self
    }

    pub fn with_fit(mut self, fit: bool) -> Self {
        self.fit = fit;
        self
    }

    pub fn with_loc_scale(mut self, loc: f64, scale: f64) -> Self {
        self.loc = loc;
        self.scale = scale;
        self
    }

    pub fn with_plotting_position(mut self, a: f64) -> Self {
        self.a = a;
        self
    }
}

/// A sample compared against a reference distribution
///
/// All derived arrays are computed once in [`ProbPlot::with_config`]; the
/// value is immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbPlot {
    data: Vec<f64>,
    config: ProbPlotConfig,
    dist: ReferenceDistribution,
    fit: Option<FitResult>,
    sorted_data: Vec<f64>,
    theoretical_percentiles: Vec<f64>,
    theoretical_quantiles: Vec<f64>,
    sample_quantiles: Vec<f64>,
    sample_percentiles: Vec<f64>,
}

impl ProbPlot {
    /// Compare against the standard normal
    pub fn new(data: &[f64]) -> Result<Self> {
        Self::with_config(data, ProbPlotConfig::default())
    }

    pub fn with_config(data: &[f64], config: ProbPlotConfig) -> Result<Self> {
        check_sample(data, 2)?;
        let theoretical_percentiles = plotting_positions(data.len(), config.a)?;

        let mut sorted_data = data.to_vec();
        sorted_data.sort_by(f64::total_cmp);

        let standard = ReferenceDistribution::standard(config.family)?;
        let fit = match FitResult::estimate(&sorted_data, config.family) {
            Ok(fit) => Some(fit),
            Err(StatsError::DegenerateSample(reason)) if !config.fit => {
                warn!(%reason, "Sample cannot be fitted; percentiles use the frozen reference");
                None
            }
            Err(e) => return Err(e),
        };

        let dist = if config.fit {
            standard.clone()
        } else {
            ReferenceDistribution::new(config.family, config.loc, config.scale)?
        };
        let theoretical_quantiles = dist.ppf_many(&theoretical_percentiles)?;

        let sample_quantiles = match (&fit, config.fit) {
            (Some(fit), true) => sorted_data
                .iter()
                .map(|v| (v - fit.loc) / fit.scale)
                .collect(),
            _ => sorted_data.clone(),
        };

        let sample_percentiles = match &fit {
            Some(fit) => sorted_data
                .iter()
                .map(|v| standard.cdf((v - fit.loc) / fit.scale))
                .collect(),
            None => sorted_data.iter().map(|v| dist.cdf(*v)).collect(),
        };

        debug!(
            nobs = data.len(),
            reference = %dist,
            fit = config.fit,
            "Built probability plot"
        );

        Ok(Self {
            data: data.to_vec(),
            config,
            dist,
            fit,
            sorted_data,
            theoretical_percentiles,
            theoretical_quantiles,
            sample_quantiles,
            sample_percentiles,
        })
    }

    /// The sample in the order it was given
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn nobs(&self) -> usize {
        self.data.len()
    }

    pub fn config(&self) -> &ProbPlotConfig {
        &self.config
    }

    /// The reference the sample is compared against. With `fit` this is the
    /// standard member of the family.
    pub fn dist(&self) -> &ReferenceDistribution {
        &self.dist
    }

    /// Location/scale estimate; `None` for a sample with no spread
    pub fn fit_result(&self) -> Option<&FitResult> {
        self.fit.as_ref()
    }

    pub fn sorted_data(&self) -> &[f64] {
        &self.sorted_data
    }

    pub fn theoretical_percentiles(&self) -> &[f64] {
        &self.theoretical_percentiles
    }

    pub fn theoretical_quantiles(&self) -> &[f64] {
        &self.theoretical_quantiles
    }

    pub fn sample_quantiles(&self) -> &[f64] {
        &self.sample_quantiles
    }

    pub fn sample_percentiles(&self) -> &[f64] {
        &self.sample_percentiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::distributions::Distribution;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use statrs::distribution::Normal;

    fn normal_sample() -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(5);
        let dist = Normal::new(8.25, 3.25).unwrap();
        (0..37).map(|_| dist.sample(&mut rng)).collect()
    }

    #[test]
    fn test_default_reference_is_standard_normal() {
        let data = normal_sample();
        let pp = ProbPlot::new(&data).unwrap();
        assert_eq!(pp.nobs(), 37);
        assert_eq!(pp.dist().family(), Family::Normal);
        assert_eq!(pp.dist().loc(), 0.0);
        assert_eq!(pp.dist().scale(), 1.0);
        assert_eq!(pp.sample_quantiles(), pp.sorted_data());
        assert_eq!(pp.data(), data.as_slice());
    }

    #[test]
    fn test_sorted_and_monotone() {
        let pp = ProbPlot::new(&normal_sample()).unwrap();
        assert!(pp.sorted_data().windows(2).all(|w| w[0] <= w[1]));
        assert!(pp.theoretical_quantiles().windows(2).all(|w| w[0] < w[1]));
        assert!(pp.sample_percentiles().windows(2).all(|w| w[0] <= w[1]));
        assert!(pp.sample_percentiles().iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_theoretical_quantiles_symmetric() {
        let pp = ProbPlot::new(&normal_sample()).unwrap();
        let tq = pp.theoretical_quantiles();
        assert_relative_eq!(tq[18], 0.0, epsilon = 1e-9);
        assert_relative_eq!(tq[0], -tq[36], epsilon = 1e-9);
        assert_relative_eq!(pp.theoretical_percentiles()[0], 1.0 / 38.0);
    }

    #[test]
    fn test_fit_standardizes_sample() {
        let data = normal_sample();
        let pp = ProbPlot::with_config(&data, ProbPlotConfig::default().with_fit(true)).unwrap();
        let fit = *pp.fit_result().unwrap();
        assert_eq!(pp.dist().loc(), 0.0);
        assert_eq!(pp.dist().scale(), 1.0);
        let mean: f64 = pp.sample_quantiles().iter().sum::<f64>() / 37.0;
        assert_relative_eq!(mean, 0.0, epsilon = 1e-9);
        assert_relative_eq!(pp.sample_quantiles()[0], (pp.sorted_data()[0] - fit.loc) / fit.scale);
    }

    #[test]
    fn test_frozen_loc_scale() {
        let data = normal_sample();
        let config = ProbPlotConfig::default().with_loc_scale(8.25, 3.25);
        let pp = ProbPlot::with_config(&data, config).unwrap();
        assert_relative_eq!(pp.theoretical_quantiles()[18], 8.25, epsilon = 1e-9);
        assert_eq!(pp.sample_quantiles(), pp.sorted_data());
    }

    #[test]
    fn test_students_t_reference() {
        let data = normal_sample();
        let config = ProbPlotConfig::default().with_family(Family::StudentsT { df: 4.0 });
        let pp = ProbPlot::with_config(&data, config).unwrap();
        let normal = ProbPlot::new(&data).unwrap();
        // Heavier tails stretch the extreme theoretical quantiles
        assert!(pp.theoretical_quantiles()[36] > normal.theoretical_quantiles()[36]);
    }

    #[test]
    fn test_constant_sample_without_fit() {
        let pp = ProbPlot::new(&[2.0; 5]).unwrap();
        assert!(pp.fit_result().is_none());
        assert!(pp.sample_percentiles().iter().all(|p| *p > 0.97));
    }

    #[test]
    fn test_constant_sample_with_fit_fails() {
        let result = ProbPlot::with_config(&[2.0; 5], ProbPlotConfig::default().with_fit(true));
        assert!(matches!(result, Err(StatsError::DegenerateSample(_))));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(ProbPlot::new(&[]), Err(StatsError::InsufficientData(_))));
        assert!(matches!(ProbPlot::new(&[1.0]), Err(StatsError::InsufficientData(_))));
        assert!(matches!(
            ProbPlot::new(&[1.0, f64::INFINITY]),
            Err(StatsError::NonFinite(1))
        ));
        let bad_scale = ProbPlotConfig::default().with_loc_scale(0.0, -1.0);
        assert!(matches!(
            ProbPlot::with_config(&[1.0, 2.0], bad_scale),
            Err(StatsError::InvalidDistribution(_))
        ));
        let bad_a = ProbPlotConfig::default().with_plotting_position(2.0);
        assert!(matches!(
            ProbPlot::with_config(&[1.0, 2.0], bad_a),
            Err(StatsError::InvalidPlottingPosition(_))
        ));
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: ProbPlotConfig =
            serde_json::from_str(r#"{"family":{"name":"students_t","df":4.0}}"#).unwrap();
        assert_eq!(config.family, Family::StudentsT { df: 4.0 });
        assert!(!config.fit);
        assert_eq!(config.scale, 1.0);
    }
}
