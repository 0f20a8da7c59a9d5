//! Location and scale estimation for a reference family

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::distribution::{Family, ReferenceDistribution};
use crate::positions::{mean, population_std, score_at_percentile};
use crate::{check_sample, Result, StatsError};

/// How a [`FitResult`] was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitMethod {
    MaximumLikelihood,
    Moments,
    Quantiles,
}

/// Estimated location and scale of a reference family, shape held fixed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub loc: f64,
    pub scale: f64,
    pub method: FitMethod,
}

impl FitResult {
    /// Estimate loc/scale of `family` from a sample.
    ///
    /// Normal samples get the MLE. Families with finite variance are fitted
    /// by moments, the rest by matching the median and inter-quartile range.
    pub fn estimate(data: &[f64], family: Family) -> Result<Self> {
        check_sample(data, 2)?;
        let standard = ReferenceDistribution::standard(family)?;

        let fit = match (
            family,
            standard.standard_mean(),
            standard.standard_std_dev(),
        ) {
            (Family::Normal, _, _) => Self {
                loc: mean(data),
                scale: population_std(data),
                method: FitMethod::MaximumLikelihood,
            },
            (_, Some(std_mean), Some(std_sd)) => {
                let scale = population_std(data) / std_sd;
                Self {
                    loc: mean(data) - scale * std_mean,
                    scale,
                    method: FitMethod::Moments,
                }
            }
            _ => Self::by_quartiles(data, &standard)?,
        };

        if !(fit.scale.is_finite() && fit.scale > 0.0) {
            return Err(StatsError::DegenerateSample(format!(
                "estimated scale {} for the {} family",
                fit.scale, family
            )));
        }
        debug!(
            family = %family,
            loc = fit.loc,
            scale = fit.scale,
            method = ?fit.method,
            "Fitted reference distribution"
        );
        Ok(fit)
    }

    fn by_quartiles(data: &[f64], standard: &ReferenceDistribution) -> Result<Self> {
        let mut sorted = data.to_vec();
        sorted.sort_by(f64::total_cmp);
        let q25 = score_at_percentile(&sorted, 25.0)?;
        let q50 = score_at_percentile(&sorted, 50.0)?;
        let q75 = score_at_percentile(&sorted, 75.0)?;
        let s25 = standard.ppf(0.25)?;
        let s50 = standard.ppf(0.5)?;
        let s75 = standard.ppf(0.75)?;
        let scale = (q75 - q25) / (s75 - s25);
        Ok(Self {
            loc: q50 - scale * s50,
            scale,
            method: FitMethod::Quantiles,
        })
    }

    /// The fitted member of `family`
    pub fn distribution(&self, family: Family) -> Result<ReferenceDistribution> {
        ReferenceDistribution::new(family, self.loc, self.scale)
    }

    /// Short text for chart annotations
    pub fn summary(&self) -> String {
        format!("loc = {:.4}, scale = {:.4}", self.loc, self.scale)
    }
}
