//! Reference distributions for probability plots
//!
//! A [`ReferenceDistribution`] is a family member frozen at a location and
//! scale: `cdf(x) = F((x - loc) / scale)` and `ppf(q) = loc + scale * F⁻¹(q)`
//! where `F` is the standard member of the family. The standard members are
//! backed by statrs. Quantiles come from statrs where it inverts the CDF
//! analytically, from closed forms for the other families that have one, and
//! from a bracketed bisection for gamma and chi-squared.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use statrs::distribution::{
    Cauchy, ChiSquared, ContinuousCDF, Exp, Gamma, Laplace, LogNormal, Normal, StudentsT,
    Uniform, Weibull,
};
use statrs::function::erf::erfc_inv;
use statrs::statistics::Distribution;

use crate::{Result, StatsError};

const BISECTION_STEPS: usize = 200;
const BRACKET_STEPS: usize = 1100;

/// Distribution families together with their shape arguments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Family {
    #[default]
    Normal,
    StudentsT { df: f64 },
    Exponential,
    Uniform,
    Laplace,
    Cauchy,
    Gamma { shape: f64 },
    ChiSquared { df: f64 },
    LogNormal { sigma: f64 },
    Weibull { shape: f64 },
}

impl Family {
    pub fn name(&self) -> &'static str {
        match self {
            Family::Normal => "normal",
            Family::StudentsT { .. } => "t",
            Family::Exponential => "exponential",
            Family::Uniform => "uniform",
            Family::Laplace => "laplace",
            Family::Cauchy => "cauchy",
            Family::Gamma { .. } => "gamma",
            Family::ChiSquared { .. } => "chi2",
            Family::LogNormal { .. } => "lognormal",
            Family::Weibull { .. } => "weibull",
        }
    }

    fn shape_arg(&self) -> Option<f64> {
        match *self {
            Family::StudentsT { df } | Family::ChiSquared { df } => Some(df),
            Family::Gamma { shape } | Family::Weibull { shape } => Some(shape),
            Family::LogNormal { sigma } => Some(sigma),
            _ => None,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shape_arg() {
            Some(arg) => write!(f, "{}:{}", self.name(), arg),
            None => f.write_str(self.name()),
        }
    }
}

impl FromStr for Family {
    type Err = StatsError;

    /// Parses `name` or `name:arg`, e.g. `normal` or `t:4`
    fn from_str(s: &str) -> Result<Self> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name.trim(), Some(arg.trim())),
            None => (s.trim(), None),
        };
        let arg = arg
            .map(|a| {
                a.parse::<f64>()
                    .map_err(|_| StatsError::InvalidDistribution(format!("bad shape argument '{a}'")))
            })
            .transpose()?;
        let need = |arg: Option<f64>| {
            arg.ok_or_else(|| {
                StatsError::InvalidDistribution(format!("'{name}' needs a shape argument"))
            })
        };
        let family = match name.to_ascii_lowercase().as_str() {
            "normal" | "norm" => Family::Normal,
            "t" | "students_t" => Family::StudentsT { df: need(arg)? },
            "exponential" | "expon" => Family::Exponential,
            "uniform" => Family::Uniform,
            "laplace" => Family::Laplace,
            "cauchy" => Family::Cauchy,
            "gamma" => Family::Gamma { shape: need(arg)? },
            "chi2" | "chi_squared" => Family::ChiSquared { df: need(arg)? },
            "lognormal" | "lognorm" => Family::LogNormal { sigma: need(arg)? },
            "weibull" | "weibull_min" => Family::Weibull { shape: need(arg)? },
            other => {
                return Err(StatsError::InvalidDistribution(format!(
                    "unknown family '{other}'"
                )))
            }
        };
        Ok(family)
    }
}

/// Standard (loc 0, scale 1) members, validated once at construction
#[derive(Debug, Clone, PartialEq)]
enum Standard {
    Normal(Normal),
    StudentsT(StudentsT),
    Exponential(Exp),
    Uniform(Uniform),
    Laplace(Laplace),
    Cauchy(Cauchy),
    Gamma(Gamma),
    ChiSquared(ChiSquared),
    LogNormal(LogNormal),
    Weibull(Weibull),
}

impl Standard {
    fn new(family: Family) -> Result<Self> {
        if let Some(arg) = family.shape_arg() {
            if !(arg.is_finite() && arg > 0.0) {
                return Err(StatsError::InvalidDistribution(format!(
                    "{} shape argument must be positive and finite, got {}",
                    family.name(),
                    arg
                )));
            }
        }
        let standard = match family {
            Family::Normal => Standard::Normal(Normal::new(0.0, 1.0)?),
            Family::StudentsT { df } => Standard::StudentsT(StudentsT::new(0.0, 1.0, df)?),
            Family::Exponential => Standard::Exponential(Exp::new(1.0)?),
            Family::Uniform => Standard::Uniform(Uniform::new(0.0, 1.0)?),
            Family::Laplace => Standard::Laplace(Laplace::new(0.0, 1.0)?),
            Family::Cauchy => Standard::Cauchy(Cauchy::new(0.0, 1.0)?),
            Family::Gamma { shape } => Standard::Gamma(Gamma::new(shape, 1.0)?),
            Family::ChiSquared { df } => Standard::ChiSquared(ChiSquared::new(df)?),
            Family::LogNormal { sigma } => Standard::LogNormal(LogNormal::new(0.0, sigma)?),
            Family::Weibull { shape } => Standard::Weibull(Weibull::new(shape, 1.0)?),
        };
        Ok(standard)
    }

    fn cdf(&self, z: f64) -> f64 {
        match self {
            Standard::Normal(d) => d.cdf(z),
            Standard::StudentsT(d) => d.cdf(z),
            Standard::Exponential(d) => d.cdf(z),
            Standard::Uniform(d) => d.cdf(z),
            Standard::Laplace(d) => d.cdf(z),
            Standard::Cauchy(d) => d.cdf(z),
            Standard::Gamma(d) => d.cdf(z),
            Standard::ChiSquared(d) => d.cdf(z),
            Standard::LogNormal(d) => d.cdf(z),
            Standard::Weibull(d) => d.cdf(z),
        }
    }

    /// Lower end of the support
    fn support_min(&self) -> f64 {
        match self {
            Standard::Exponential(_)
            | Standard::Uniform(_)
            | Standard::Gamma(_)
            | Standard::ChiSquared(_)
            | Standard::LogNormal(_)
            | Standard::Weibull(_) => 0.0,
            _ => f64::NEG_INFINITY,
        }
    }

    fn mean(&self) -> Option<f64> {
        match self {
            Standard::Normal(d) => d.mean(),
            Standard::StudentsT(d) => d.mean(),
            Standard::Exponential(d) => d.mean(),
            Standard::Uniform(d) => d.mean(),
            Standard::Laplace(d) => d.mean(),
            Standard::Cauchy(d) => d.mean(),
            Standard::Gamma(d) => d.mean(),
            Standard::ChiSquared(d) => d.mean(),
            Standard::LogNormal(d) => d.mean(),
            Standard::Weibull(d) => d.mean(),
        }
    }

    fn std_dev(&self) -> Option<f64> {
        match self {
            Standard::Normal(d) => d.std_dev(),
            Standard::StudentsT(d) => d.std_dev(),
            Standard::Exponential(d) => d.std_dev(),
            Standard::Uniform(d) => d.std_dev(),
            Standard::Laplace(d) => d.std_dev(),
            Standard::Cauchy(d) => d.std_dev(),
            Standard::Gamma(d) => d.std_dev(),
            Standard::ChiSquared(d) => d.std_dev(),
            Standard::LogNormal(d) => d.std_dev(),
            Standard::Weibull(d) => d.std_dev(),
        }
    }

    /// Quantile for `q` strictly inside (0, 1)
    fn ppf(&self, family: Family, q: f64) -> f64 {
        match (self, family) {
            (Standard::Normal(d), _) => d.inverse_cdf(q),
            (Standard::StudentsT(d), _) => d.inverse_cdf(q),
            (Standard::Laplace(d), _) => d.inverse_cdf(q),
            (Standard::Exponential(_), _) => -(-q).ln_1p(),
            (Standard::Uniform(_), _) => q,
            (Standard::Cauchy(_), _) => (std::f64::consts::PI * (q - 0.5)).tan(),
            (Standard::LogNormal(_), Family::LogNormal { sigma }) => {
                (sigma * standard_normal_ppf(q)).exp()
            }
            (Standard::Weibull(_), Family::Weibull { shape }) => (-(-q).ln_1p()).powf(1.0 / shape),
            // statrs falls back to a 16-step bisection for these
            _ => self.invert_cdf(q),
        }
    }

    /// Bracket the quantile by doubling, then bisect
    fn invert_cdf(&self, q: f64) -> f64 {
        let floor = self.support_min();
        let (mut lo, mut hi) = if floor.is_finite() {
            (floor, floor + 1.0)
        } else {
            (-1.0, 1.0)
        };
        if !floor.is_finite() {
            let mut steps = 0;
            while self.cdf(lo) > q && steps < BRACKET_STEPS {
                lo *= 2.0;
                steps += 1;
            }
        }
        let mut steps = 0;
        while self.cdf(hi) < q && steps < BRACKET_STEPS {
            lo = hi;
            hi *= 2.0;
            steps += 1;
        }
        for _ in 0..BISECTION_STEPS {
            let mid = 0.5 * (lo + hi);
            if self.cdf(mid) < q {
                lo = mid;
            } else {
                hi = mid;
            }
            if hi - lo <= f64::EPSILON * mid.abs().max(f64::MIN_POSITIVE) {
                break;
            }
        }
        0.5 * (lo + hi)
    }
}

fn standard_normal_ppf(q: f64) -> f64 {
    -std::f64::consts::SQRT_2 * erfc_inv(2.0 * q)
}

/// A distribution family frozen at a location and scale
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceDistribution {
    family: Family,
    loc: f64,
    scale: f64,
    standard: Standard,
}

impl ReferenceDistribution {
    pub fn new(family: Family, loc: f64, scale: f64) -> Result<Self> {
        if !loc.is_finite() {
            return Err(StatsError::InvalidDistribution(format!(
                "location must be finite, got {loc}"
            )));
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(StatsError::InvalidDistribution(format!(
                "scale must be positive and finite, got {scale}"
            )));
        }
        Ok(Self {
            family,
            loc,
            scale,
            standard: Standard::new(family)?,
        })
    }

    /// The member with location 0 and scale 1
    pub fn standard(family: Family) -> Result<Self> {
        Self::new(family, 0.0, 1.0)
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn loc(&self) -> f64 {
        self.loc
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Same family at a new location and scale
    pub fn with_loc_scale(&self, loc: f64, scale: f64) -> Result<Self> {
        Self::new(self.family, loc, scale)
    }

    pub fn cdf(&self, x: f64) -> f64 {
        self.standard.cdf((x - self.loc) / self.scale)
    }

    /// Percent point function (inverse CDF) for `q` in (0, 1)
    pub fn ppf(&self, q: f64) -> Result<f64> {
        if !(q > 0.0 && q < 1.0) {
            return Err(StatsError::InvalidProbability(q));
        }
        Ok(self.loc + self.scale * self.standard.ppf(self.family, q))
    }

    /// Quantiles for a batch of probabilities
    pub fn ppf_many(&self, probabilities: &[f64]) -> Result<Vec<f64>> {
        probabilities.iter().map(|&q| self.ppf(q)).collect()
    }

    /// Mean of the standard member, if it exists
    pub fn standard_mean(&self) -> Option<f64> {
        self.standard.mean().filter(|m| m.is_finite())
    }

    /// Standard deviation of the standard member, if it is finite
    pub fn standard_std_dev(&self) -> Option<f64> {
        self.standard
            .std_dev()
            .filter(|sd| sd.is_finite() && *sd > 0.0)
    }
}

impl fmt::Display for ReferenceDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(loc={}, scale={})", self.family, self.loc, self.scale)
    }
}
