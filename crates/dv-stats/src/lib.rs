//! Statistics behind probability plots
//!
//! Reference distributions, plotting positions, location/scale fitting,
//! least squares and the geometry of reference lines. [`ProbPlot`] ties
//! these together into the sample-versus-reference mapping that the plot
//! builders draw.

pub mod distribution;
pub mod fit;
pub mod line;
pub mod ols;
pub mod positions;
pub mod probplot;

use thiserror::Error;

// Re-exports
pub use distribution::{Family, ReferenceDistribution};
pub use fit::{FitMethod, FitResult};
pub use line::{reference_line_points, ReferenceLine};
pub use ols::{simple_regression, Ols, OlsResults};
pub use positions::{mean, median, plotting_positions, population_std, score_at_percentile};
pub use probplot::{ProbPlot, ProbPlotConfig};

/// Errors that can occur in statistical computations
#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Non-finite value at index {0}")]
    NonFinite(usize),

    #[error("Invalid distribution: {0}")]
    InvalidDistribution(String),

    #[error("Probability {0} is outside (0, 1)")]
    InvalidProbability(f64),

    #[error("Plotting position offset must lie in [0, 1], got {0}")]
    InvalidPlottingPosition(f64),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Singular design matrix: {0}")]
    Singular(String),

    #[error("Degenerate sample: {0}")]
    DegenerateSample(String),

    #[error("Unknown reference line: {0}")]
    InvalidLine(String),

    #[error("Distribution error: {0}")]
    Statrs(#[from] statrs::StatsError),
}

pub type Result<T> = std::result::Result<T, StatsError>;

/// Reject empty or non-finite samples
pub(crate) fn check_sample(data: &[f64], min_len: usize) -> Result<()> {
    if data.len() < min_len {
        return Err(StatsError::InsufficientData(format!(
            "need at least {} observations, got {}",
            min_len,
            data.len()
        )));
    }
    if let Some(idx) = data.iter().position(|v| !v.is_finite()) {
        return Err(StatsError::NonFinite(idx));
    }
    Ok(())
}
