//! Goodness-of-fit plot builders
//!
//! Q-Q, P-P and probability plots of a [`ProbPlot`] drawn into a
//! [`dv_core::Axes`], plus the two convenience entry points [`qqplot`] and
//! [`qqplot_2samples`].

pub mod plots;

use dv_core::{Axes, StyleError};
use dv_stats::{ProbPlot, ProbPlotConfig, StatsError};
use thiserror::Error;

// Re-exports
pub use plots::gof::{ProbPlotExt, SampleRef};
pub use plots::options::PlotOptions;
pub use plots::qqline::qqline;
pub use plots::ticks::{probability_ticks, probplot_probabilities};

/// Errors that can occur while building a plot
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("Statistics error: {0}")]
    Stats(#[from] StatsError),

    #[error("Style error: {0}")]
    Style(#[from] StyleError),

    #[error("Unknown plot option: {0}")]
    UnknownOption(String),

    #[error("Invalid value '{value}' for plot option '{key}'")]
    InvalidOption { key: String, value: String },

    #[error("Samples differ in size: {0} vs {1}")]
    ShapeMismatch(usize, usize),
}

pub type Result<T> = std::result::Result<T, ViewError>;

/// Q-Q plot of `data` against the reference described by `config`
pub fn qqplot(data: &[f64], config: ProbPlotConfig, opts: &PlotOptions) -> Result<Axes> {
    let pp = ProbPlot::with_config(data, config)?;
    let mut ax = Axes::new();
    pp.qqplot(&mut ax, opts)?;
    Ok(ax)
}

/// Q-Q plot of two samples. Either side may be raw data or a [`ProbPlot`].
pub fn qqplot_2samples<'a, 'b>(
    data1: impl Into<SampleRef<'a>>,
    data2: impl Into<SampleRef<'b>>,
    opts: &PlotOptions,
) -> Result<Axes> {
    let first = data1.into().into_probplot()?;
    let mut ax = Axes::new();
    first.qqplot_against(&mut ax, data2, opts)?;
    Ok(ax)
}
