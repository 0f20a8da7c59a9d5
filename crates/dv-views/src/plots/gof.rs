//! Q-Q, P-P and probability plots of a [`ProbPlot`]
//!
//! Every builder draws into a caller-supplied [`Axes`]: a scatter of the
//! paired values, axis labels (overridable through [`PlotOptions`]) and an
//! optional reference line. Comparisons against a second sample take
//! anything convertible into a [`SampleRef`].
//!
//! [`PlotOptions::annotate_fit`] writes the fitted loc/scale of the plotted
//! sample in the top-left corner of every plot. It has no effect when the
//! sample could not be fitted.

use std::borrow::Cow;

use dv_core::Axes;
use dv_stats::{ProbPlot, ReferenceDistribution};
use tracing::debug;

use super::options::PlotOptions;
use super::qqline::qqline;
use super::ticks::probability_ticks;
use crate::{Result, ViewError};

/// A sample given either as raw values or as an already built [`ProbPlot`]
#[derive(Debug, Clone, Copy)]
pub enum SampleRef<'a> {
    Values(&'a [f64]),
    Plot(&'a ProbPlot),
}

impl<'a> SampleRef<'a> {
    /// Raw values are compared against the standard normal
    pub fn into_probplot(self) -> Result<Cow<'a, ProbPlot>> {
        match self {
            SampleRef::Values(data) => Ok(Cow::Owned(ProbPlot::new(data)?)),
            SampleRef::Plot(pp) => Ok(Cow::Borrowed(pp)),
        }
    }
}

impl<'a> From<&'a [f64]> for SampleRef<'a> {
    fn from(data: &'a [f64]) -> Self {
        SampleRef::Values(data)
    }
}

impl<'a> From<&'a Vec<f64>> for SampleRef<'a> {
    fn from(data: &'a Vec<f64>) -> Self {
        SampleRef::Values(data.as_slice())
    }
}

impl<'a, const N: usize> From<&'a [f64; N]> for SampleRef<'a> {
    fn from(data: &'a [f64; N]) -> Self {
        SampleRef::Values(data.as_slice())
    }
}

impl<'a> From<&'a ProbPlot> for SampleRef<'a> {
    fn from(pp: &'a ProbPlot) -> Self {
        SampleRef::Plot(pp)
    }
}

/// Plotting operations on a [`ProbPlot`]
pub trait ProbPlotExt {
    /// Sample quantiles against theoretical quantiles
    fn qqplot(&self, ax: &mut Axes, opts: &PlotOptions) -> Result<()>;

    /// Own sample quantiles (y) against those of `other` (x)
    fn qqplot_against<'a>(
        &self,
        ax: &mut Axes,
        other: impl Into<SampleRef<'a>>,
        opts: &PlotOptions,
    ) -> Result<()>;

    /// Sample percentiles against theoretical percentiles, on the unit square
    fn ppplot(&self, ax: &mut Axes, opts: &PlotOptions) -> Result<()>;

    /// Own sample percentiles (y) against those of `other` (x)
    fn ppplot_against<'a>(
        &self,
        ax: &mut Axes,
        other: impl Into<SampleRef<'a>>,
        opts: &PlotOptions,
    ) -> Result<()>;

    /// Ordered data against theoretical quantiles on a probability-scaled
    /// x axis
    fn probplot(&self, ax: &mut Axes, opts: &PlotOptions) -> Result<()>;
}

impl ProbPlotExt for ProbPlot {
    fn qqplot(&self, ax: &mut Axes, opts: &PlotOptions) -> Result<()> {
        debug!(nobs = self.nobs(), line = ?opts.line, "Q-Q plot");
        draw_pairs(
            ax,
            self.theoretical_quantiles(),
            self.sample_quantiles(),
            Some(self.dist()),
            opts,
            ("Theoretical Quantiles", "Sample Quantiles"),
        )?;
        annotate_fit(ax, self, opts);
        Ok(())
    }

    fn qqplot_against<'a>(
        &self,
        ax: &mut Axes,
        other: impl Into<SampleRef<'a>>,
        opts: &PlotOptions,
    ) -> Result<()> {
        let other = comparable(self, other.into())?;
        debug!(nobs = self.nobs(), line = ?opts.line, "Two-sample Q-Q plot");
        draw_pairs(
            ax,
            other.sample_quantiles(),
            self.sample_quantiles(),
            None,
            opts,
            ("Quantiles of 2nd Sample", "Quantiles of 1st Sample"),
        )?;
        annotate_fit(ax, self, opts);
        Ok(())
    }

    fn ppplot(&self, ax: &mut Axes, opts: &PlotOptions) -> Result<()> {
        debug!(nobs = self.nobs(), line = ?opts.line, "P-P plot");
        draw_pairs(
            ax,
            self.theoretical_percentiles(),
            self.sample_percentiles(),
            Some(self.dist()),
            opts,
            ("Theoretical Probabilities", "Sample Probabilities"),
        )?;
        ax.set_xlim(0.0, 1.0).set_ylim(0.0, 1.0);
        annotate_fit(ax, self, opts);
        Ok(())
    }

    fn ppplot_against<'a>(
        &self,
        ax: &mut Axes,
        other: impl Into<SampleRef<'a>>,
        opts: &PlotOptions,
    ) -> Result<()> {
        let other = comparable(self, other.into())?;
        debug!(nobs = self.nobs(), line = ?opts.line, "Two-sample P-P plot");
        draw_pairs(
            ax,
            other.sample_percentiles(),
            self.sample_percentiles(),
            None,
            opts,
            ("Probabilities of 2nd Sample", "Probabilities of 1st Sample"),
        )?;
        ax.set_xlim(0.0, 1.0).set_ylim(0.0, 1.0);
        annotate_fit(ax, self, opts);
        Ok(())
    }

    fn probplot(&self, ax: &mut Axes, opts: &PlotOptions) -> Result<()> {
        debug!(nobs = self.nobs(), exceed = opts.exceed, "Probability plot");
        let mut x = self.theoretical_quantiles().to_vec();
        let x_label = if opts.exceed {
            x.reverse();
            "Probability of Exceedance (%)"
        } else {
            "Non-exceedance Probability (%)"
        };
        draw_pairs(
            ax,
            &x,
            self.sorted_data(),
            Some(self.dist()),
            opts,
            (x_label, "Sample Quantiles"),
        )?;

        let ticks = probability_ticks(self.dist(), self.nobs())?;
        let lo = ticks.iter().map(|t| t.value).fold(f64::INFINITY, f64::min);
        let hi = ticks.iter().map(|t| t.value).fold(f64::NEG_INFINITY, f64::max);
        ax.set_xticks(ticks).set_xlim(lo, hi);
        annotate_fit(ax, self, opts);
        Ok(())
    }
}

/// Resolve `other` and check it pairs up with `this`
fn comparable<'a>(this: &ProbPlot, other: SampleRef<'a>) -> Result<Cow<'a, ProbPlot>> {
    let other = other.into_probplot()?;
    if other.nobs() != this.nobs() {
        return Err(ViewError::ShapeMismatch(this.nobs(), other.nobs()));
    }
    Ok(other)
}

fn draw_pairs(
    ax: &mut Axes,
    x: &[f64],
    y: &[f64],
    dist: Option<&ReferenceDistribution>,
    opts: &PlotOptions,
    (default_x, default_y): (&str, &str),
) -> Result<()> {
    opts.marker.validate()?;
    ax.set_xlabel(opts.x_label.as_deref().unwrap_or(default_x))
        .set_ylabel(opts.y_label.as_deref().unwrap_or(default_y));
    if let Some(title) = &opts.title {
        ax.set_title(title.as_str());
    }
    ax.scatter(x, y, opts.marker.clone());
    if let Some(line) = opts.line {
        qqline(ax, line, x, y, dist, &opts.line_style)?;
    }
    Ok(())
}

fn annotate_fit(ax: &mut Axes, pp: &ProbPlot, opts: &PlotOptions) {
    if !opts.annotate_fit {
        return;
    }
    let (Some(fit), Some(bounds)) = (pp.fit_result(), ax.view_bounds()) else {
        return;
    };
    ax.annotate(fit.summary(), bounds.x_min, bounds.y_max);
}

#[cfg(test)]
mod tests {
    use super::*;
    use dv_core::Series;
    use dv_stats::{ProbPlotConfig, ReferenceLine};

    fn sample() -> Vec<f64> {
        vec![2.1, -0.4, 0.3, 1.7, -1.2, 0.9, -0.1, 0.5, -2.3, 1.1]
    }

    #[test]
    fn test_qqplot_pairs_quantiles() {
        let pp = ProbPlot::new(&sample()).unwrap();
        let mut ax = Axes::new();
        pp.qqplot(&mut ax, &PlotOptions::default()).unwrap();
        assert_eq!(ax.x_label, "Theoretical Quantiles");
        assert_eq!(ax.y_label, "Sample Quantiles");
        assert_eq!(ax.series.len(), 1);
        let points = ax.series[0].points();
        assert_eq!(points.len(), 10);
        assert_eq!(points[0], (pp.theoretical_quantiles()[0], -2.3));
    }

    #[test]
    fn test_reference_line_added_after_points() {
        let pp = ProbPlot::new(&sample()).unwrap();
        let mut ax = Axes::new();
        let opts = PlotOptions::default().with_line(ReferenceLine::Standardized);
        pp.qqplot(&mut ax, &opts).unwrap();
        assert_eq!(ax.series.len(), 2);
        assert!(matches!(ax.series[1], Series::Line { .. }));
    }

    #[test]
    fn test_ppplot_limits() {
        let pp = ProbPlot::new(&sample()).unwrap();
        let mut ax = Axes::new();
        pp.ppplot(&mut ax, &PlotOptions::default()).unwrap();
        assert_eq!(ax.x_limits, Some((0.0, 1.0)));
        assert_eq!(ax.y_limits, Some((0.0, 1.0)));
        assert_eq!(ax.x_label, "Theoretical Probabilities");
    }

    #[test]
    fn test_probplot_exceedance_reverses_x() {
        let pp = ProbPlot::new(&sample()).unwrap();
        let mut ax = Axes::new();
        pp.probplot(&mut ax, &PlotOptions::default().with_exceed(true))
            .unwrap();
        assert_eq!(ax.x_label, "Probability of Exceedance (%)");
        let points = ax.series[0].points();
        assert!(points[0].0 > points[9].0);
        assert!(points[0].1 < points[9].1);
        let ticks = ax.x_ticks.as_ref().unwrap();
        assert_eq!(ticks.len(), 15);
        let (lo, hi) = ax.x_limits.unwrap();
        assert_eq!(lo, ticks[0].value);
        assert_eq!(hi, ticks[14].value);
    }

    #[test]
    fn test_against_size_mismatch() {
        let pp = ProbPlot::new(&sample()).unwrap();
        let mut ax = Axes::new();
        let short = [1.0, 2.0, 3.0];
        let err = pp
            .qqplot_against(&mut ax, &short, &PlotOptions::default())
            .unwrap_err();
        assert!(matches!(err, ViewError::ShapeMismatch(10, 3)));
    }

    #[test]
    fn test_against_probplot_uses_its_quantiles() {
        let data = sample();
        let pp = ProbPlot::new(&data).unwrap();
        let config = ProbPlotConfig::default().with_fit(true);
        let other = ProbPlot::with_config(&data, config).unwrap();
        let mut ax = Axes::new();
        pp.qqplot_against(&mut ax, &other, &PlotOptions::default())
            .unwrap();
        let points = ax.series[0].points();
        assert_eq!(points[0].0, other.sample_quantiles()[0]);
        assert_eq!(points[0].1, pp.sample_quantiles()[0]);
    }

    #[test]
    fn test_fit_annotation() {
        let config = ProbPlotConfig::default().with_fit(true);
        let pp = ProbPlot::with_config(&sample(), config).unwrap();
        let mut ax = Axes::new();
        pp.qqplot(&mut ax, &PlotOptions::default().with_fit_annotation())
            .unwrap();
        assert_eq!(ax.annotations.len(), 1);
        assert!(ax.annotations[0].text.starts_with("loc = "));
    }

    #[test]
    fn test_fit_annotation_on_every_plot() {
        let config = ProbPlotConfig::default().with_fit(true);
        let pp = ProbPlot::with_config(&sample(), config).unwrap();
        let other: Vec<f64> = sample().iter().map(|v| v * 2.0).collect();
        let opts = PlotOptions::default().with_fit_annotation();

        let mut ax = Axes::new();
        pp.ppplot(&mut ax, &opts).unwrap();
        assert_eq!(ax.annotations.len(), 1);
        assert_eq!((ax.annotations[0].x, ax.annotations[0].y), (0.0, 1.0));

        let mut ax = Axes::new();
        pp.ppplot_against(&mut ax, &other, &opts).unwrap();
        assert_eq!(ax.annotations.len(), 1);

        let mut ax = Axes::new();
        pp.qqplot_against(&mut ax, &other, &opts).unwrap();
        assert_eq!(ax.annotations.len(), 1);
        assert!(ax.annotations[0].text.starts_with("loc = "));
    }

    #[test]
    fn test_two_sample_quartile_line_uses_sample_quartiles() {
        let pp = ProbPlot::new(&sample()).unwrap();
        let other: Vec<f64> = sample().iter().map(|v| 3.0 * v + 1.0).collect();
        let mut ax = Axes::new();
        let opts = PlotOptions::default().with_line(ReferenceLine::Quartile);
        pp.qqplot_against(&mut ax, &other, &opts).unwrap();

        // y = (x - 1) / 3 exactly, so the quartile line has slope 1/3
        let line = ax.line_series().next().unwrap().points();
        let slope = (line[1].1 - line[0].1) / (line[1].0 - line[0].0);
        assert!((slope - 1.0 / 3.0).abs() < 1e-12);
        assert!((line[0].1 - (line[0].0 - 1.0) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_marker_alpha_rejected() {
        let pp = ProbPlot::new(&sample()).unwrap();
        let mut ax = Axes::new();
        let mut opts = PlotOptions::default();
        opts.marker.alpha = 2.0;
        assert!(matches!(
            pp.qqplot(&mut ax, &opts),
            Err(ViewError::Style(_))
        ));
    }
}
