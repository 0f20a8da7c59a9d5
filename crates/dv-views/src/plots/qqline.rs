//! Reference lines overlaid on goodness-of-fit plots

use dv_core::{Axes, LineStyle};
use dv_stats::{reference_line_points, ReferenceDistribution, ReferenceLine};
use tracing::{debug, warn};

use crate::Result;

/// Draw a reference line for the plotted pairs `x`, `y`.
///
/// `dist` is only consulted by [`ReferenceLine::Quartile`]; pass `None`
/// when `x` holds a second sample rather than theoretical values.
pub fn qqline(
    ax: &mut Axes,
    line: ReferenceLine,
    x: &[f64],
    y: &[f64],
    dist: Option<&ReferenceDistribution>,
    style: &LineStyle,
) -> Result<()> {
    let points = reference_line_points(line, x, y, dist)?;
    if points.windows(2).all(|w| w[0] == w[1]) {
        warn!(line = %line, "Reference line collapses to a single point");
    }
    debug!(line = %line, ?points, "Adding reference line");
    ax.plot_line(points, style.clone()).label_last(line_label(line));
    Ok(())
}

fn line_label(line: ReferenceLine) -> &'static str {
    match line {
        ReferenceLine::Identity => "45-degree line",
        ReferenceLine::Standardized => "standardized line",
        ReferenceLine::Regression => "regression line",
        ReferenceLine::Quartile => "quartile line",
        ReferenceLine::Robust => "robust line",
    }
}
