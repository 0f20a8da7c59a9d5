//! Drawing an [`Axes`] onto any plotters backend

use std::ops::Range;

use dv_core::{Axes, Marker, Series, Tick};
use plotters::coord::ranged1d::{KeyPointHint, NoDefaultFormatting, ValueFormatter};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use tracing::debug;

use crate::{RenderConfig, RenderError, Result};

const FONT: &str = "sans-serif";

fn rgba(color: dv_core::Color) -> RGBAColor {
    RGBAColor(color.r, color.g, color.b, color.a)
}

fn drawing<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Drawing(e.to_string())
}

pub(crate) fn draw_axes<DB: DrawingBackend>(
    backend: DB,
    axes: &Axes,
    config: &RenderConfig,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    if axes.is_empty() {
        return Err(RenderError::InvalidData("axes hold no points".to_string()));
    }
    let bounds = axes
        .view_bounds()
        .ok_or_else(|| RenderError::InvalidData("axes hold no finite points".to_string()))?;
    let finite = [bounds.x_min, bounds.x_max, bounds.y_min, bounds.y_max]
        .iter()
        .all(|v| v.is_finite());
    if !finite || bounds.x_min >= bounds.x_max || bounds.y_min >= bounds.y_max {
        return Err(RenderError::InvalidData(format!(
            "cannot draw view x {}..{}, y {}..{}",
            bounds.x_min, bounds.x_max, bounds.y_min, bounds.y_max
        )));
    }

    let root = backend.into_drawing_area();
    root.fill(&rgba(config.background)).map_err(drawing)?;

    let x_axis = TickedAxis::new(axes, bounds.x_min..bounds.x_max);
    let y_precision = precision(&RangedCoordf64::from(bounds.y_min..bounds.y_max).key_points(10));

    let mut builder = ChartBuilder::on(&root);
    builder
        .margin(config.margin)
        .x_label_area_size(config.label_font_size * 3)
        .y_label_area_size(config.label_font_size * 4);
    if let Some(title) = &axes.title {
        builder.caption(title, (FONT, config.title_font_size));
    }
    let mut chart = builder
        .build_cartesian_2d(x_axis, bounds.y_min..bounds.y_max)
        .map_err(|e| RenderError::ChartConfig(e.to_string()))?;

    let y_formatter = |y: &f64| format_number(*y, y_precision);
    let mut mesh = chart.configure_mesh();
    mesh.x_desc(axes.x_label.as_str())
        .y_desc(axes.y_label.as_str())
        .label_style((FONT, config.label_font_size))
        .y_label_formatter(&y_formatter);
    if !config.show_grid {
        mesh.disable_mesh();
    }
    mesh.draw().map_err(drawing)?;

    let mut has_legend = false;
    for series in &axes.series {
        match series {
            Series::Line {
                points,
                style,
                label,
            } => {
                let stroke = rgba(style.color).stroke_width(style.width);
                let anno = chart
                    .draw_series(LineSeries::new(points.iter().copied(), stroke))
                    .map_err(drawing)?;
                if let Some(label) = label {
                    has_legend = true;
                    anno.label(label.as_str()).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], stroke)
                    });
                }
            }
            Series::Scatter {
                points,
                style,
                label,
            } => {
                let s = style.size.max(1) as i32;
                let fill = rgba(style.effective_face()).filled();
                let edge = rgba(style.effective_edge()).stroke_width(1);
                let stroke = rgba(style.effective_edge()).stroke_width(2);
                let pts = points
                    .iter()
                    .copied()
                    .filter(|(x, y)| x.is_finite() && y.is_finite());

                let anno = match style.marker {
                    Marker::Circle => chart.draw_series(pts.map(|p| {
                        EmptyElement::at(p)
                            + Circle::new((0, 0), s, fill)
                            + Circle::new((0, 0), s, edge)
                    })),
                    Marker::Point => chart.draw_series(
                        pts.map(|p| EmptyElement::at(p) + Circle::new((0, 0), (s / 2).max(1), fill)),
                    ),
                    Marker::Square => chart.draw_series(pts.map(|p| {
                        EmptyElement::at(p)
                            + Rectangle::new([(-s, -s), (s, s)], fill)
                            + Rectangle::new([(-s, -s), (s, s)], edge)
                    })),
                    Marker::Diamond
                    | Marker::ThinDiamond
                    | Marker::TriangleUp
                    | Marker::TriangleDown => {
                        let outline = outline(style.marker, s);
                        let mut closed = outline.clone();
                        closed.push(outline[0]);
                        chart.draw_series(pts.map(|p| {
                            EmptyElement::at(p)
                                + Polygon::new(outline.clone(), fill)
                                + PathElement::new(closed.clone(), edge)
                        }))
                    }
                    Marker::Cross => chart.draw_series(
                        pts.map(|p| EmptyElement::at(p) + Cross::new((0, 0), s, stroke)),
                    ),
                    Marker::Plus => chart.draw_series(pts.map(|p| {
                        EmptyElement::at(p)
                            + PathElement::new(vec![(-s, 0), (s, 0)], stroke)
                            + PathElement::new(vec![(0, -s), (0, s)], stroke)
                    })),
                }
                .map_err(drawing)?;

                if let Some(label) = label {
                    has_legend = true;
                    let swatch = if style.marker.is_filled() { fill } else { stroke };
                    anno.label(label.as_str())
                        .legend(move |(x, y)| Circle::new((x + 10, y), s, swatch));
                }
            }
        }
    }

    for note in &axes.annotations {
        chart
            .draw_series(std::iter::once(Text::new(
                note.text.clone(),
                (note.x, note.y),
                (FONT, config.label_font_size).into_font(),
            )))
            .map_err(drawing)?;
    }

    if has_legend {
        chart
            .configure_series_labels()
            .background_style(&rgba(config.background).mix(0.8))
            .border_style(&BLACK)
            .label_font((FONT, config.label_font_size))
            .position(SeriesLabelPosition::UpperLeft)
            .draw()
            .map_err(drawing)?;
    }

    root.present().map_err(drawing)?;
    debug!(
        series = axes.series.len(),
        annotations = axes.annotations.len(),
        "Rendered chart"
    );
    Ok(())
}

/// Linear f64 x axis whose grid lines and labels are fixed up front.
///
/// With explicit ticks on the [`Axes`] only those inside the view are
/// drawn, each with its own label. Otherwise the usual evenly spaced key
/// points are used and printed to a shared precision.
struct TickedAxis {
    coord: RangedCoordf64,
    ticks: Vec<Tick>,
}

impl TickedAxis {
    fn new(axes: &Axes, range: Range<f64>) -> Self {
        let coord = RangedCoordf64::from(range.clone());
        let ticks = match &axes.x_ticks {
            Some(ticks) => ticks
                .iter()
                .filter(|t| (range.start..=range.end).contains(&t.value))
                .cloned()
                .collect(),
            None => {
                let keys = coord.key_points(10);
                let precision = precision(&keys);
                keys.into_iter()
                    .map(|value| Tick {
                        value,
                        label: format_number(value, precision),
                    })
                    .collect()
            }
        };
        Self { coord, ticks }
    }
}

impl Ranged for TickedAxis {
    type FormatOption = NoDefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.coord.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        // No light grid between labelled ticks
        if hint.weight().allow_light_points() {
            return Vec::new();
        }
        self.ticks.iter().map(|t| t.value).collect()
    }

    fn range(&self) -> Range<f64> {
        self.coord.range()
    }
}

impl ValueFormatter<f64> for TickedAxis {
    fn format_ext(&self, value: &f64) -> String {
        tick_label(Some(&self.ticks), *value, 2)
    }
}

/// Decimal places needed to tell neighbouring ticks apart
fn precision(keys: &[f64]) -> usize {
    let step = keys
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(f64::INFINITY, f64::min);
    if !step.is_finite() || step <= 0.0 {
        return 2;
    }
    (-step.log10().floor()).clamp(0.0, 8.0) as usize
}

fn tick_label(ticks: Option<&[Tick]>, value: f64, precision: usize) -> String {
    ticks
        .and_then(|ticks| {
            ticks
                .iter()
                .find(|t| (t.value - value).abs() <= 1e-9 * t.value.abs().max(1.0))
        })
        .map(|t| t.label.clone())
        .unwrap_or_else(|| format_number(value, precision))
}

fn format_number(value: f64, precision: usize) -> String {
    // Avoid "-0.0"
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:.*}", precision, value)
}

fn outline(marker: Marker, s: i32) -> Vec<(i32, i32)> {
    match marker {
        Marker::ThinDiamond => {
            let w = (s * 3 / 5).max(1);
            vec![(0, -s), (w, 0), (0, s), (-w, 0)]
        }
        Marker::TriangleUp => vec![(0, -s), (s, s), (-s, s)],
        Marker::TriangleDown => vec![(0, s), (s, -s), (-s, -s)],
        _ => vec![(0, -s), (s, 0), (0, s), (-s, 0)],
    }
}
