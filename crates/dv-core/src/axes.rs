//! Plotting-library-neutral chart description
//!
//! An [`Axes`] collects everything a renderer needs to draw one chart:
//! point and line series, axis labels, limits and custom ticks. Plot
//! builders only ever talk to this type, so they stay independent of the
//! drawing backend.

use serde::{Deserialize, Serialize};

use crate::style::{LineStyle, MarkerStyle};

/// A single drawable series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Series {
    Scatter {
        points: Vec<(f64, f64)>,
        style: MarkerStyle,
        label: Option<String>,
    },
    Line {
        points: Vec<(f64, f64)>,
        style: LineStyle,
        label: Option<String>,
    },
}

impl Series {
    pub fn points(&self) -> &[(f64, f64)] {
        match self {
            Series::Scatter { points, .. } | Series::Line { points, .. } => points,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Series::Scatter { label, .. } | Series::Line { label, .. } => label.as_deref(),
        }
    }

    pub fn is_line(&self) -> bool {
        matches!(self, Series::Line { .. })
    }
}

/// A tick on the x axis at a data coordinate with a custom label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

/// Free text placed at a data coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// Rectangular extent in data coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    fn from_point((x, y): (f64, f64)) -> Self {
        Self {
            x_min: x,
            x_max: x,
            y_min: y,
            y_max: y,
        }
    }

    fn include(&mut self, (x, y): (f64, f64)) {
        self.x_min = self.x_min.min(x);
        self.x_max = self.x_max.max(x);
        self.y_min = self.y_min.min(y);
        self.y_max = self.y_max.max(y);
    }

    /// Widen each range by `fraction` of its span. Zero-width ranges get a
    /// unit span around their value.
    pub fn padded(&self, fraction: f64) -> Self {
        fn pad(lo: f64, hi: f64, fraction: f64) -> (f64, f64) {
            let span = hi - lo;
            if span <= f64::EPSILON * lo.abs().max(1.0) {
                (lo - 0.5, hi + 0.5)
            } else {
                (lo - span * fraction, hi + span * fraction)
            }
        }
        let (x_min, x_max) = pad(self.x_min, self.x_max, fraction);
        let (y_min, y_max) = pad(self.y_min, self.y_max, fraction);
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }
}

/// A chart under construction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Axes {
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
    pub x_limits: Option<(f64, f64)>,
    pub y_limits: Option<(f64, f64)>,
    pub x_ticks: Option<Vec<Tick>>,
    pub series: Vec<Series>,
    pub annotations: Vec<Annotation>,
}

impl Axes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    pub fn set_xlabel(&mut self, label: impl Into<String>) -> &mut Self {
        self.x_label = label.into();
        self
    }

    pub fn set_ylabel(&mut self, label: impl Into<String>) -> &mut Self {
        self.y_label = label.into();
        self
    }

    pub fn set_xlim(&mut self, min: f64, max: f64) -> &mut Self {
        self.x_limits = Some((min.min(max), min.max(max)));
        self
    }

    pub fn set_ylim(&mut self, min: f64, max: f64) -> &mut Self {
        self.y_limits = Some((min.min(max), min.max(max)));
        self
    }

    pub fn set_xticks(&mut self, ticks: Vec<Tick>) -> &mut Self {
        self.x_ticks = Some(ticks);
        self
    }

    /// Add a scatter series of paired x/y values
    pub fn scatter(&mut self, x: &[f64], y: &[f64], style: MarkerStyle) -> &mut Self {
        let points = x.iter().copied().zip(y.iter().copied()).collect();
        self.series.push(Series::Scatter {
            points,
            style,
            label: None,
        });
        self
    }

    /// Add a polyline through the given points
    pub fn plot_line(&mut self, points: Vec<(f64, f64)>, style: LineStyle) -> &mut Self {
        self.series.push(Series::Line {
            points,
            style,
            label: None,
        });
        self
    }

    /// Label the most recently added series
    pub fn label_last(&mut self, text: impl Into<String>) -> &mut Self {
        if let Some(Series::Scatter { label, .. } | Series::Line { label, .. }) =
            self.series.last_mut()
        {
            *label = Some(text.into());
        }
        self
    }

    pub fn annotate(&mut self, text: impl Into<String>, x: f64, y: f64) -> &mut Self {
        self.annotations.push(Annotation {
            text: text.into(),
            x,
            y,
        });
        self
    }

    pub fn scatter_series(&self) -> impl Iterator<Item = &Series> {
        self.series.iter().filter(|s| !s.is_line())
    }

    pub fn line_series(&self) -> impl Iterator<Item = &Series> {
        self.series.iter().filter(|s| s.is_line())
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points().is_empty())
    }

    /// Extent of all finite points across every series
    pub fn data_bounds(&self) -> Option<Bounds> {
        let mut points = self
            .series
            .iter()
            .flat_map(|s| s.points().iter().copied())
            .filter(|(x, y)| x.is_finite() && y.is_finite());
        let mut bounds = Bounds::from_point(points.next()?);
        for point in points {
            bounds.include(point);
        }
        Some(bounds)
    }

    /// The region a renderer should show: explicit limits where set,
    /// padded data bounds elsewhere.
    pub fn view_bounds(&self) -> Option<Bounds> {
        let data = self.data_bounds().map(|b| b.padded(0.05));
        let (x_min, x_max) = match (self.x_limits, data) {
            (Some(lim), _) => lim,
            (None, Some(b)) => (b.x_min, b.x_max),
            (None, None) => return None,
        };
        let (y_min, y_max) = match (self.y_limits, data) {
            (Some(lim), _) => lim,
            (None, Some(b)) => (b.y_min, b.y_max),
            (None, None) => return None,
        };
        Some(Bounds {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }
}
