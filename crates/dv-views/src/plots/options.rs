//! Plot options shared by the goodness-of-fit builders

use dv_core::{Color, LineStyle, Marker, MarkerStyle};
use dv_stats::ReferenceLine;
use serde::{Deserialize, Serialize};

use crate::{Result, ViewError};

/// How a goodness-of-fit plot is drawn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotOptions {
    /// Reference line to overlay, none by default
    pub line: Option<ReferenceLine>,
    /// Overrides the default x label
    pub x_label: Option<String>,
    /// Overrides the default y label
    pub y_label: Option<String>,
    pub title: Option<String>,
    pub marker: MarkerStyle,
    pub line_style: LineStyle,
    /// Probability plots only: plot exceedance instead of non-exceedance
    pub exceed: bool,
    /// Write the fitted loc/scale onto the chart
    pub annotate_fit: bool,
}

impl PlotOptions {
    pub fn with_line(mut self, line: ReferenceLine) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_labels(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = Some(x_label.into());
        self.y_label = Some(y_label.into());
        self
    }

    pub fn with_marker(mut self, marker: MarkerStyle) -> Self {
        self.marker = marker;
        self
    }

    pub fn with_exceed(mut self, exceed: bool) -> Self {
        self.exceed = exceed;
        self
    }

    pub fn with_fit_annotation(mut self) -> Self {
        self.annotate_fit = true;
        self
    }

    /// Options from matplotlib-style keyword pairs such as
    /// `("markerfacecolor", "cornflowerblue")`
    pub fn from_kwargs<'a, I>(kwargs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self::default().with_kwargs(kwargs)
    }

    /// Apply keyword pairs on top of these options
    pub fn with_kwargs<'a, I>(mut self, kwargs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in kwargs {
            self.apply(key, value)?;
        }
        self.marker.validate()?;
        Ok(self)
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = || ViewError::InvalidOption {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "marker" => self.marker.marker = value.parse::<Marker>()?,
            "markerfacecolor" | "mfc" => self.marker.face_color = value.parse::<Color>()?,
            "markeredgecolor" | "mec" => self.marker.edge_color = value.parse::<Color>()?,
            "color" | "c" => {
                let color = value.parse::<Color>()?;
                self.marker.face_color = color;
                self.marker.edge_color = color;
            }
            "alpha" => self.marker.alpha = value.trim().parse().map_err(|_| invalid())?,
            "markersize" | "ms" => {
                let size: f64 = value.trim().parse().map_err(|_| invalid())?;
                if !(size.is_finite() && size > 0.0) {
                    return Err(invalid());
                }
                self.marker.size = size.round().max(1.0) as u32;
            }
            "line" => {
                self.line = match value.trim() {
                    "" | "None" | "none" => None,
                    code => Some(code.parse()?),
                }
            }
            "linestyle" | "fmt" => self.line_style = value.parse()?,
            "xlabel" => self.x_label = Some(value.to_string()),
            "ylabel" => self.y_label = Some(value.to_string()),
            "title" => self.title = Some(value.to_string()),
            "exceed" => self.exceed = value.trim().parse().map_err(|_| invalid())?,
            other => return Err(ViewError::UnknownOption(other.to_string())),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dv_core::StyleError;

    #[test]
    fn test_defaults() {
        let opts = PlotOptions::default();
        assert_eq!(opts.line, None);
        assert_eq!(opts.marker, MarkerStyle::default());
        assert_eq!(opts.line_style.color, Color::RED);
        assert!(!opts.exceed);
    }

    #[test]
    fn test_marker_kwargs() {
        let opts = PlotOptions::from_kwargs([
            ("marker", "d"),
            ("markerfacecolor", "cornflowerblue"),
            ("markeredgecolor", "white"),
            ("alpha", "0.5"),
        ])
        .unwrap();
        assert_eq!(opts.marker.marker, Marker::ThinDiamond);
        assert_eq!(opts.marker.face_color, Color::rgb(100, 149, 237));
        assert_eq!(opts.marker.edge_color, Color::WHITE);
        assert_eq!(opts.marker.alpha, 0.5);
    }

    #[test]
    fn test_line_and_labels() {
        let opts = PlotOptions::from_kwargs([
            ("line", "45"),
            ("xlabel", "Custom X-Label"),
            ("ylabel", "Custom Y-Label"),
            ("markersize", "6.4"),
        ])
        .unwrap();
        assert_eq!(opts.line, Some(ReferenceLine::Identity));
        assert_eq!(opts.x_label.as_deref(), Some("Custom X-Label"));
        assert_eq!(opts.marker.size, 6);

        let none = opts.with_kwargs([("line", "None")]).unwrap();
        assert_eq!(none.line, None);
    }

    #[test]
    fn test_unknown_key() {
        let err = PlotOptions::from_kwargs([("markerstyle", "o")]).unwrap_err();
        assert!(matches!(err, ViewError::UnknownOption(key) if key == "markerstyle"));
    }

    #[test]
    fn test_bad_values() {
        assert!(matches!(
            PlotOptions::from_kwargs([("alpha", "lots")]),
            Err(ViewError::InvalidOption { .. })
        ));
        assert!(matches!(
            PlotOptions::from_kwargs([("alpha", "1.5")]),
            Err(ViewError::Style(StyleError::InvalidAlpha(_)))
        ));
        assert!(matches!(
            PlotOptions::from_kwargs([("marker", "*")]),
            Err(ViewError::Style(StyleError::UnknownMarker(_)))
        ));
        assert!(matches!(
            PlotOptions::from_kwargs([("line", "z")]),
            Err(ViewError::Stats(_))
        ));
    }

    #[test]
    fn test_serde_round_trip() {
        let opts = PlotOptions::default().with_line(ReferenceLine::Quartile);
        let json = serde_json::to_string(&opts).unwrap();
        let back: PlotOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, opts);
        let partial: PlotOptions = serde_json::from_str(r#"{"line": "r"}"#).unwrap();
        assert_eq!(partial.line, Some(ReferenceLine::Regression));
    }
}
