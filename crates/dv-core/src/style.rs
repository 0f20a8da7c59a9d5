//! Colors, markers and line styles for plots

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while parsing style codes
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleError {
    #[error("Unknown color: {0}")]
    UnknownColor(String),

    #[error("Unknown marker: {0}")]
    UnknownMarker(String),

    #[error("Alpha must lie within [0, 1], got {0}")]
    InvalidAlpha(f64),

    #[error("Line width must be positive")]
    InvalidWidth,
}

/// An RGBA color. Alpha is a fraction in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same color with a different alpha, clamped to `[0, 1]`
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            a: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        match digits.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self {
                r: channel(0)?,
                g: channel(2)?,
                b: channel(4)?,
                a: channel(6)? as f64 / 255.0,
            }),
            _ => None,
        }
    }

    fn named(name: &str) -> Option<Self> {
        // Single-letter codes follow matplotlib's base colors
        let rgb = match name {
            "b" => (0, 0, 255),
            "g" => (0, 128, 0),
            "r" => (255, 0, 0),
            "c" => (0, 191, 191),
            "m" => (191, 0, 191),
            "y" => (191, 191, 0),
            "k" | "black" => (0, 0, 0),
            "w" | "white" => (255, 255, 255),
            "red" => (255, 0, 0),
            "green" => (0, 128, 0),
            "blue" => (0, 0, 255),
            "cyan" => (0, 255, 255),
            "magenta" => (255, 0, 255),
            "yellow" => (255, 255, 0),
            "gray" | "grey" => (128, 128, 128),
            "lightgray" | "lightgrey" => (211, 211, 211),
            "darkgray" | "darkgrey" => (169, 169, 169),
            "orange" => (255, 165, 0),
            "darkorange" => (255, 140, 0),
            "purple" => (128, 0, 128),
            "brown" => (165, 42, 42),
            "pink" => (255, 192, 203),
            "olive" => (128, 128, 0),
            "navy" => (0, 0, 128),
            "teal" => (0, 128, 128),
            "maroon" => (128, 0, 0),
            "lime" => (0, 255, 0),
            "gold" => (255, 215, 0),
            "silver" => (192, 192, 192),
            "indigo" => (75, 0, 130),
            "crimson" => (220, 20, 60),
            "tomato" => (255, 99, 71),
            "salmon" => (250, 128, 114),
            "coral" => (255, 127, 80),
            "orchid" => (218, 112, 214),
            "skyblue" => (135, 206, 235),
            "lightblue" => (173, 216, 230),
            "steelblue" => (70, 130, 180),
            "royalblue" => (65, 105, 225),
            "cornflowerblue" => (100, 149, 237),
            "darkblue" => (0, 0, 139),
            "darkred" => (139, 0, 0),
            "darkgreen" => (0, 100, 0),
            "forestgreen" => (34, 139, 34),
            "firebrick" => (178, 34, 34),
            "slategray" | "slategrey" => (112, 128, 144),
            _ => return None,
        };
        Some(Self::rgb(rgb.0, rgb.1, rgb.2))
    }

    fn cycle(code: &str) -> Option<Self> {
        let index: usize = code.strip_prefix('C')?.parse().ok()?;
        Some(categorical_color(index))
    }
}

impl Default for Color {
    fn default() -> Self {
        categorical_color(0)
    }
}

impl FromStr for Color {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lowered = trimmed.to_ascii_lowercase();
        Color::from_hex(trimmed)
            .or_else(|| Color::cycle(trimmed))
            .or_else(|| Color::named(trimmed))
            .or_else(|| Color::named(&lowered))
            .ok_or_else(|| StyleError::UnknownColor(s.to_string()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a < 1.0 {
            write!(f, "{:02x}", (self.a * 255.0).round() as u8)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Color {
    type Error = StyleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Get a categorical color from the default palette
pub fn categorical_color(index: usize) -> Color {
    const PALETTE: &[Color] = &[
        Color::rgb(31, 119, 180),  // Blue
        Color::rgb(255, 127, 14),  // Orange
        Color::rgb(44, 160, 44),   // Green
        Color::rgb(214, 39, 40),   // Red
        Color::rgb(148, 103, 189), // Purple
        Color::rgb(140, 86, 75),   // Brown
        Color::rgb(227, 119, 194), // Pink
        Color::rgb(127, 127, 127), // Gray
        Color::rgb(188, 189, 34),  // Olive
        Color::rgb(23, 190, 207),  // Cyan
    ];
    PALETTE[index % PALETTE.len()]
}

/// Marker shapes, parsed from matplotlib-style codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Marker {
    Circle,
    Point,
    Square,
    Diamond,
    ThinDiamond,
    TriangleUp,
    TriangleDown,
    Cross,
    Plus,
}

impl Marker {
    pub fn code(&self) -> &'static str {
        match self {
            Marker::Circle => "o",
            Marker::Point => ".",
            Marker::Square => "s",
            Marker::Diamond => "D",
            Marker::ThinDiamond => "d",
            Marker::TriangleUp => "^",
            Marker::TriangleDown => "v",
            Marker::Cross => "x",
            Marker::Plus => "+",
        }
    }

    /// Whether the shape has an interior that takes the face color
    pub fn is_filled(&self) -> bool {
        !matches!(self, Marker::Cross | Marker::Plus)
    }
}

impl FromStr for Marker {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "o" | "circle" => Ok(Marker::Circle),
            "." | "point" => Ok(Marker::Point),
            "s" | "square" => Ok(Marker::Square),
            "D" | "diamond" => Ok(Marker::Diamond),
            "d" | "thin_diamond" => Ok(Marker::ThinDiamond),
            "^" | "triangle_up" => Ok(Marker::TriangleUp),
            "v" | "triangle_down" => Ok(Marker::TriangleDown),
            "x" | "cross" => Ok(Marker::Cross),
            "+" | "plus" => Ok(Marker::Plus),
            other => Err(StyleError::UnknownMarker(other.to_string())),
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<String> for Marker {
    type Error = StyleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Marker> for String {
    fn from(marker: Marker) -> Self {
        marker.code().to_string()
    }
}

/// Styling of scatter markers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    pub marker: Marker,
    /// Marker radius in pixels
    pub size: u32,
    pub face_color: Color,
    pub edge_color: Color,
    /// Opacity applied on top of the face and edge colors
    pub alpha: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            marker: Marker::Circle,
            size: 4,
            face_color: categorical_color(0),
            edge_color: categorical_color(0),
            alpha: 1.0,
        }
    }
}

impl MarkerStyle {
    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }

    pub fn with_face_color(mut self, color: Color) -> Self {
        self.face_color = color;
        self
    }

    pub fn with_edge_color(mut self, color: Color) -> Self {
        self.edge_color = color;
        self
    }

    /// Set both face and edge color
    pub fn with_color(self, color: Color) -> Self {
        self.with_face_color(color).with_edge_color(color)
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn validate(&self) -> Result<(), StyleError> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(StyleError::InvalidAlpha(self.alpha));
        }
        Ok(())
    }

    /// Face color with the marker alpha folded in
    pub fn effective_face(&self) -> Color {
        self.face_color.with_alpha(self.face_color.a * self.alpha)
    }

    /// Edge color with the marker alpha folded in
    pub fn effective_edge(&self) -> Color {
        self.edge_color.with_alpha(self.edge_color.a * self.alpha)
    }
}

/// Styling of line series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineStyle {
    pub color: Color,
    /// Stroke width in pixels
    pub width: u32,
}

impl Default for LineStyle {
    /// A solid red line, the conventional `r-` reference line
    fn default() -> Self {
        Self {
            color: Color::RED,
            width: 2,
        }
    }
}

impl LineStyle {
    pub fn new(color: Color, width: u32) -> Result<Self, StyleError> {
        if width == 0 {
            return Err(StyleError::InvalidWidth);
        }
        Ok(Self { color, width })
    }
}

impl FromStr for LineStyle {
    type Err = StyleError;

    /// Parses a format string such as `r-` or `k`. Dashes are accepted and
    /// drawn solid.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let color = s.trim().trim_end_matches(['-', ':', '.']);
        if color.is_empty() {
            return Ok(Self::default());
        }
        Ok(Self {
            color: color.parse()?,
            ..Self::default()
        })
    }
}
