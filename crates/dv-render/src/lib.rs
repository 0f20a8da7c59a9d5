//! Rendering layer
//!
//! Turns a [`dv_core::Axes`] description into an image through `plotters`.
//! SVG output can go to a string or a file; PNG output goes to a file.

mod chart;

use std::path::Path;

use dv_core::{Axes, Color};
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while rendering a chart
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Output size and chart furniture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub title_font_size: u32,
    pub label_font_size: u32,
    pub show_grid: bool,
    pub background: Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            margin: 20,
            title_font_size: 24,
            label_font_size: 16,
            show_grid: true,
            background: Color::WHITE,
        }
    }
}

/// Render to an SVG document held in memory
pub fn render_svg(axes: &Axes, config: &RenderConfig) -> Result<String> {
    let mut svg = String::new();
    {
        let backend = SVGBackend::with_string(&mut svg, (config.width, config.height));
        chart::draw_axes(backend, axes, config)?;
    }
    Ok(svg)
}

pub fn save_svg(axes: &Axes, path: &Path, config: &RenderConfig) -> Result<()> {
    let backend = SVGBackend::new(path, (config.width, config.height));
    chart::draw_axes(backend, axes, config)?;
    info!(path = %path.display(), "Saved SVG chart");
    Ok(())
}

pub fn save_png(axes: &Axes, path: &Path, config: &RenderConfig) -> Result<()> {
    let backend = BitMapBackend::new(path, (config.width, config.height));
    chart::draw_axes(backend, axes, config)?;
    info!(path = %path.display(), "Saved PNG chart");
    Ok(())
}

/// Save with the format picked from the file extension
pub fn save(axes: &Axes, path: &Path, config: &RenderConfig) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "svg" => save_svg(axes, path, config),
        "png" => save_png(axes, path, config),
        other => Err(RenderError::UnsupportedFormat(other.to_string())),
    }
}
