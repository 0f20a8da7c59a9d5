//! Core functionality for the data visualization platform
//!
//! This crate provides the plotting-library-neutral description of a chart
//! ([`Axes`]) together with the style vocabulary shared by the plot builders
//! and the renderer.

pub mod axes;
pub mod style;

// Re-export commonly used types
pub use axes::{Annotation, Axes, Bounds, Series, Tick};
pub use style::{
    categorical_color, Color, LineStyle, Marker, MarkerStyle, StyleError,
};
