//! Plot job configuration loaded from JSON

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use dv_data::NullConfig;
use dv_render::RenderConfig;
use dv_stats::ProbPlotConfig;
use dv_views::PlotOptions;
use serde::{Deserialize, Serialize};

/// Which goodness-of-fit plot to draw
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlotKind {
    #[default]
    Qq,
    Pp,
    Prob,
}

/// Everything needed to draw one chart. Any section may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    pub kind: PlotKind,
    pub probplot: ProbPlotConfig,
    pub plot: PlotOptions,
    pub render: RenderConfig,
    pub nulls: NullConfig,
}

impl JobConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read job file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse job file {}", path.display()))
    }
}
