use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use dv_stats::{Family, ReferenceLine};

use crate::job::{JobConfig, PlotKind};

/// Draw Q-Q, P-P and probability plots of a sample
#[derive(Parser, Debug)]
#[command(name = "probplot", version)]
pub struct Cli {
    /// CSV file holding the sample
    #[arg(short, long, required_unless_present = "longley", requires = "column")]
    pub input: Option<PathBuf>,

    /// Column of the sample in the input file
    #[arg(short, long)]
    pub column: Option<String>,

    /// Use the residuals of the bundled Longley regression as the sample
    #[arg(long, conflicts_with = "input")]
    pub longley: bool,

    /// CSV file holding a second sample to compare against
    #[arg(long, requires = "other_column")]
    pub other: Option<PathBuf>,

    #[arg(long)]
    pub other_column: Option<String>,

    #[arg(short, long, value_enum)]
    pub kind: Option<PlotKind>,

    /// Reference distribution, e.g. `normal` or `t:4`
    #[arg(long)]
    pub dist: Option<Family>,

    /// Fit loc/scale to the data
    #[arg(long)]
    pub fit: bool,

    #[arg(long, allow_hyphen_values = true)]
    pub loc: Option<f64>,

    #[arg(long)]
    pub scale: Option<f64>,

    /// Reference line: r, q, 45, s or robust
    #[arg(long)]
    pub line: Option<ReferenceLine>,

    #[arg(long)]
    pub xlabel: Option<String>,

    #[arg(long)]
    pub ylabel: Option<String>,

    #[arg(long)]
    pub title: Option<String>,

    /// Marker code such as `o`, `d` or `^`
    #[arg(long)]
    pub marker: Option<String>,

    /// Marker face color
    #[arg(long)]
    pub face: Option<String>,

    /// Marker edge color
    #[arg(long)]
    pub edge: Option<String>,

    #[arg(long)]
    pub alpha: Option<String>,

    /// Probability plots: show exceedance probabilities
    #[arg(long)]
    pub exceed: bool,

    /// Write the fitted loc/scale onto the chart
    #[arg(long)]
    pub annotate_fit: bool,

    /// JSON job file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output image, .svg or .png
    #[arg(short, long)]
    pub output: PathBuf,
}

impl Cli {
    /// Fold command-line overrides into a job
    pub fn apply(&self, job: &mut JobConfig) -> Result<()> {
        if let Some(kind) = self.kind {
            job.kind = kind;
        }
        if let Some(family) = self.dist {
            job.probplot.family = family;
        }
        if self.fit {
            job.probplot.fit = true;
        }
        if let Some(loc) = self.loc {
            job.probplot.loc = loc;
        }
        if let Some(scale) = self.scale {
            job.probplot.scale = scale;
        }
        if self.line.is_some() {
            job.plot.line = self.line;
        }
        if self.exceed {
            job.plot.exceed = true;
        }
        if self.annotate_fit {
            job.plot.annotate_fit = true;
        }

        let kwargs: Vec<(&str, &str)> = [
            ("xlabel", &self.xlabel),
            ("ylabel", &self.ylabel),
            ("title", &self.title),
            ("marker", &self.marker),
            ("markerfacecolor", &self.face),
            ("markeredgecolor", &self.edge),
            ("alpha", &self.alpha),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
        .collect();
        job.plot = job.plot.clone().with_kwargs(kwargs)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dv_core::{Color, Marker};

    #[test]
    fn test_parse_full_command() {
        let cli = Cli::try_parse_from([
            "probplot",
            "--input",
            "sample.csv",
            "--column",
            "resid",
            "--kind",
            "prob",
            "--dist",
            "t:4",
            "--line",
            "r",
            "--marker",
            "d",
            "--face",
            "cornflowerblue",
            "--edge",
            "white",
            "--alpha",
            "0.5",
            "--loc",
            "-1.5",
            "--output",
            "out.svg",
        ])
        .unwrap();
        let mut job = JobConfig::default();
        cli.apply(&mut job).unwrap();

        assert_eq!(job.kind, PlotKind::Prob);
        assert_eq!(job.probplot.family, Family::StudentsT { df: 4.0 });
        assert_eq!(job.probplot.loc, -1.5);
        assert_eq!(job.plot.line, Some(ReferenceLine::Regression));
        assert_eq!(job.plot.marker.marker, Marker::ThinDiamond);
        assert_eq!(job.plot.marker.edge_color, Color::WHITE);
        assert_eq!(job.plot.marker.alpha, 0.5);
    }

    #[test]
    fn test_flags_override_job_file_values() {
        let cli = Cli::try_parse_from(["probplot", "--longley", "--xlabel", "Resid", "-o", "a.png"])
            .unwrap();
        let mut job = JobConfig::default();
        job.plot.y_label = Some("From file".to_string());
        job.kind = PlotKind::Pp;
        cli.apply(&mut job).unwrap();
        assert_eq!(job.kind, PlotKind::Pp);
        assert_eq!(job.plot.x_label.as_deref(), Some("Resid"));
        assert_eq!(job.plot.y_label.as_deref(), Some("From file"));
    }

    #[test]
    fn test_input_or_longley_required() {
        assert!(Cli::try_parse_from(["probplot", "-o", "a.svg"]).is_err());
        assert!(Cli::try_parse_from(["probplot", "-i", "a.csv", "-o", "a.svg"]).is_err());
        assert!(Cli::try_parse_from(["probplot", "--line", "z", "--longley", "-o", "a.svg"]).is_err());
    }

    #[test]
    fn test_bad_color_rejected_on_apply() {
        let cli = Cli::try_parse_from(["probplot", "--longley", "--face", "nope", "-o", "a.svg"])
            .unwrap();
        assert!(cli.apply(&mut JobConfig::default()).is_err());
    }
}
