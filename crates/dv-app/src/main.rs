//! `probplot` command-line entry point

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dv_core::Axes;
use dv_data::{add_constant, longley, CsvSource, NullConfig};
use dv_stats::{Ols, ProbPlot};
use dv_views::ProbPlotExt;

mod cli;
mod job;

use cli::Cli;
use job::{JobConfig, PlotKind};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let mut job = match &cli.config {
        Some(path) => JobConfig::load(path)?,
        None => JobConfig::default(),
    };
    cli.apply(&mut job)?;

    let sample = load_sample(cli, &job.nulls)?;
    let other = match (&cli.other, &cli.other_column) {
        (Some(path), Some(column)) => Some(
            CsvSource::read_column(path, column, &job.nulls)
                .with_context(|| format!("Failed to read column '{}' of {}", column, path.display()))?,
        ),
        _ => None,
    };

    let pp = ProbPlot::with_config(&sample, job.probplot.clone())
        .context("Failed to build probability plot")?;
    info!(nobs = pp.nobs(), reference = %pp.dist(), kind = ?job.kind, "Drawing plot");

    let mut ax = Axes::new();
    match (job.kind, &other) {
        (PlotKind::Qq, None) => pp.qqplot(&mut ax, &job.plot)?,
        (PlotKind::Qq, Some(other)) => pp.qqplot_against(&mut ax, other, &job.plot)?,
        (PlotKind::Pp, None) => pp.ppplot(&mut ax, &job.plot)?,
        (PlotKind::Pp, Some(other)) => pp.ppplot_against(&mut ax, other, &job.plot)?,
        (PlotKind::Prob, None) => pp.probplot(&mut ax, &job.plot)?,
        (PlotKind::Prob, Some(_)) => {
            bail!("probability plots compare against the reference distribution, not a second sample")
        }
    }

    dv_render::save(&ax, &cli.output, &job.render)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;
    info!(output = %cli.output.display(), "Done");
    Ok(())
}

fn load_sample(cli: &Cli, nulls: &NullConfig) -> Result<Vec<f64>> {
    if cli.longley {
        return longley_residuals();
    }
    match (&cli.input, &cli.column) {
        (Some(path), Some(column)) => CsvSource::read_column(path, column, nulls)
            .with_context(|| format!("Failed to read column '{}' of {}", column, path.display())),
        _ => bail!("either --longley or --input with --column is required"),
    }
}

/// Residuals of TOTEMP regressed on the Longley regressors plus a constant
fn longley_residuals() -> Result<Vec<f64>> {
    let data = longley::load().context("Failed to load Longley data")?;
    let exog = add_constant(&data.exog, false)?;
    let fit = Ols::fit(&data.endog, &exog).context("Longley regression failed")?;
    Ok(fit.resid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_longley_residuals_sum_to_zero() {
        let resid = longley_residuals().unwrap();
        assert_eq!(resid.len(), 16);
        assert!(resid.iter().sum::<f64>().abs() < 1e-3);
    }

    #[test]
    fn test_run_writes_svg() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("qq.svg");
        let cli = Cli::try_parse_from([
            "probplot",
            "--longley",
            "--dist",
            "t:4",
            "--line",
            "r",
            "-o",
            output.to_str().unwrap(),
        ])
        .unwrap();
        run(&cli).unwrap();
        let svg = std::fs::read_to_string(&output).unwrap();
        assert!(svg.contains("Theoretical Quantiles"));
    }

    #[test]
    fn test_run_writes_png_probability_plot() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("prob.png");
        let cli = Cli::try_parse_from([
            "probplot",
            "--longley",
            "-k",
            "prob",
            "--line",
            "r",
            "--title",
            "Longley residuals",
            "-o",
            output.to_str().unwrap(),
        ])
        .unwrap();
        run(&cli).unwrap();
        let bytes = std::fs::read(&output).unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_run_two_samples_from_csv() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("samples.csv");
        let mut file = std::fs::File::create(&input).unwrap();
        writeln!(file, "a,b").unwrap();
        for i in 0..20 {
            writeln!(file, "{},{}", i as f64 * 0.5, (i as f64).sqrt()).unwrap();
        }
        let output = dir.path().join("pp.svg");
        let args = [
            "probplot",
            "-i",
            input.to_str().unwrap(),
            "-c",
            "a",
            "--other",
            input.to_str().unwrap(),
            "--other-column",
            "b",
            "--kind",
            "pp",
            "--line",
            "45",
            "-o",
            output.to_str().unwrap(),
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        run(&cli).unwrap();
        let svg = std::fs::read_to_string(&output).unwrap();
        assert!(svg.contains("Probabilities of 2nd Sample"));
    }

    #[test]
    fn test_probplot_rejects_second_sample() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("s.csv");
        std::fs::write(&input, "x\n1\n2\n3\n").unwrap();
        let cli = Cli::try_parse_from([
            "probplot",
            "-i",
            input.to_str().unwrap(),
            "-c",
            "x",
            "--other",
            input.to_str().unwrap(),
            "--other-column",
            "x",
            "-k",
            "prob",
            "-o",
            dir.path().join("p.svg").to_str().unwrap(),
        ])
        .unwrap();
        assert!(run(&cli).is_err());
    }
}
