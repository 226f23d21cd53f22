//! Command-line parsing for the BCA assay calculator.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the modeling/math code. In particular the
//! dilution factor is a plain flag here: the numeric core never prompts.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "bca", version, about = "BCA assay standard-curve calculator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit the standard curve, resolve unknowns, and print the results table.
    Fit(FitArgs),
    /// Fit the standard curve only and print the model (no unknowns needed).
    Curve(CurveArgs),
    /// Plot a previously exported model JSON.
    Plot(PlotArgs),
}

/// Options for the full fit-and-resolve run.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Experiment name (used for the output directory and report header).
    #[arg(short = 'e', long, default_value = "bca-run")]
    pub experiment: String,

    /// Standards CSV: concentration in the first column, replicates after.
    #[arg(long, default_value = "standards.csv")]
    pub standards: PathBuf,

    /// Unknowns CSV: sample id in the first column (one "Blank" required).
    #[arg(long, default_value = "unknowns.csv")]
    pub unknowns: PathBuf,

    /// Dilution factor applied to the unknowns (1 = none; must be > 0).
    #[arg(short = 'd', long, default_value_t = 1.0)]
    pub dilution: f64,

    /// Render an ASCII plot of the standard curve.
    #[arg(long)]
    pub plot: bool,

    /// Plot width in characters.
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height in characters.
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Write the combined results CSV into the experiment directory.
    #[arg(long)]
    pub export: bool,

    /// Write the fitted model JSON into the experiment directory.
    #[arg(long)]
    pub export_model: bool,

    /// Move the input CSVs into the experiment directory after a successful
    /// run.
    #[arg(long)]
    pub archive_inputs: bool,
}

/// Options for curve-only fitting.
#[derive(Debug, Parser, Clone)]
pub struct CurveArgs {
    /// Experiment name (used for the report header).
    #[arg(short = 'e', long, default_value = "bca-run")]
    pub experiment: String,

    /// Standards CSV: concentration in the first column, replicates after.
    #[arg(long, default_value = "standards.csv")]
    pub standards: PathBuf,

    /// Render an ASCII plot of the standard curve.
    #[arg(long)]
    pub plot: bool,

    /// Plot width in characters.
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height in characters.
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Write the fitted model JSON to this path.
    #[arg(long)]
    pub export_model: Option<PathBuf>,
}

/// Options for plotting a saved model.
#[derive(Debug, Parser, Clone)]
pub struct PlotArgs {
    /// Model JSON produced by `--export-model`.
    pub model: PathBuf,

    /// Plot width in characters.
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height in characters.
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}
