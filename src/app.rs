//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs ingest + fit + resolution
//! - prints reports/plots
//! - writes optional exports and, last of all, archives the inputs

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::cli::{Command, CurveArgs, FitArgs, PlotArgs};
use crate::domain::RunConfig;
use crate::error::{AppError, ErrorKind};

pub mod pipeline;

/// Entry point for the `bca` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Curve(args) => handle_curve(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let run = pipeline::run_assay(&config)?;

    println!(
        "{}",
        crate::report::format_run_summary(&config.experiment_name, &run.standards, &run.model)
    );
    println!("{}", crate::report::format_standards_table(&run.standards));
    println!("{}", crate::report::format_results_table(&run.resolution));

    for row_error in &run.row_errors {
        eprintln!(
            "skipped row {} ({}): {}",
            row_error.line,
            row_error.id.as_deref().unwrap_or("?"),
            row_error.message
        );
    }

    if config.plot {
        let plot = crate::plot::render_standard_curve(
            &run.standards,
            &run.model,
            &run.resolution.samples,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    if let Some(path) = &config.export_results {
        ensure_parent_dir(path)?;
        crate::io::export::write_results_csv(path, &run.standards, &run.model, &run.resolution)?;
    }
    if let Some(path) = &config.export_model {
        ensure_parent_dir(path)?;
        crate::io::model_file::write_model_json(
            path,
            &config.experiment_name,
            &run.model,
            &run.standards,
        )?;
    }

    // File moves happen only once everything above has succeeded; they are a
    // side effect of a finished run, not part of the computation.
    if config.archive_inputs {
        archive_inputs(&config)?;
    }

    Ok(())
}

fn handle_curve(args: CurveArgs) -> Result<(), AppError> {
    let standards = crate::io::ingest::load_standards(&args.standards)?;
    let model = crate::fit::fit_standard_curve(&standards.points)?;

    println!(
        "{}",
        crate::report::format_run_summary(&args.experiment, &standards.points, &model)
    );
    println!(
        "{}",
        crate::report::format_standards_table(&standards.points)
    );

    if args.plot {
        let plot = crate::plot::render_standard_curve(
            &standards.points,
            &model,
            &[],
            args.width,
            args.height,
        );
        println!("{plot}");
    }

    if let Some(path) = &args.export_model {
        ensure_parent_dir(path)?;
        crate::io::model_file::write_model_json(path, &args.experiment, &model, &standards.points)?;
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let model_file = crate::io::model_file::read_model_json(&args.model)?;
    let plot = crate::plot::render_model_file(&model_file, args.width, args.height);
    println!("{plot}");
    Ok(())
}

pub fn run_config_from_args(args: &FitArgs) -> RunConfig {
    let experiment_dir = PathBuf::from(&args.experiment);

    RunConfig {
        standards_path: args.standards.clone(),
        unknowns_path: args.unknowns.clone(),
        experiment_name: args.experiment.clone(),
        dilution_factor: args.dilution,
        plot: args.plot,
        plot_width: args.width,
        plot_height: args.height,
        export_results: args
            .export
            .then(|| experiment_dir.join(format!("{}_Obtained_Concentrations.csv", args.experiment))),
        export_model: args
            .export_model
            .then(|| experiment_dir.join(format!("{}_Standard_Curve.json", args.experiment))),
        archive_inputs: args.archive_inputs,
    }
}

fn ensure_parent_dir(path: &Path) -> Result<(), AppError> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    fs::create_dir_all(parent).map_err(|e| {
        AppError::new(
            ErrorKind::Config,
            format!("Failed to create directory '{}': {e}", parent.display()),
        )
    })
}

fn archive_inputs(config: &RunConfig) -> Result<(), AppError> {
    let dir = PathBuf::from(&config.experiment_name);
    fs::create_dir_all(&dir).map_err(|e| {
        AppError::new(
            ErrorKind::Config,
            format!("Failed to create experiment directory '{}': {e}", dir.display()),
        )
    })?;

    for source in [&config.standards_path, &config.unknowns_path] {
        let Some(name) = source.file_name() else {
            continue;
        };
        let destination = dir.join(name);
        fs::rename(source, &destination).map_err(|e| {
            AppError::new(
                ErrorKind::Config,
                format!(
                    "Failed to move '{}' to '{}': {e}",
                    source.display(),
                    destination.display()
                ),
            )
        })?;
    }

    Ok(())
}
