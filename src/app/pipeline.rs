//! Shared "assay pipeline" logic used by the CLI front-end.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> fit -> resolve -> report
//!
//! The CLI can then focus on presentation (printing, plots, exports). The
//! model is built exactly once per run and passed by reference into the
//! resolver; there is no process-wide coefficient cache.

use crate::domain::{CalibrationModel, RunConfig, StandardPoint, UnknownSample};
use crate::error::AppError;
use crate::io::ingest::{RowError, load_standards, load_unknowns};
use crate::resolve::{Resolution, resolve_all};

/// All computed outputs of a single `bca fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub standards: Vec<StandardPoint>,
    pub model: CalibrationModel,
    pub resolution: Resolution,
    /// Skipped input rows from both CSVs (reported, never fatal on their own).
    pub row_errors: Vec<RowError>,
}

/// Execute the full assay pipeline and return the computed outputs.
pub fn run_assay(config: &RunConfig) -> Result<RunOutput, AppError> {
    let standards = load_standards(&config.standards_path)?;
    let unknowns = load_unknowns(&config.unknowns_path)?;
    run_assay_with_data(config, standards.points, unknowns.samples).map(|mut out| {
        out.row_errors = standards
            .row_errors
            .into_iter()
            .chain(unknowns.row_errors)
            .collect();
        out
    })
}

/// Execute the pipeline on pre-loaded data.
///
/// Useful for tests and callers that source readings from elsewhere than the
/// two CSV files.
pub fn run_assay_with_data(
    config: &RunConfig,
    standards: Vec<StandardPoint>,
    unknowns: Vec<UnknownSample>,
) -> Result<RunOutput, AppError> {
    let model = crate::fit::fit_standard_curve(&standards)?;
    let resolution = resolve_all(&model, &unknowns, config.dilution_factor)?;

    Ok(RunOutput {
        standards,
        model,
        resolution,
        row_errors: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config(dilution: f64) -> RunConfig {
        RunConfig {
            standards_path: PathBuf::from("standards.csv"),
            unknowns_path: PathBuf::from("unknowns.csv"),
            experiment_name: "test".to_string(),
            dilution_factor: dilution,
            plot: false,
            plot_width: 72,
            plot_height: 20,
            export_results: None,
            export_model: None,
            archive_inputs: false,
        }
    }

    fn scenario_standards() -> Vec<StandardPoint> {
        vec![
            StandardPoint { concentration: 0.0, absorbances: vec![0.05, 0.06] },
            StandardPoint { concentration: 25.0, absorbances: vec![0.30, 0.32] },
            StandardPoint { concentration: 50.0, absorbances: vec![0.55, 0.57] },
            StandardPoint { concentration: 100.0, absorbances: vec![1.0, 1.02] },
            StandardPoint { concentration: 200.0, absorbances: vec![1.8, 1.82] },
        ]
    }

    #[test]
    fn pipeline_end_to_end_on_scenario_data() {
        let unknowns = vec![
            UnknownSample { id: "Blank".to_string(), absorbances: vec![0.05, 0.05] },
            UnknownSample { id: "S1".to_string(), absorbances: vec![0.40, 0.42] },
        ];

        let out = run_assay_with_data(&config(1.0), scenario_standards(), unknowns).unwrap();
        assert!(out.model.r_squared() > 0.95);
        assert_eq!(out.resolution.samples.len(), 1);
        assert!(out.resolution.failures.is_empty());
    }

    #[test]
    fn fit_failure_aborts_before_resolution() {
        let unknowns = vec![UnknownSample {
            id: "Blank".to_string(),
            absorbances: vec![0.05],
        }];
        let err = run_assay_with_data(&config(1.0), vec![], unknowns).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::DegenerateInput);
    }
}
