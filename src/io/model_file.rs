//! Read/write model JSON files.
//!
//! Model JSON is the "portable" representation of a fitted calibration curve:
//! - the coefficients, r², and quality label
//! - a precomputed fitted grid for quick plotting
//!
//! The schema is defined by `domain::ModelFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{CalibrationModel, CurveGrid, ModelFile, StandardPoint};
use crate::error::{AppError, ErrorKind};

/// Write a model JSON file.
pub fn write_model_json(
    path: &Path,
    experiment: &str,
    model: &CalibrationModel,
    standards: &[StandardPoint],
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            ErrorKind::Config,
            format!("Failed to create model JSON '{}': {e}", path.display()),
        )
    })?;

    let (lo, hi) = concentration_range(standards);
    let grid = build_grid(model, lo, hi, 101);

    let model_file = ModelFile {
        tool: "bca".to_string(),
        experiment: experiment.to_string(),
        model: model.clone(),
        grid,
    };

    serde_json::to_writer_pretty(file, &model_file).map_err(|e| {
        AppError::new(
            ErrorKind::Config,
            format!("Failed to write model JSON: {e}"),
        )
    })?;

    Ok(())
}

/// Read a model JSON file.
pub fn read_model_json(path: &Path) -> Result<ModelFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            ErrorKind::Config,
            format!("Failed to open model JSON '{}': {e}", path.display()),
        )
    })?;
    let model_file: ModelFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(ErrorKind::Config, format!("Invalid model JSON: {e}")))?;
    Ok(model_file)
}

fn concentration_range(standards: &[StandardPoint]) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for point in standards {
        lo = lo.min(point.concentration);
        hi = hi.max(point.concentration);
    }
    if !(lo.is_finite() && hi.is_finite()) || hi <= lo {
        return (0.0, 100.0);
    }
    (lo, hi)
}

fn build_grid(model: &CalibrationModel, lo: f64, hi: f64, n: usize) -> CurveGrid {
    let n = n.max(2);
    let mut concentration = Vec::with_capacity(n);
    let mut absorbance = Vec::with_capacity(n);

    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let x = lo + u * (hi - lo);
        concentration.push(x);
        absorbance.push(model.predict(x));
    }

    CurveGrid {
        concentration,
        absorbance,
    }
}
