//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting and resolution
//! - exported to CSV/JSON
//! - reloaded later for plotting or comparisons

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::math::round_dp;
use crate::models::{COEFF_LEN, predict};

/// Identifier of the zero-concentration control in the unknowns set.
///
/// Matched exactly; every other sample is blank-corrected against it.
pub const BLANK_ID: &str = "Blank";

/// Fixed target masses (µg) for the volume-planning table.
pub const TARGET_MASSES_UG: [f64; 10] =
    [5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0];

/// A calibration standard: known concentration plus replicate absorbances.
///
/// Concentrations need not be sorted and duplicates are allowed (repeated
/// calibration levels). Ingest guarantees at least one replicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardPoint {
    /// Known concentration (µg/mL), non-negative.
    pub concentration: f64,
    /// Replicate absorbance readings.
    pub absorbances: Vec<f64>,
}

impl StandardPoint {
    /// Arithmetic mean of the replicate absorbances.
    pub fn averaged_absorbance(&self) -> f64 {
        mean(&self.absorbances)
    }
}

/// An unknown sample: identifier plus replicate absorbances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnknownSample {
    pub id: String,
    pub absorbances: Vec<f64>,
}

impl UnknownSample {
    pub fn averaged_absorbance(&self) -> f64 {
        mean(&self.absorbances)
    }

    pub fn is_blank(&self) -> bool {
        self.id == BLANK_ID
    }
}

/// Advisory fit-quality classification derived from r².
///
/// This is reporting metadata, never a hard failure: a poor fit still
/// produces a usable model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLabel {
    /// r² < 0.8
    Poor,
    /// 0.8 <= r² < 0.9
    Marginal,
    /// r² >= 0.9
    Acceptable,
}

impl QualityLabel {
    pub fn from_r_squared(r_squared: f64) -> Self {
        if r_squared < 0.8 {
            QualityLabel::Poor
        } else if r_squared < 0.9 {
            QualityLabel::Marginal
        } else {
            QualityLabel::Acceptable
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            QualityLabel::Poor => "poor",
            QualityLabel::Marginal => "marginal",
            QualityLabel::Acceptable => "acceptable",
        }
    }
}

/// The fitted calibration curve `y = ax³ + bx² + cx + d`.
///
/// Built once per run from the full standards set and shared read-only by
/// all downstream consumers. Fields are private so the model cannot be
/// mutated after the fit; inversion reads the full-precision coefficients,
/// reporting reads the rounded ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationModel {
    coefficients: [f64; COEFF_LEN],
    r_squared: f64,
    quality: QualityLabel,
}

impl CalibrationModel {
    pub fn new(coefficients: [f64; COEFF_LEN], r_squared: f64) -> Self {
        // Quality is classified on the reported (4 dp) r², so the label
        // always agrees with the number shown next to it.
        Self {
            coefficients,
            r_squared,
            quality: QualityLabel::from_r_squared(round_dp(r_squared, 4)),
        }
    }

    /// Full-precision coefficients `[a, b, c, d]`, highest power first.
    pub fn coefficients(&self) -> &[f64; COEFF_LEN] {
        &self.coefficients
    }

    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    pub fn quality(&self) -> QualityLabel {
        self.quality
    }

    /// Predicted absorbance at the given concentration.
    pub fn predict(&self, concentration: f64) -> f64 {
        predict(&self.coefficients, concentration)
    }

    /// Coefficients rounded to 4 decimal places, for reporting.
    pub fn reported_coefficients(&self) -> [f64; COEFF_LEN] {
        self.coefficients.map(|c| round_dp(c, 4))
    }

    /// r² rounded to 4 decimal places, for reporting.
    pub fn reported_r_squared(&self) -> f64 {
        round_dp(self.r_squared, 4)
    }

    /// Equation string in the reporting format, e.g.
    /// `"0.0001x^3 + -0.0123x^2 + 0.0106x + 0.0541"`.
    pub fn equation(&self) -> String {
        let [a, b, c, d] = self.coefficients;
        format!("{a:.4}x^3 + {b:.4}x^2 + {c:.4}x + {d:.4}")
    }
}

/// One entry of the volume-planning table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetVolume {
    /// Target protein mass (µg).
    pub target_ug: f64,
    /// Required volume (µL), or `None` when the corrected concentration is
    /// zero and the volume is undefined (per-entry division by zero; the
    /// rest of the batch is unaffected).
    pub volume_ul: Option<f64>,
}

/// A fully resolved unknown sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedSample {
    pub id: String,
    /// Mean of the replicate absorbances, before blank correction.
    pub averaged_absorbance: f64,
    /// Blank-corrected absorbance fed into the inversion.
    pub corrected_absorbance: f64,
    /// Undiluted concentration estimate (µg/µL).
    pub raw_concentration: f64,
    /// Dilution factor applied to this run (1.0 when none).
    pub dilution_factor: f64,
    /// `raw_concentration × dilution_factor` (µg/µL).
    pub corrected_concentration: f64,
    /// Volumes needed to reach each fixed target mass.
    pub volumes: Vec<TargetVolume>,
}

/// A per-sample failure recorded during resolution.
///
/// Mirrors the row-error pattern used by ingest: the batch completes for all
/// other samples, and the run reports who failed and why.
#[derive(Debug, Clone)]
pub struct SampleFailure {
    pub id: String,
    pub message: String,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub standards_path: PathBuf,
    pub unknowns_path: PathBuf,
    pub experiment_name: String,

    /// Dilution factor applied to the unknowns (must be > 0; 1.0 = none).
    pub dilution_factor: f64,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_results: Option<PathBuf>,
    pub export_model: Option<PathBuf>,

    /// Move the input CSVs into the experiment directory after a fully
    /// successful run. Strictly a post-success side effect.
    pub archive_inputs: bool,
}

/// A saved model file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    pub tool: String,
    pub experiment: String,
    pub model: CalibrationModel,
    pub grid: CurveGrid,
}

/// Precomputed fitted grid for quick plotting of a saved model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveGrid {
    pub concentration: Vec<f64>,
    pub absorbance: Vec<f64>,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
