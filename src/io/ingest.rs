//! CSV ingest for standards and unknowns.
//!
//! Both files use the plate-export layout: the first column is the row key
//! (known concentration for standards, sample identifier for unknowns) and
//! the remaining columns are replicate absorbance readings. The standards
//! file has no header; the unknowns file has one (ignored by position).
//!
//! Design goals:
//! - **Row-level validation**: skip bad rows, but report what happened
//! - **Deterministic behavior**: input order is preserved
//! - **Separation of concerns**: no fitting or inversion logic here

use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{StandardPoint, UnknownSample};
use crate::error::{AppError, ErrorKind};

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub id: Option<String>,
    pub message: String,
}

/// Ingested standards: points plus any skipped rows.
#[derive(Debug, Clone)]
pub struct StandardsData {
    pub points: Vec<StandardPoint>,
    pub row_errors: Vec<RowError>,
}

/// Ingested unknowns: samples plus any skipped rows.
#[derive(Debug, Clone)]
pub struct UnknownsData {
    pub samples: Vec<UnknownSample>,
    pub row_errors: Vec<RowError>,
}

/// Load the standards CSV (no header row).
pub fn load_standards(path: &Path) -> Result<StandardsData, AppError> {
    let mut reader = open_reader(path, false)?;

    let mut points = Vec::new();
    let mut row_errors = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let line = idx + 1;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    id: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_standard(&record) {
            Ok(point) => points.push(point),
            Err(message) => row_errors.push(RowError {
                line,
                id: record.get(0).map(str::to_string),
                message,
            }),
        }
    }

    if points.is_empty() {
        return Err(AppError::new(
            ErrorKind::Config,
            format!("No valid standards in '{}'.", path.display()),
        ));
    }

    Ok(StandardsData { points, row_errors })
}

/// Load the unknowns CSV (one header row, ignored).
pub fn load_unknowns(path: &Path) -> Result<UnknownsData, AppError> {
    let mut reader = open_reader(path, true)?;

    let mut samples = Vec::new();
    let mut row_errors = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header, CSV lines are 1-based.
        let line = idx + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    id: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_unknown(&record) {
            Ok(sample) => samples.push(sample),
            Err(message) => row_errors.push(RowError {
                line,
                id: record.get(0).map(str::to_string),
                message,
            }),
        }
    }

    if samples.is_empty() {
        return Err(AppError::new(
            ErrorKind::Config,
            format!("No valid samples in '{}'.", path.display()),
        ));
    }

    Ok(UnknownsData {
        samples,
        row_errors,
    })
}

fn open_reader(path: &Path, has_headers: bool) -> Result<csv::Reader<File>, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            ErrorKind::Config,
            format!("Failed to open CSV '{}': {e}", path.display()),
        )
    })?;

    Ok(csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file))
}

fn parse_standard(record: &StringRecord) -> Result<StandardPoint, String> {
    let concentration_field = first_field(record)?;
    let concentration = concentration_field
        .parse::<f64>()
        .map_err(|_| format!("Invalid concentration '{concentration_field}'."))?;
    if !concentration.is_finite() || concentration < 0.0 {
        return Err(format!(
            "Concentration must be finite and >= 0, got {concentration}."
        ));
    }

    let absorbances = parse_replicates(record)?;
    Ok(StandardPoint {
        concentration,
        absorbances,
    })
}

fn parse_unknown(record: &StringRecord) -> Result<UnknownSample, String> {
    let id = first_field(record)?.to_string();
    let absorbances = parse_replicates(record)?;
    Ok(UnknownSample { id, absorbances })
}

fn first_field<'a>(record: &'a StringRecord) -> Result<&'a str, String> {
    record
        .get(0)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "Missing row key in the first column.".to_string())
}

/// Replicate absorbances from columns 2..; empty trailing cells are skipped.
fn parse_replicates(record: &StringRecord) -> Result<Vec<f64>, String> {
    let mut absorbances = Vec::new();
    for (col, field) in record.iter().enumerate().skip(1) {
        if field.is_empty() {
            continue;
        }
        let value = field
            .parse::<f64>()
            .map_err(|_| format!("Invalid absorbance '{field}' in column {}.", col + 1))?;
        if !value.is_finite() {
            return Err(format!("Non-finite absorbance in column {}.", col + 1));
        }
        absorbances.push(value);
    }

    if absorbances.is_empty() {
        return Err("Row has no replicate absorbances.".to_string());
    }
    Ok(absorbances)
}
