//! Export run results to CSV.
//!
//! The export mirrors the on-screen tables: a standards section followed by
//! the per-sample section, with numeric fields rounded to 3 decimal places.
//! It is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{CalibrationModel, StandardPoint, TARGET_MASSES_UG};
use crate::error::{AppError, ErrorKind};
use crate::math::round_dp;
use crate::resolve::Resolution;

/// Write the combined results CSV.
pub fn write_results_csv(
    path: &Path,
    standards: &[StandardPoint],
    model: &CalibrationModel,
    resolution: &Resolution,
) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(
            ErrorKind::Config,
            format!("Failed to create results CSV '{}': {e}", path.display()),
        )
    })?;

    let mut header = String::from(
        "id,avg_absorbance,corrected_absorbance,raw_concentration_ug_ul,corrected_concentration_ug_ul",
    );
    for target in TARGET_MASSES_UG {
        header.push_str(&format!(",vol_{target}ug_ul"));
    }
    header.push_str(",r_squared,equation");
    write_line(&mut file, path, &header)?;

    // Standards carry only their averaged absorbance; the remaining columns
    // stay empty.
    for point in standards {
        write_line(
            &mut file,
            path,
            &format!(
                "std_{},{}{}",
                fmt3(point.concentration),
                fmt3(point.averaged_absorbance()),
                // 3 remaining numeric columns + 10 volumes + r² + equation.
                ",".repeat(TARGET_MASSES_UG.len() + 5)
            ),
        )?;
    }

    for sample in &resolution.samples {
        let mut line = format!(
            "{},{},{},{},{}",
            escape(&sample.id),
            fmt3(sample.averaged_absorbance),
            fmt3(sample.corrected_absorbance),
            fmt3(sample.raw_concentration),
            fmt3(sample.corrected_concentration),
        );
        for entry in &sample.volumes {
            match entry.volume_ul {
                Some(volume) => line.push_str(&format!(",{}", fmt3(volume))),
                None => line.push(','),
            }
        }
        line.push_str(&format!(
            ",{},{}",
            model.reported_r_squared(),
            escape(&model.equation())
        ));
        write_line(&mut file, path, &line)?;
    }

    Ok(())
}

fn write_line(file: &mut File, path: &Path, line: &str) -> Result<(), AppError> {
    writeln!(file, "{line}").map_err(|e| {
        AppError::new(
            ErrorKind::Config,
            format!("Failed to write results CSV '{}': {e}", path.display()),
        )
    })
}

fn fmt3(v: f64) -> String {
    format!("{}", round_dp(v, 3))
}

fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
