//! Formatted terminal output for a run.
//!
//! Presentation values are rounded to 3 decimal places (coefficients and r²
//! to 4, via the model's reporting accessors). Full-precision values never
//! leave the numeric modules.

use crate::domain::{CalibrationModel, QualityLabel, ResolvedSample, StandardPoint, TARGET_MASSES_UG};
use crate::math::round_dp;
use crate::resolve::Resolution;

/// Format the run summary: fitted equation, r², and quality warnings.
pub fn format_run_summary(
    experiment: &str,
    standards: &[StandardPoint],
    model: &CalibrationModel,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== bca - {experiment} ===\n"));
    out.push_str(&format!("Standards: n={}\n", standards.len()));
    out.push_str(&format!("Equation: {}\n", model.equation()));
    out.push_str(&format!(
        "R squared: {} ({})\n",
        model.reported_r_squared(),
        model.quality().display_name()
    ));

    match model.quality() {
        QualityLabel::Marginal => out.push_str("Warning: R squared < 0.9\n"),
        QualityLabel::Poor => out.push_str("Warning: R squared < 0.8\n"),
        QualityLabel::Acceptable => {}
    }

    out
}

/// Format the standards section of the results table.
pub fn format_standards_table(standards: &[StandardPoint]) -> String {
    let mut out = String::new();

    out.push_str("Standards:\n");
    out.push_str(&format!(
        "{:>16} {:>20}\n",
        "conc (ug/mL)", "avg absorbance"
    ));
    for point in standards {
        out.push_str(&format!(
            "{:>16.3} {:>20.3}\n",
            point.concentration,
            round_dp(point.averaged_absorbance(), 3)
        ));
    }

    out
}

/// Format the per-sample results table (plus any per-sample failures).
pub fn format_results_table(resolution: &Resolution) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Samples (dilution x{}, blank avg {:.3}):\n",
        resolution.dilution_factor, resolution.blank_average
    ));
    out.push_str(&format!(
        "{:<16} {:>10} {:>10} {:>12} {:>12}\n",
        "id", "avg abs", "corr abs", "conc", "conc (xdil)"
    ));

    for sample in &resolution.samples {
        out.push_str(&format_sample_row(sample));
    }

    if !resolution.samples.is_empty() {
        out.push('\n');
        out.push_str(&format_volume_table(&resolution.samples));
    }

    if !resolution.failures.is_empty() {
        out.push_str("\nFailed samples:\n");
        for failure in &resolution.failures {
            out.push_str(&format!("- {}: {}\n", failure.id, failure.message));
        }
    }

    out
}

fn format_sample_row(sample: &ResolvedSample) -> String {
    format!(
        "{:<16} {:>10.3} {:>10.3} {:>12.3} {:>12.3}\n",
        truncate(&sample.id, 16),
        sample.averaged_absorbance,
        sample.corrected_absorbance,
        round_dp(sample.raw_concentration, 3),
        round_dp(sample.corrected_concentration, 3),
    )
}

/// Volumes (µL) needed to reach each fixed target mass, one row per sample.
fn format_volume_table(samples: &[ResolvedSample]) -> String {
    let mut out = String::new();

    out.push_str(&format!("{:<16}", "volume (uL) to"));
    for target in TARGET_MASSES_UG {
        out.push_str(&format!(" {:>8}", format!("{target} ug")));
    }
    out.push('\n');

    for sample in samples {
        out.push_str(&format!("{:<16}", truncate(&sample.id, 16)));
        for entry in &sample.volumes {
            match entry.volume_ul {
                Some(volume) => out.push_str(&format!(" {:>8.3}", round_dp(volume, 3))),
                // Division by zero: the corrected concentration is zero.
                None => out.push_str(&format!(" {:>8}", "undef")),
            }
        }
        out.push('\n');
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CalibrationModel, TargetVolume};

    fn resolved(id: &str, conc: f64) -> ResolvedSample {
        ResolvedSample {
            id: id.to_string(),
            averaged_absorbance: 0.41,
            corrected_absorbance: 0.36,
            raw_concentration: conc,
            dilution_factor: 1.0,
            corrected_concentration: conc,
            volumes: TARGET_MASSES_UG
                .iter()
                .map(|&target_ug| TargetVolume {
                    target_ug,
                    volume_ul: (conc != 0.0).then(|| target_ug / conc),
                })
                .collect(),
        }
    }

    #[test]
    fn summary_includes_equation_and_quality() {
        let model = CalibrationModel::new([0.0001, -0.0123, 0.0106, 0.0541], 0.85);
        let summary = format_run_summary("Lysate A", &[], &model);
        assert!(summary.contains("Lysate A"));
        assert!(summary.contains("x^3"));
        assert!(summary.contains("marginal"));
        assert!(summary.contains("R squared < 0.9"));
    }

    #[test]
    fn poor_fit_gets_the_stronger_warning() {
        let model = CalibrationModel::new([0.0, 0.0, 0.01, 0.05], 0.5);
        let summary = format_run_summary("x", &[], &model);
        assert!(summary.contains("R squared < 0.8"));
    }

    #[test]
    fn results_table_lists_samples_and_failures() {
        let resolution = Resolution {
            samples: vec![resolved("S1", 29.716)],
            failures: vec![crate::domain::SampleFailure {
                id: "S2".to_string(),
                message: "No real root for absorbance 9.0; check the curve equation.".to_string(),
            }],
            blank_average: 0.05,
            dilution_factor: 1.0,
        };

        let table = format_results_table(&resolution);
        assert!(table.contains("S1"));
        assert!(table.contains("29.716"));
        assert!(table.contains("Failed samples"));
        assert!(table.contains("S2"));
    }

    #[test]
    fn undefined_volumes_render_as_undef() {
        let resolution = Resolution {
            samples: vec![resolved("S0", 0.0)],
            failures: vec![],
            blank_average: 0.05,
            dilution_factor: 1.0,
        };
        let table = format_results_table(&resolution);
        assert!(table.contains("undef"));
    }
}
