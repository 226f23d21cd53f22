//! Invert the fitted curve and derive per-sample quantities.
//!
//! The pipeline per non-blank sample is strictly linear:
//!
//! ```text
//! average replicates -> blank-correct -> invert -> scale by dilution
//! ```
//!
//! Samples are independent, so the batch is resolved in parallel and one
//! sample's failure (e.g. no real root for its absorbance) never aborts its
//! siblings. Fit-level problems (missing blank, invalid dilution) abort the
//! whole batch before any sample is attempted.

use rayon::prelude::*;

use crate::domain::{
    BLANK_ID, CalibrationModel, ResolvedSample, SampleFailure, TARGET_MASSES_UG, TargetVolume,
    UnknownSample,
};
use crate::error::{AppError, ErrorKind};
use crate::math::real_roots;

/// Output of resolving a batch of unknowns.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Successfully resolved samples, in input order.
    pub samples: Vec<ResolvedSample>,
    /// Samples that failed, in input order, with the reason.
    pub failures: Vec<SampleFailure>,
    /// Mean absorbance of the blank control used for correction.
    pub blank_average: f64,
    /// Dilution factor applied to the batch.
    pub dilution_factor: f64,
}

/// Subtract the blank control's averaged absorbance from a sample's.
pub fn blank_correct(sample_average: f64, blank_average: f64) -> f64 {
    sample_average - blank_average
}

/// Invert the calibration cubic at the given (blank-corrected) absorbance.
///
/// Solves `ax³ + bx² + cx + (d - absorbance) = 0` and, among the real roots,
/// returns the one of greatest absolute value. That tie-break matches the
/// established assay workflow; it is deliberately not the root closest to
/// the standards' range.
pub fn invert(model: &CalibrationModel, absorbance: f64) -> Result<f64, AppError> {
    let [a, b, c, d] = *model.coefficients();

    real_roots(&[a, b, c, d - absorbance])
        .into_iter()
        .max_by(|p, q| {
            p.abs()
                .partial_cmp(&q.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .ok_or_else(|| {
            AppError::new(
                ErrorKind::NoRealRoot,
                format!("No real root for absorbance {absorbance}; check the curve equation."),
            )
        })
}

/// Volume (µL) needed to reach `target_ug` at the given concentration.
pub fn volume_for_target(corrected_concentration: f64, target_ug: f64) -> Result<f64, AppError> {
    if corrected_concentration == 0.0 {
        return Err(AppError::new(
            ErrorKind::DivisionByZero,
            format!("Corrected concentration is zero; volume for {target_ug} µg is undefined."),
        ));
    }
    Ok(target_ug / corrected_concentration)
}

/// Resolve every non-blank sample against the fitted model.
///
/// The sample identified [`BLANK_ID`] supplies the correction baseline and is
/// excluded from the output. Per-sample errors are collected in
/// [`Resolution::failures`]; a zero corrected concentration leaves that
/// sample's volume entries undefined (`None`) without failing the sample.
pub fn resolve_all(
    model: &CalibrationModel,
    samples: &[UnknownSample],
    dilution_factor: f64,
) -> Result<Resolution, AppError> {
    if !dilution_factor.is_finite() || dilution_factor <= 0.0 {
        return Err(AppError::new(
            ErrorKind::InvalidDilution,
            format!("Dilution factor must be finite and > 0, got {dilution_factor}."),
        ));
    }

    let blank = samples.iter().find(|s| s.is_blank()).ok_or_else(|| {
        AppError::new(
            ErrorKind::MissingBlank,
            format!("No \"{BLANK_ID}\" sample in the unknowns; cannot blank-correct."),
        )
    })?;
    let blank_average = blank.averaged_absorbance();
    if !blank_average.is_finite() {
        return Err(AppError::new(
            ErrorKind::MissingBlank,
            "Blank sample has no usable replicate absorbances.",
        ));
    }

    // Samples are pure functions of the shared read-only model, so the batch
    // parallelizes without locking. `collect` preserves input order.
    let outcomes: Vec<Result<ResolvedSample, SampleFailure>> = samples
        .par_iter()
        .filter(|s| !s.is_blank())
        .map(|sample| resolve_one(model, sample, blank_average, dilution_factor))
        .collect();

    let mut resolved = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(sample) => resolved.push(sample),
            Err(failure) => failures.push(failure),
        }
    }

    Ok(Resolution {
        samples: resolved,
        failures,
        blank_average,
        dilution_factor,
    })
}

fn resolve_one(
    model: &CalibrationModel,
    sample: &UnknownSample,
    blank_average: f64,
    dilution_factor: f64,
) -> Result<ResolvedSample, SampleFailure> {
    let averaged = sample.averaged_absorbance();
    if !averaged.is_finite() {
        return Err(SampleFailure {
            id: sample.id.clone(),
            message: "No usable replicate absorbances.".to_string(),
        });
    }

    let corrected_absorbance = blank_correct(averaged, blank_average);

    let inverted = invert(model, corrected_absorbance).map_err(|e| SampleFailure {
        id: sample.id.clone(),
        message: e.to_string(),
    })?;

    let corrected_concentration = inverted * dilution_factor;
    // Recovers the undiluted estimate from the scaled value.
    let raw_concentration = corrected_concentration / dilution_factor;

    let volumes = TARGET_MASSES_UG
        .iter()
        .map(|&target_ug| TargetVolume {
            target_ug,
            volume_ul: volume_for_target(corrected_concentration, target_ug).ok(),
        })
        .collect();

    Ok(ResolvedSample {
        id: sample.id.clone(),
        averaged_absorbance: averaged,
        corrected_absorbance,
        raw_concentration,
        dilution_factor,
        corrected_concentration,
        volumes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::fit_standard_curve;
    use crate::domain::StandardPoint;

    fn scenario_standards() -> Vec<StandardPoint> {
        vec![
            StandardPoint { concentration: 0.0, absorbances: vec![0.05, 0.06] },
            StandardPoint { concentration: 25.0, absorbances: vec![0.30, 0.32] },
            StandardPoint { concentration: 50.0, absorbances: vec![0.55, 0.57] },
            StandardPoint { concentration: 100.0, absorbances: vec![1.0, 1.02] },
            StandardPoint { concentration: 200.0, absorbances: vec![1.8, 1.82] },
        ]
    }

    fn sample(id: &str, absorbances: &[f64]) -> UnknownSample {
        UnknownSample {
            id: id.to_string(),
            absorbances: absorbances.to_vec(),
        }
    }

    #[test]
    fn blank_correct_is_exact_subtraction() {
        assert_eq!(blank_correct(0.41, 0.05), 0.36);
        assert_eq!(blank_correct(0.05, 0.05), 0.0);
    }

    #[test]
    fn invert_is_left_inverse_of_predict_on_the_standards_range() {
        // A strictly increasing cubic on [0, 60]: the shifted polynomial has
        // one real root there, so max-|root| must return the original x.
        let model = CalibrationModel::new([2e-6, -1e-4, 0.012, 0.05], 1.0);
        for &x in &[0.0, 5.0, 12.5, 20.0, 33.0, 47.0, 60.0] {
            let y = model.predict(x);
            let recovered = invert(&model, y).unwrap();
            assert!(
                (recovered - x).abs() < 1e-6,
                "round-trip at x={x}: got {recovered}"
            );
        }
    }

    #[test]
    fn invert_fails_without_a_real_root() {
        // x² + 1 shifted by -absorbance stays rootless for absorbance < 1.
        let model = CalibrationModel::new([0.0, 1.0, 0.0, 1.0], 1.0);
        let err = invert(&model, 0.5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoRealRoot);
    }

    #[test]
    fn invert_maps_the_zero_polynomial_to_no_real_root() {
        // All coefficients zero and the absorbance equal to the intercept
        // makes the shifted polynomial identically zero. Its root set is
        // empty, so this fails like any other rootless absorbance.
        let model = CalibrationModel::new([0.0, 0.0, 0.0, 0.05], 1.0);
        let err = invert(&model, 0.05).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoRealRoot);
    }

    #[test]
    fn scenario_interpolated_region() {
        // S1 must land strictly between the 25 and 50 µg/mL
        // standards, and the fit must be tight.
        let model = fit_standard_curve(&scenario_standards()).unwrap();
        assert!(model.r_squared() > 0.95);

        let unknowns = vec![
            sample("Blank", &[0.05, 0.05]),
            sample("S1", &[0.40, 0.42]),
        ];
        let resolution = resolve_all(&model, &unknowns, 1.0).unwrap();
        assert!(resolution.failures.is_empty());
        assert_eq!(resolution.samples.len(), 1);

        let s1 = &resolution.samples[0];
        assert_eq!(s1.id, "S1");
        assert!((s1.corrected_absorbance - 0.36).abs() < 1e-9);
        assert!(
            s1.corrected_concentration > 25.0 && s1.corrected_concentration < 50.0,
            "expected interpolated concentration, got {}",
            s1.corrected_concentration
        );
    }

    #[test]
    fn dilution_scaling_and_raw_recovery() {
        let model = fit_standard_curve(&scenario_standards()).unwrap();
        let unknowns = vec![
            sample("Blank", &[0.05, 0.05]),
            sample("S1", &[0.40, 0.42]),
        ];

        let undiluted = resolve_all(&model, &unknowns, 1.0).unwrap();
        let diluted = resolve_all(&model, &unknowns, 10.0).unwrap();

        let base = &undiluted.samples[0];
        let scaled = &diluted.samples[0];

        // dilution = 1 is a no-op.
        assert!((base.corrected_concentration - base.raw_concentration).abs() < 1e-12);

        // corrected / dilution recovers the raw estimate.
        assert!(
            (scaled.corrected_concentration / scaled.dilution_factor - scaled.raw_concentration)
                .abs()
                < 1e-12
        );
        assert!(
            (scaled.corrected_concentration - 10.0 * base.corrected_concentration).abs() < 1e-9
        );
    }

    #[test]
    fn volume_law() {
        let volume = volume_for_target(2.0, 30.0).unwrap();
        assert_eq!(volume, 15.0);
        // Doubling the concentration halves the volume.
        let halved = volume_for_target(4.0, 30.0).unwrap();
        assert_eq!(halved, volume / 2.0);
    }

    #[test]
    fn volume_table_matches_the_fixed_targets() {
        let model = fit_standard_curve(&scenario_standards()).unwrap();
        let unknowns = vec![
            sample("Blank", &[0.05, 0.05]),
            sample("S1", &[0.40, 0.42]),
        ];
        let resolution = resolve_all(&model, &unknowns, 1.0).unwrap();
        let s1 = &resolution.samples[0];

        assert_eq!(s1.volumes.len(), TARGET_MASSES_UG.len());
        for (entry, &target) in s1.volumes.iter().zip(TARGET_MASSES_UG.iter()) {
            assert_eq!(entry.target_ug, target);
            let volume = entry.volume_ul.unwrap();
            assert!((volume - target / s1.corrected_concentration).abs() < 1e-12);
        }
    }

    #[test]
    fn zero_corrected_concentration_leaves_volumes_undefined() {
        let err = volume_for_target(0.0, 5.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DivisionByZero);

        // A model through the origin with zero intercept: a sample at blank
        // level inverts to concentration 0, volumes stay undefined, and the
        // sample itself still resolves.
        let model = CalibrationModel::new([0.0, 0.0, 0.01, 0.0], 1.0);
        let unknowns = vec![sample("Blank", &[0.05]), sample("S0", &[0.05])];
        let resolution = resolve_all(&model, &unknowns, 1.0).unwrap();
        assert!(resolution.failures.is_empty());

        let s0 = &resolution.samples[0];
        assert_eq!(s0.corrected_concentration, 0.0);
        assert!(s0.volumes.iter().all(|v| v.volume_ul.is_none()));
    }

    #[test]
    fn zero_dilution_fails_and_resolves_nothing() {
        let model = fit_standard_curve(&scenario_standards()).unwrap();
        let unknowns = vec![
            sample("Blank", &[0.05, 0.05]),
            sample("S1", &[0.40, 0.42]),
        ];
        let err = resolve_all(&model, &unknowns, 0.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDilution);
    }

    #[test]
    fn negative_dilution_fails() {
        let model = fit_standard_curve(&scenario_standards()).unwrap();
        let err = resolve_all(&model, &[sample("Blank", &[0.05])], -2.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDilution);
    }

    #[test]
    fn missing_blank_fails_the_batch() {
        let model = fit_standard_curve(&scenario_standards()).unwrap();
        let unknowns = vec![sample("S1", &[0.40, 0.42])];
        let err = resolve_all(&model, &unknowns, 1.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingBlank);
    }

    #[test]
    fn per_sample_failures_do_not_abort_siblings() {
        // A rootless quadratic model: one sample has no real root, the other
        // does. The good sample must still resolve.
        let model = CalibrationModel::new([0.0, 1.0, 0.0, 1.0], 1.0);
        let unknowns = vec![
            sample("Blank", &[0.0]),
            sample("NoRoot", &[0.5]),   // corrected 0.5 -> x² = -0.5
            sample("HasRoot", &[2.0]),  // corrected 2.0 -> x² = 1
        ];

        let resolution = resolve_all(&model, &unknowns, 1.0).unwrap();
        assert_eq!(resolution.samples.len(), 1);
        assert_eq!(resolution.samples[0].id, "HasRoot");
        assert_eq!(resolution.failures.len(), 1);
        assert_eq!(resolution.failures[0].id, "NoRoot");
    }
}
