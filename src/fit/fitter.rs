//! Least-squares cubic fit over averaged standards.
//!
//! Given standards `(x_i, [replicates])` we solve the ordinary least squares
//! problem for `y = ax³ + bx² + cx + d` on the averaged pairs and score it
//! with the coefficient of determination:
//!
//! ```text
//! r² = 1 - SSE / ((n - 1) · var(y))
//! ```
//!
//! where `var` is the sample variance (Bessel's correction, divide by n-1).
//! r² is undefined for fewer than two averaged points or when every averaged
//! absorbance is identical; both fail with a degenerate-input error.
//!
//! At least 4 distinct concentration levels are recommended for a stable
//! cubic; fewer is accepted (the SVD solve degrades to a minimum-norm
//! solution on the rank-deficient design) but numerically riskier.

use nalgebra::{DMatrix, DVector};

use crate::domain::{CalibrationModel, StandardPoint};
use crate::error::{AppError, ErrorKind};
use crate::math::solve_least_squares;
use crate::models::{COEFF_LEN, fill_design_row, predict};

/// Fit the calibration cubic over the given standards.
pub fn fit_standard_curve(points: &[StandardPoint]) -> Result<CalibrationModel, AppError> {
    if points.is_empty() {
        return Err(AppError::new(
            ErrorKind::DegenerateInput,
            "No standards to fit.",
        ));
    }

    for p in points {
        if p.absorbances.is_empty() {
            return Err(AppError::new(
                ErrorKind::DegenerateInput,
                format!(
                    "Standard at {} µg/mL has no replicate absorbances.",
                    p.concentration
                ),
            ));
        }
        if !p.concentration.is_finite() || p.concentration < 0.0 {
            return Err(AppError::new(
                ErrorKind::DegenerateInput,
                format!("Invalid standard concentration {}.", p.concentration),
            ));
        }
    }

    let xs: Vec<f64> = points.iter().map(|p| p.concentration).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.averaged_absorbance()).collect();

    if ys.iter().any(|y| !y.is_finite()) {
        return Err(AppError::new(
            ErrorKind::DegenerateInput,
            "Non-finite averaged absorbance among the standards.",
        ));
    }

    let n = xs.len();
    if n < 2 {
        return Err(AppError::new(
            ErrorKind::DegenerateInput,
            format!("r² needs at least 2 averaged standards, got {n}."),
        ));
    }

    let variance = sample_variance(&ys);
    if variance <= 0.0 {
        return Err(AppError::new(
            ErrorKind::DegenerateInput,
            "All averaged absorbances are identical (zero variance); r² is undefined.",
        ));
    }

    let mut design = DMatrix::<f64>::zeros(n, COEFF_LEN);
    let mut row = [0.0; COEFF_LEN];
    for (i, &x) in xs.iter().enumerate() {
        fill_design_row(x, &mut row);
        for (j, &value) in row.iter().enumerate() {
            design[(i, j)] = value;
        }
    }
    let y = DVector::from_column_slice(&ys);

    let beta = solve_least_squares(&design, &y).ok_or_else(|| {
        AppError::new(
            ErrorKind::DegenerateInput,
            "Calibration fit is too ill-conditioned to solve.",
        )
    })?;

    let coefficients = [beta[0], beta[1], beta[2], beta[3]];

    let sse: f64 = xs
        .iter()
        .zip(ys.iter())
        .map(|(&x, &y_obs)| {
            let r = y_obs - predict(&coefficients, x);
            r * r
        })
        .sum();

    let r_squared = 1.0 - sse / ((n as f64 - 1.0) * variance);

    Ok(CalibrationModel::new(coefficients, r_squared))
}

/// Sample variance with Bessel's correction (divide by n-1).
fn sample_variance(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n as f64 - 1.0)
}
