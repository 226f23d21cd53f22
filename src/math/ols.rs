//! Ordinary least squares solver for the calibration fit.
//!
//! The design matrix is a cubic Vandermonde over the standard concentrations,
//! so columns span very different magnitudes once concentrations reach the
//! hundreds of µg/mL (the `x³` column grows past 1e6). We solve with SVD,
//! which stays robust on those badly scaled, tall systems.
//!
//! (Nalgebra's `QR::solve` targets square systems and will panic for a tall
//! matrix, so it is not an option here.)

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Fewer than 4 distinct concentration levels leaves the Vandermonde
    // rank-deficient; a looser tolerance then yields the minimum-norm
    // solution instead of failing the whole fit.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_recovers_exact_quadratic() {
        // Fit y = 1 + 2x + 3x^2 on x = [0,1,2,3] with columns [x^2, x, 1].
        let xs = [0.0, 1.0, 2.0, 3.0];
        let x = DMatrix::from_fn(4, 3, |i, j| match j {
            0 => xs[i] * xs[i],
            1 => xs[i],
            _ => 1.0,
        });
        let y = DVector::from_fn(4, |i, _| 1.0 + 2.0 * xs[i] + 3.0 * xs[i] * xs[i]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 3.0).abs() < 1e-9);
        assert!((beta[1] - 2.0).abs() < 1e-9);
        assert!((beta[2] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn least_squares_handles_overdetermined_noisy_system() {
        // Line y = 0.5x with a small symmetric perturbation; slope survives.
        let x = DMatrix::from_row_slice(4, 2, &[1.0, 1.0, 2.0, 1.0, 3.0, 1.0, 4.0, 1.0]);
        let y = DVector::from_row_slice(&[0.51, 0.99, 1.51, 1.99]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 0.5).abs() < 0.05);
    }
}
