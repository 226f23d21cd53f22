//! Evaluation of the degree-3 calibration polynomial.
//!
//! Coefficients are stored highest power first, `[a, b, c, d]` for
//! `y = ax³ + bx² + cx + d`. The degree is fixed at 3: it tracks the assay's
//! saturating response shape, it is not a mechanistic model.

/// Number of coefficients of the cubic (including the intercept).
pub const COEFF_LEN: usize = 4;

/// Predict absorbance `y` at concentration `x` (Horner evaluation).
pub fn predict(coeffs: &[f64; COEFF_LEN], x: f64) -> f64 {
    coeffs
        .iter()
        .fold(0.0, |acc, &coef| acc * x + coef)
}

/// Fill a Vandermonde design row `[x³, x², x, 1]` for the OLS fit.
///
/// # Panics
/// Panics if `out` has length other than [`COEFF_LEN`]. Callers size the row
/// once and reuse it.
pub fn fill_design_row(x: f64, out: &mut [f64]) {
    assert_eq!(out.len(), COEFF_LEN);
    out[3] = 1.0;
    out[2] = x;
    out[1] = x * x;
    out[0] = x * x * x;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_matches_expanded_form() {
        let coeffs = [2.0, -1.0, 0.5, 3.0];
        let x = 1.5_f64;
        let expected = 2.0 * x.powi(3) - x.powi(2) + 0.5 * x + 3.0;
        assert!((predict(&coeffs, x) - expected).abs() < 1e-12);
    }

    #[test]
    fn design_row_powers_descend() {
        let mut row = [0.0; COEFF_LEN];
        fill_design_row(2.0, &mut row);
        assert_eq!(row, [8.0, 4.0, 2.0, 1.0]);
    }

    #[test]
    fn predict_intercept_at_zero() {
        let coeffs = [1.0, 1.0, 1.0, 0.25];
        assert!((predict(&coeffs, 0.0) - 0.25).abs() < 1e-15);
    }
}
