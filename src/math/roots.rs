//! Real-root extraction for the shifted calibration cubic.
//!
//! Inversion solves `ax³ + bx² + cx + (d - absorbance) = 0`. We take the
//! numerically standard route: eigenvalues of the companion matrix of the
//! monic polynomial.
//!
//! A root counts as real when its imaginary part is negligible *relative to
//! its magnitude*. Testing `imag == 0.0` exactly would reject roots that are
//! real in exact arithmetic but pick up a tiny imaginary component from the
//! eigenvalue computation.

use nalgebra::{Complex, DMatrix};

/// Relative tolerance for treating an eigenvalue as a real root.
pub const IMAG_TOL: f64 = 1e-8;

/// All real roots of the polynomial with the given coefficients
/// (highest power first), in no particular order.
///
/// Exactly-zero leading coefficients are stripped, so a degenerate cubic
/// degrades to a quadratic or linear solve rather than a singular companion
/// matrix. Constant polynomials, including the identically-zero one, have
/// an empty real-root set; callers decide whether that is an error.
pub fn real_roots(coeffs: &[f64]) -> Vec<f64> {
    let trimmed = trim_leading_zeros(coeffs);

    match trimmed.len() {
        0 | 1 => Vec::new(),
        2 => vec![-trimmed[1] / trimmed[0]],
        _ => companion_real_roots(trimmed),
    }
}

fn trim_leading_zeros(coeffs: &[f64]) -> &[f64] {
    let start = coeffs.iter().position(|&c| c != 0.0);
    match start {
        Some(i) => &coeffs[i..],
        None => &[],
    }
}

fn companion_real_roots(coeffs: &[f64]) -> Vec<f64> {
    let degree = coeffs.len() - 1;
    let lead = coeffs[0];

    // Companion matrix of the monic polynomial: first row holds the negated
    // monic coefficients, the subdiagonal is ones.
    let companion = DMatrix::from_fn(degree, degree, |i, j| {
        if i == 0 {
            -coeffs[j + 1] / lead
        } else if i == j + 1 {
            1.0
        } else {
            0.0
        }
    });

    let eigenvalues = companion.complex_eigenvalues();
    eigenvalues
        .iter()
        .filter(|ev| is_effectively_real(**ev))
        .map(|ev| ev.re)
        .collect()
}

fn is_effectively_real(ev: Complex<f64>) -> bool {
    ev.im.abs() <= IMAG_TOL * ev.re.abs().max(1.0)
}
