//! Mathematical utilities: least squares and cubic root extraction.

pub mod ols;
pub mod roots;

pub use ols::*;
pub use roots::*;

/// Round to `places` decimal places.
///
/// Used for presentation only; fitting and inversion always work on
/// full-precision values.
pub fn round_dp(v: f64, places: u32) -> f64 {
    let scale = 10f64.powi(places as i32);
    (v * scale).round() / scale
}
