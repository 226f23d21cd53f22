//! Cubic calibration polynomial primitives.
//!
//! The fitter and resolver rely on two small pure operations:
//! - build a Vandermonde design row for a given concentration (for OLS)
//! - predict absorbance for a given concentration (for residuals/plots)

pub mod cubic;

pub use cubic::*;
