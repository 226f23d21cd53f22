//! Calibration curve fitting.
//!
//! Responsibilities:
//!
//! - average each standard's replicates into one (concentration, absorbance) pair
//! - solve the least-squares cubic over all pairs
//! - score the fit (Bessel-corrected r²) and attach a quality label

pub mod fitter;

pub use fitter::*;
