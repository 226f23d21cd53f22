//! Concentration resolution for unknown samples.
//!
//! Responsibilities:
//!
//! - blank-correct averaged absorbances
//! - invert the calibration cubic (max-|root| real-root selection)
//! - apply the dilution factor and build the volume-planning table
//! - resolve all samples in parallel with independent per-sample failures

pub mod resolver;

pub use resolver::*;
