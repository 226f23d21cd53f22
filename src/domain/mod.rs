//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input observations (`StandardPoint`, `UnknownSample`)
//! - the fitted model (`CalibrationModel`, `QualityLabel`)
//! - resolver outputs (`ResolvedSample`, `TargetVolume`, `SampleFailure`)
//! - run configuration (`RunConfig`) and the model-file schema

pub mod types;

pub use types::*;
