//! Error taxonomy for an evaluation run
//!
//! Configuration and data errors abort the whole run. Numeric anomalies are
//! per-row markers (see [`super::NumericAnomaly`]) and never surface here.

use thiserror::Error;

/// A zone or cutoff that cannot be evaluated as written.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("Zone name at position {index} is empty")]
    EmptyZoneName { index: usize },

    #[error("Zone '{zone}' is defined more than once")]
    DuplicateZoneName { zone: String },

    #[error("Zone '{zone}': base depth {base} must be greater than top depth {top}")]
    InvalidDepthRange { zone: String, top: f64, base: f64 },

    #[error("Zone '{zone}': GR shale ({gr_shale}) must differ from GR clean ({gr_clean})")]
    DegenerateGammaRay {
        zone: String,
        gr_clean: f64,
        gr_shale: f64,
    },

    #[error("Zone '{zone}': matrix density ({matrix}) must differ from fluid density ({fluid})")]
    DegenerateDensity { zone: String, matrix: f64, fluid: f64 },

    #[error("Zone '{zone}': saturation exponent n must be non-zero")]
    ZeroSaturationExponent { zone: String },

    #[error("Zone '{zone}': parameter {parameter} is not a finite number")]
    NonFiniteParameter { zone: String, parameter: &'static str },

    #[error("Cutoff {cutoff} = {value} is not a finite number")]
    InvalidCutoff { cutoff: &'static str, value: f64 },
}

/// The log itself cannot feed the selected models.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("Curve store is empty")]
    EmptyCurveStore,

    #[error("Required channel '{channel}' is missing from the curve store")]
    MissingChannel { channel: String },

    #[error("Channel '{channel}' has no finite value at depth {depth}")]
    NullValue { channel: String, depth: f64 },

    #[error("Sample {index} has a non-finite depth")]
    NonFiniteDepth { index: usize },

    #[error("Duplicate depth {depth} in curve store")]
    DuplicateDepth { depth: f64 },

    #[error("Depth not strictly increasing: {next} follows {previous}")]
    NonMonotonicDepth { previous: f64, next: f64 },
}

/// Fatal error for a whole evaluation run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),
}
