//! Petrozone: Zone-Based Well Log Evaluation
//!
//! Estimates shale volume, porosity and water saturation from depth-indexed
//! log curves, flags net pay, and summarizes each user-defined depth zone.
//!
//! ## Architecture
//!
//! - **Curve Store**: validated, depth-sorted, null-free measurements
//! - **Zone Table**: named depth intervals, each with its own parameters
//! - **Model Library**: interchangeable Vsh / porosity / Sw estimators
//! - **Zone Evaluator**: per-zone model application and net pay flagging
//! - **Aggregator**: thickness, net-to-gross and averages per zone
//!
//! Every run is a pure batch transformation: explicit inputs in, new
//! tables out, no shared state between runs.

pub mod config;
pub mod io;
pub mod petrophysics;
pub mod types;

// Re-export evaluation configuration
pub use config::EvaluationConfig;

// Re-export commonly used types
pub use types::{
    channel, ConfigurationError, CurveStore, Cutoffs, DataError, DuplicateDepthPolicy,
    EvaluationError, MethodSelection, NumericAnomaly, PorosityMethod, ResultSample, ResultTable,
    Sample, SwMethod, VshMethod, Zone, ZoneSummary, ZoneTable,
};

// Re-export the evaluation entry point
pub use petrophysics::{run_evaluation, EvaluationOutput, EvaluationSettings, ZoneEvaluator};
