//! Petrophysics Module
//!
//! Deterministic zone-based log evaluation. All math here is pure; every
//! run takes explicit inputs and returns new tables.
//!
//! ## Pipeline
//! - `models` - shale volume, porosity, saturation and net pay estimators
//! - `evaluator` - per-zone model application and row tagging
//! - `aggregator` - per-zone thickness, net-to-gross and averages
//! - `volumetrics` - hydrocarbons in place from zone summaries

pub mod aggregator;
pub mod evaluator;
pub mod models;
pub mod volumetrics;

pub use aggregator::{depth_step, summarize_zones};
pub use evaluator::ZoneEvaluator;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::{
    CurveStore, Cutoffs, DataError, EvaluationError, MethodSelection, ResultTable, ZoneSummary,
    ZoneTable,
};

/// Method, cutoff and sampling choices for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSettings {
    pub methods: MethodSelection,
    pub cutoffs: Cutoffs,
    /// Overrides the median sample spacing when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth_step: Option<f64>,
}

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationOutput {
    /// The zone table actually evaluated (the whole-log zone when none were given)
    pub zones: ZoneTable,
    pub results: ResultTable,
    pub summaries: Vec<ZoneSummary>,
    /// Sample spacing used to turn counts into thickness
    pub depth_step: f64,
}

/// Evaluate `zones` against `store` and summarize each zone.
///
/// An empty zone table evaluates the whole log as a single zone with
/// default parameters.
pub fn run_evaluation(
    store: &CurveStore,
    zones: &ZoneTable,
    settings: &EvaluationSettings,
) -> Result<EvaluationOutput, EvaluationError> {
    let (top, base) = store.depth_range().ok_or(DataError::EmptyCurveStore)?;

    let zones = if zones.is_empty() {
        info!(top, base, "No zones configured, evaluating whole log as one zone");
        ZoneTable::whole_log(top, base)
    } else {
        zones.clone()
    };

    let evaluator = ZoneEvaluator::new(settings.methods, settings.cutoffs);
    let results = evaluator.evaluate(store, &zones)?;

    let step = settings.depth_step.unwrap_or_else(|| depth_step(store));
    let summaries = summarize_zones(&results, &zones, step);

    info!(
        samples = store.len(),
        rows = results.len(),
        summarized = summaries.len(),
        depth_step = step,
        "Zone summaries ready"
    );

    Ok(EvaluationOutput {
        zones,
        results,
        summaries,
        depth_step: step,
    })
}
