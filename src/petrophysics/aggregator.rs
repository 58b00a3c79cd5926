//! Zone aggregation: thickness, net-to-gross and average properties
//!
//! One summary per zone that produced at least one result row, in zone
//! table order. Zones without rows are omitted.

use statrs::statistics::{Data, Median, Statistics};
use std::collections::HashMap;
use tracing::warn;

use crate::types::{CurveStore, ResultSample, ResultTable, Zone, ZoneSummary, ZoneTable};

/// Representative sample spacing: median of consecutive depth differences.
///
/// Zero for a store with fewer than two samples. Applied uniformly to every
/// zone even where the local spacing differs.
pub fn depth_step(store: &CurveStore) -> f64 {
    let diffs: Vec<f64> = store
        .samples()
        .windows(2)
        .map(|w| w[1].depth - w[0].depth)
        .collect();
    if diffs.is_empty() {
        return 0.0;
    }
    Data::new(diffs).median()
}

/// Mean of the finite values; NaN when there are none.
fn finite_mean<'a>(values: impl Iterator<Item = &'a f64>) -> f64 {
    values.filter(|v| v.is_finite()).mean()
}

/// `net / gross`, or 0 when the gross interval is not positive.
pub fn net_to_gross(net_thickness: f64, gross_thickness: f64) -> f64 {
    if gross_thickness > 0.0 {
        net_thickness / gross_thickness
    } else {
        0.0
    }
}

/// Summarize one zone's rows.
pub fn summarize_zone(zone: &Zone, rows: &[&ResultSample], depth_step: f64) -> ZoneSummary {
    let net_sample_count = rows.iter().filter(|r| r.is_net_pay).count();
    // Sample counts stay far below 2^52, so the conversion is exact.
    #[allow(clippy::cast_precision_loss)]
    let net_thickness = net_sample_count as f64 * depth_step;
    let gross_thickness = zone.gross_thickness();

    ZoneSummary {
        zone_name: zone.name.clone(),
        top: zone.top,
        base: zone.base,
        gross_thickness,
        net_thickness,
        net_to_gross: net_to_gross(net_thickness, gross_thickness),
        avg_vsh: finite_mean(rows.iter().map(|r| &r.vsh)),
        avg_phie: finite_mean(rows.iter().map(|r| &r.phie)),
        avg_sw: finite_mean(rows.iter().map(|r| &r.sw)),
        sample_count: rows.len(),
        net_sample_count,
    }
}

/// Summaries for every zone present in `results`, in zone table order.
pub fn summarize_zones(results: &ResultTable, zones: &ZoneTable, depth_step: f64) -> Vec<ZoneSummary> {
    let mut by_zone: HashMap<&str, Vec<&ResultSample>> = HashMap::new();
    for row in results.rows() {
        by_zone.entry(row.zone_name.as_str()).or_default().push(row);
    }

    zones
        .iter()
        .filter_map(|zone| match by_zone.get(zone.name.as_str()) {
            Some(rows) => Some(summarize_zone(zone, rows, depth_step)),
            None => {
                warn!(zone = %zone.name, "No samples in zone, omitted from summary");
                None
            }
        })
        .collect()
}
