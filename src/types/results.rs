//! Evaluation outputs: per-sample results and per-zone summaries

use serde::{Deserialize, Serialize};

use super::Sample;

/// Non-fatal numeric problem recorded on a single result row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericAnomaly {
    /// Density porosity outside [0, 1]
    DensityPorosityOutOfRange,
    /// Effective porosity <= 0; saturation is undefined
    NonPositiveEffectivePorosity,
    /// Deep resistivity <= 0; saturation is undefined
    NonPositiveResistivity,
    /// Saturation model returned NaN or infinity
    NonFiniteSaturation,
    /// Saturation was finite but outside [0, 1] and got clipped
    SaturationClipped,
}

impl NumericAnomaly {
    pub const fn code(self) -> &'static str {
        match self {
            Self::DensityPorosityOutOfRange => "phid_range",
            Self::NonPositiveEffectivePorosity => "phie_nonpositive",
            Self::NonPositiveResistivity => "rt_nonpositive",
            Self::NonFiniteSaturation => "sw_nonfinite",
            Self::SaturationClipped => "sw_clipped",
        }
    }
}

/// A curve sample extended with the computed properties for one zone.
///
/// A sample inside two overlapping zones yields two rows, one per zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSample {
    #[serde(flatten)]
    pub sample: Sample,
    #[serde(rename = "Zone")]
    pub zone_name: String,
    #[serde(rename = "Vsh")]
    pub vsh: f64,
    #[serde(rename = "PHID")]
    pub phid: f64,
    #[serde(rename = "PHIT")]
    pub phit: f64,
    #[serde(rename = "PHIE")]
    pub phie: f64,
    #[serde(rename = "Sw")]
    pub sw: f64,
    #[serde(rename = "NetPay")]
    pub is_net_pay: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub anomalies: Vec<NumericAnomaly>,
}

impl ResultSample {
    pub fn depth(&self) -> f64 {
        self.sample.depth
    }

    pub fn has_anomaly(&self) -> bool {
        !self.anomalies.is_empty()
    }
}

/// All result rows of a run, zone by zone in table order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultTable {
    rows: Vec<ResultSample>,
}

impl ResultTable {
    pub fn new(rows: Vec<ResultSample>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ResultSample] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows tagged with `zone`, in depth order.
    pub fn zone_rows<'a>(&'a self, zone: &'a str) -> impl Iterator<Item = &'a ResultSample> + 'a {
        self.rows.iter().filter(move |r| r.zone_name == zone)
    }

    pub fn net_pay_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_net_pay).count()
    }

    pub fn anomaly_count(&self) -> usize {
        self.rows.iter().filter(|r| r.has_anomaly()).count()
    }
}

/// Aggregate record for one zone with at least one result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSummary {
    #[serde(rename = "Zone")]
    pub zone_name: String,
    #[serde(rename = "TopDepth")]
    pub top: f64,
    #[serde(rename = "BaseDepth")]
    pub base: f64,
    #[serde(rename = "GrossThickness")]
    pub gross_thickness: f64,
    #[serde(rename = "NetThickness")]
    pub net_thickness: f64,
    #[serde(rename = "NetToGross")]
    pub net_to_gross: f64,
    #[serde(rename = "AvgVsh")]
    pub avg_vsh: f64,
    #[serde(rename = "AvgPHIE")]
    pub avg_phie: f64,
    #[serde(rename = "AvgSw")]
    pub avg_sw: f64,
    #[serde(rename = "Samples")]
    pub sample_count: usize,
    #[serde(rename = "NetSamples")]
    pub net_sample_count: usize,
}
