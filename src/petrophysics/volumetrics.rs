//! Hydrocarbons in place from net pay properties
//!
//! - Oil: OOIP (STB) = 7758 × A × h × PHIE × (1 − Sw) / Bo
//! - Gas: OGIP (SCF) = 43560 × A × h × PHIE × (1 − Sw) / Bg
//!
//! Where A is area (acres) and h net pay thickness (ft).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

use crate::config::defaults;
use crate::types::ZoneSummary;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VolumetricsError {
    #[error("Formation volume factor must be > 0, got {0}")]
    NonPositiveFvf(f64),

    #[error("{field} = {value} must be within [0, 1]")]
    FractionOutOfRange { field: &'static str, value: f64 },

    #[error("{field} = {value} cannot be negative")]
    Negative { field: &'static str, value: f64 },

    #[error("Unknown hydrocarbon type '{0}' (expected oil or gas)")]
    UnknownFluid(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HydrocarbonType {
    #[default]
    Oil,
    Gas,
}

impl HydrocarbonType {
    pub const fn default_conversion_factor(self) -> f64 {
        match self {
            Self::Oil => defaults::OIL_CONVERSION_FACTOR,
            Self::Gas => defaults::GAS_CONVERSION_FACTOR,
        }
    }

    pub const fn default_recovery_factor(self) -> f64 {
        match self {
            Self::Oil => defaults::OIL_RECOVERY_FACTOR,
            Self::Gas => defaults::GAS_RECOVERY_FACTOR,
        }
    }

    /// Unit of the in-place volume.
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Oil => "STB",
            Self::Gas => "SCF",
        }
    }
}

impl fmt::Display for HydrocarbonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Oil => write!(f, "oil"),
            Self::Gas => write!(f, "gas"),
        }
    }
}

impl FromStr for HydrocarbonType {
    type Err = VolumetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oil" => Ok(Self::Oil),
            "gas" => Ok(Self::Gas),
            _ => Err(VolumetricsError::UnknownFluid(s.to_string())),
        }
    }
}

/// Reservoir-level inputs shared by every zone: area and fluid properties.
///
/// Loaded from the optional `[volumetrics]` config section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumetricsConfig {
    #[serde(default)]
    pub fluid: HydrocarbonType,
    pub area_acres: f64,
    /// Bo (rb/STB) for oil, Bg (rcf/SCF) for gas
    pub formation_volume_factor: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversion_factor: Option<f64>,
}

impl VolumetricsConfig {
    /// Inputs for one zone: net thickness and zone-average PHIE/Sw.
    pub fn inputs_for(&self, summary: &ZoneSummary) -> VolumetricInputs {
        self.inputs(summary.net_thickness, summary.avg_phie, summary.avg_sw)
    }

    fn inputs(&self, net_pay_ft: f64, phie: f64, sw: f64) -> VolumetricInputs {
        VolumetricInputs {
            fluid: self.fluid,
            area_acres: self.area_acres,
            net_pay_ft,
            phie,
            sw,
            formation_volume_factor: self.formation_volume_factor,
            recovery_factor: self
                .recovery_factor
                .unwrap_or_else(|| self.fluid.default_recovery_factor()),
            conversion_factor: self
                .conversion_factor
                .unwrap_or_else(|| self.fluid.default_conversion_factor()),
        }
    }

    /// Check the reservoir-level values shared by every zone.
    pub fn validate(&self) -> Result<(), VolumetricsError> {
        self.inputs(0.0, 0.0, 0.0).validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumetricInputs {
    pub fluid: HydrocarbonType,
    pub area_acres: f64,
    pub net_pay_ft: f64,
    pub phie: f64,
    pub sw: f64,
    pub formation_volume_factor: f64,
    pub recovery_factor: f64,
    pub conversion_factor: f64,
}

impl VolumetricInputs {
    fn validate(&self) -> Result<(), VolumetricsError> {
        if self.formation_volume_factor <= 0.0 || self.formation_volume_factor.is_nan() {
            return Err(VolumetricsError::NonPositiveFvf(self.formation_volume_factor));
        }
        for (field, value) in [
            ("area_acres", self.area_acres),
            ("net_pay_ft", self.net_pay_ft),
            ("conversion_factor", self.conversion_factor),
        ] {
            if value < 0.0 {
                return Err(VolumetricsError::Negative { field, value });
            }
        }
        // NaN averages pass through so an all-anomalous zone reports NaN volumes.
        for (field, value) in [
            ("phie", self.phie),
            ("sw", self.sw),
            ("recovery_factor", self.recovery_factor),
        ] {
            if !(0.0..=1.0).contains(&value) && !value.is_nan() {
                return Err(VolumetricsError::FractionOutOfRange { field, value });
            }
        }
        Ok(())
    }
}

/// In-place and recoverable volumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumetricResult {
    pub fluid: HydrocarbonType,
    /// OOIP (STB) or OGIP (SCF)
    pub in_place: f64,
    pub recoverable: f64,
}

/// Compute in-place and recoverable hydrocarbons.
pub fn calculate_volumetrics(inputs: &VolumetricInputs) -> Result<VolumetricResult, VolumetricsError> {
    inputs.validate()?;

    let in_place = inputs.conversion_factor
        * inputs.area_acres
        * inputs.net_pay_ft
        * inputs.phie
        * (1.0 - inputs.sw)
        / inputs.formation_volume_factor;

    Ok(VolumetricResult {
        fluid: inputs.fluid,
        in_place,
        recoverable: in_place * inputs.recovery_factor,
    })
}

/// Volumetrics for one summarized zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneVolumetrics {
    pub zone_name: String,
    #[serde(flatten)]
    pub result: VolumetricResult,
}

/// Per-zone volumetrics, in summary order.
///
/// Fails only on reservoir-level values. A zone whose averages fall
/// outside [0, 1] (PHIE is not clipped, so a dense zone can average below
/// zero) is reported with NaN volumes and a warning.
pub fn zone_volumetrics(
    config: &VolumetricsConfig,
    summaries: &[ZoneSummary],
) -> Result<Vec<ZoneVolumetrics>, VolumetricsError> {
    config.validate()?;

    Ok(summaries
        .iter()
        .map(|s| {
            let result = calculate_volumetrics(&config.inputs_for(s)).unwrap_or_else(|e| {
                warn!(zone = %s.zone_name, error = %e, "Zone averages unusable for volumetrics, reporting NaN");
                VolumetricResult {
                    fluid: config.fluid,
                    in_place: f64::NAN,
                    recoverable: f64::NAN,
                }
            });
            ZoneVolumetrics {
                zone_name: s.zone_name.clone(),
                result,
            }
        })
        .collect())
}
