//! Model selection and net-pay cutoffs
//!
//! Each quantity is estimated by one member of a closed set of empirical
//! models. Selection strings from TOML or the CLI are parsed into these
//! enums up front, so an unknown model name never reaches the evaluator.
//! TOML and the CLI share one parser: names are case-insensitive and a few
//! aliases are accepted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ConfigurationError;
use crate::config::defaults;

/// Shale volume estimator from gamma ray.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum VshMethod {
    #[default]
    Linear,
    /// Larionov (tertiary rocks)
    Larionov,
}

/// Total porosity estimator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum PorosityMethod {
    /// Density porosity only
    #[default]
    Density,
    /// Arithmetic mean of neutron and density porosity
    #[serde(rename = "Neutron-Density")]
    NeutronDensity,
}

/// Water saturation model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum SwMethod {
    #[default]
    Archie,
    Simandoux,
    Indonesian,
}

/// Error for a model name outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind} method '{value}' (expected one of: {expected})")]
pub struct UnknownMethod {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

macro_rules! method_names {
    ($ty:ty, $kind:literal, [$($variant:ident => $name:literal $(| $alias:literal)*),+ $(,)?]) => {
        impl $ty {
            /// Display name as it appears in config files and reports.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownMethod;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let key = s.trim().to_ascii_lowercase();
                $(
                    if key == $name.to_ascii_lowercase() $(|| key == $alias)* {
                        return Ok(Self::$variant);
                    }
                )+
                Err(UnknownMethod {
                    kind: $kind,
                    value: s.to_string(),
                    expected: [$($name),+].join(", "),
                })
            }
        }

        impl TryFrom<String> for $ty {
            type Error = UnknownMethod;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }
    };
}

method_names!(VshMethod, "shale volume", [
    Linear => "Linear",
    Larionov => "Larionov",
]);
method_names!(PorosityMethod, "porosity", [
    Density => "Density",
    NeutronDensity => "Neutron-Density" | "neutron_density" | "nd",
]);
method_names!(SwMethod, "water saturation", [
    Archie => "Archie",
    Simandoux => "Simandoux",
    Indonesian => "Indonesian",
]);

/// One model per quantity, applied to every zone in a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodSelection {
    pub shale_volume: VshMethod,
    pub porosity: PorosityMethod,
    pub saturation: SwMethod,
}

impl MethodSelection {
    /// Channels the selected models read, Depth first.
    pub fn required_channels(&self) -> Vec<&'static str> {
        use super::channel;

        let mut channels = vec![channel::DEPTH, channel::GR, channel::RHOB];
        if self.porosity == PorosityMethod::NeutronDensity {
            channels.push(channel::NPHI);
        }
        channels.push(channel::RT);
        channels
    }
}

/// Net pay cutoffs: a sample is pay when
/// `Vsh <= vsh && PHIE >= phi && Sw <= sw`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cutoffs {
    pub vsh: f64,
    pub phi: f64,
    pub sw: f64,
}

impl Default for Cutoffs {
    fn default() -> Self {
        Self {
            vsh: defaults::VSH_CUTOFF,
            phi: defaults::PHI_CUTOFF,
            sw: defaults::SW_CUTOFF,
        }
    }
}

impl Cutoffs {
    pub fn new(vsh: f64, phi: f64, sw: f64) -> Self {
        Self { vsh, phi, sw }
    }

    /// Cutoffs must be finite; the [0, 1] range is checked at config load.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (cutoff, value) in [("vsh", self.vsh), ("phi", self.phi), ("sw", self.sw)] {
            if !value.is_finite() {
                return Err(ConfigurationError::InvalidCutoff { cutoff, value });
            }
        }
        Ok(())
    }
}
