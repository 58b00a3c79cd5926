//! Zones: named depth intervals, each with its own parameter set

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::ConfigurationError;
use crate::config::defaults;

/// Name given to the single zone synthesized when no zones are configured.
pub const WHOLE_LOG_ZONE: &str = "Whole_Log";

/// A named depth interval and the petrophysical parameters used inside it.
///
/// Parameter fields fall back to the built-in defaults when omitted from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    /// Top depth (inclusive)
    pub top: f64,
    /// Base depth (inclusive)
    pub base: f64,
    /// Clean sand gamma ray baseline (API)
    #[serde(default = "defaults::gr_clean")]
    pub gr_clean: f64,
    /// Shale gamma ray baseline (API)
    #[serde(default = "defaults::gr_shale")]
    pub gr_shale: f64,
    /// Matrix (grain) density (g/cc)
    #[serde(default = "defaults::matrix_density")]
    pub matrix_density: f64,
    /// Shale density (g/cc), carried for reporting
    #[serde(default = "defaults::shale_density")]
    pub shale_density: f64,
    /// Pore fluid density (g/cc)
    #[serde(default = "defaults::fluid_density")]
    pub fluid_density: f64,
    /// Archie tortuosity factor
    #[serde(default = "defaults::archie_a")]
    pub a: f64,
    /// Archie cementation exponent
    #[serde(default = "defaults::archie_m")]
    pub m: f64,
    /// Archie saturation exponent
    #[serde(default = "defaults::archie_n")]
    pub n: f64,
    /// Formation water resistivity (ohm.m)
    #[serde(default = "defaults::rw")]
    pub rw: f64,
}

impl Zone {
    /// Zone over `[top, base]` with default parameters.
    pub fn new(name: impl Into<String>, top: f64, base: f64) -> Self {
        Self {
            name: name.into(),
            top,
            base,
            gr_clean: defaults::gr_clean(),
            gr_shale: defaults::gr_shale(),
            matrix_density: defaults::matrix_density(),
            shale_density: defaults::shale_density(),
            fluid_density: defaults::fluid_density(),
            a: defaults::archie_a(),
            m: defaults::archie_m(),
            n: defaults::archie_n(),
            rw: defaults::rw(),
        }
    }

    /// `base - top`
    pub fn gross_thickness(&self) -> f64 {
        self.base - self.top
    }

    pub fn contains(&self, depth: f64) -> bool {
        depth >= self.top && depth <= self.base
    }

    /// Reject parameters the models cannot be evaluated with.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let params = [
            ("top", self.top),
            ("base", self.base),
            ("gr_clean", self.gr_clean),
            ("gr_shale", self.gr_shale),
            ("matrix_density", self.matrix_density),
            ("shale_density", self.shale_density),
            ("fluid_density", self.fluid_density),
            ("a", self.a),
            ("m", self.m),
            ("n", self.n),
            ("rw", self.rw),
        ];
        if let Some(&(parameter, _)) = params.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigurationError::NonFiniteParameter {
                zone: self.name.clone(),
                parameter,
            });
        }

        if self.base <= self.top {
            return Err(ConfigurationError::InvalidDepthRange {
                zone: self.name.clone(),
                top: self.top,
                base: self.base,
            });
        }
        if self.gr_shale == self.gr_clean {
            return Err(ConfigurationError::DegenerateGammaRay {
                zone: self.name.clone(),
                gr_clean: self.gr_clean,
                gr_shale: self.gr_shale,
            });
        }
        if self.matrix_density == self.fluid_density {
            return Err(ConfigurationError::DegenerateDensity {
                zone: self.name.clone(),
                matrix: self.matrix_density,
                fluid: self.fluid_density,
            });
        }
        if self.n == 0.0 {
            return Err(ConfigurationError::ZeroSaturationExponent {
                zone: self.name.clone(),
            });
        }
        Ok(())
    }
}

/// Ordered zones. Overlaps and gaps are allowed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneTable {
    zones: Vec<Zone>,
}

impl ZoneTable {
    pub fn new(zones: Vec<Zone>) -> Self {
        Self { zones }
    }

    /// One zone spanning `[top, base]` with default parameters.
    ///
    /// This is the global-parameter evaluation expressed as a zone table.
    pub fn whole_log(top: f64, base: f64) -> Self {
        Self::new(vec![Zone::new(WHOLE_LOG_ZONE, top, base)])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Zone> {
        self.zones.iter()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Validate every zone and check names are non-empty and unique.
    ///
    /// Stops at the first offending zone, in table order.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let mut seen = HashSet::new();
        for (index, zone) in self.zones.iter().enumerate() {
            if zone.name.trim().is_empty() {
                return Err(ConfigurationError::EmptyZoneName { index });
            }
            if !seen.insert(zone.name.as_str()) {
                return Err(ConfigurationError::DuplicateZoneName {
                    zone: zone.name.clone(),
                });
            }
            zone.validate()?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ZoneTable {
    type Item = &'a Zone;
    type IntoIter = std::slice::Iter<'a, Zone>;

    fn into_iter(self) -> Self::IntoIter {
        self.zones.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_zone_is_valid() {
        assert!(Zone::new("Z1", 1000.0, 1050.0).validate().is_ok());
    }

    #[test]
    fn test_base_not_below_top_rejected() {
        let err = Zone::new("Upper", 1050.0, 1050.0).validate().unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidDepthRange { ref zone, .. } if zone == "Upper"));
    }

    #[test]
    fn test_degenerate_parameters_rejected() {
        let mut z = Zone::new("Z", 0.0, 10.0);
        z.gr_shale = z.gr_clean;
        assert!(matches!(
            z.validate(),
            Err(ConfigurationError::DegenerateGammaRay { .. })
        ));

        let mut z = Zone::new("Z", 0.0, 10.0);
        z.fluid_density = z.matrix_density;
        assert!(matches!(
            z.validate(),
            Err(ConfigurationError::DegenerateDensity { .. })
        ));

        let mut z = Zone::new("Z", 0.0, 10.0);
        z.n = 0.0;
        assert!(matches!(
            z.validate(),
            Err(ConfigurationError::ZeroSaturationExponent { .. })
        ));

        let mut z = Zone::new("Z", 0.0, 10.0);
        z.rw = f64::NAN;
        assert!(matches!(
            z.validate(),
            Err(ConfigurationError::NonFiniteParameter { parameter: "rw", .. })
        ));
    }

    #[test]
    fn test_table_rejects_duplicate_and_empty_names() {
        let table = ZoneTable::new(vec![Zone::new("A", 0.0, 10.0), Zone::new("A", 10.0, 20.0)]);
        assert_eq!(
            table.validate(),
            Err(ConfigurationError::DuplicateZoneName { zone: "A".into() })
        );

        let table = ZoneTable::new(vec![Zone::new("A", 0.0, 10.0), Zone::new("  ", 10.0, 20.0)]);
        assert_eq!(
            table.validate(),
            Err(ConfigurationError::EmptyZoneName { index: 1 })
        );
    }

    #[test]
    fn test_overlapping_zones_are_allowed() {
        let table = ZoneTable::new(vec![Zone::new("A", 0.0, 20.0), Zone::new("B", 10.0, 30.0)]);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_zone_from_toml_uses_defaults() {
        let zone: Zone = toml::from_str(
            r#"
            name = "Sand_A"
            top = 1000.0
            base = 1050.0
            rw = 0.05
            "#,
        )
        .unwrap();
        assert_eq!(zone.rw, 0.05);
        assert_eq!(zone.gr_clean, defaults::gr_clean());
        assert_eq!(zone.matrix_density, 2.65);
    }
}
