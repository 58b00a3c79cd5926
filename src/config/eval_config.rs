//! Evaluation configuration - methods, cutoffs and zones as TOML
//!
//! Every section is optional; a missing section falls back to the built-in
//! defaults so an empty file is a valid whole-log evaluation.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::defaults;
use crate::petrophysics::volumetrics::VolumetricsConfig;
use crate::petrophysics::EvaluationSettings;
use crate::types::{
    Cutoffs, DuplicateDepthPolicy, MethodSelection, PorosityMethod, SwMethod, VshMethod, Zone,
    ZoneTable,
};

// ============================================================================
// Config Provenance: tracks which keys the user explicitly set
// ============================================================================

/// Dotted key paths explicitly present in the user's TOML file.
///
/// Lets the CLI tell a method chosen in the file apart from a serde default
/// when a command-line flag replaces it (see
/// [`EvaluationConfig::override_methods`]).
#[derive(Debug, Clone, Default)]
pub struct ConfigProvenance {
    pub explicit_keys: HashSet<String>,
}

impl ConfigProvenance {
    pub fn is_user_set(&self, dotted_key: &str) -> bool {
        self.explicit_keys.contains(dotted_key)
    }
}

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for one evaluation.
///
/// Load with `EvaluationConfig::load()` which searches:
/// 1. `$PETROZONE_CONFIG` env var
/// 2. `./petrozone.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Well identification, carried into reports
    #[serde(default)]
    pub well: WellInfo,

    /// Model selected for each quantity
    #[serde(default)]
    pub methods: MethodSelection,

    /// Net pay cutoffs
    #[serde(default)]
    pub cutoffs: Cutoffs,

    /// Curve store cleaning and sampling
    #[serde(default)]
    pub curves: CurveConfig,

    /// Zone table, in evaluation order
    #[serde(default, rename = "zone", skip_serializing_if = "Vec::is_empty")]
    pub zones: Vec<Zone>,

    /// Optional per-zone hydrocarbons in place
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumetrics: Option<VolumetricsConfig>,
}

/// Well / field identification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WellInfo {
    pub name: String,
    pub field: String,
    pub reservoir: String,
}

impl Default for WellInfo {
    fn default() -> Self {
        Self {
            name: "Well-01".to_string(),
            field: "Field-A".to_string(),
            reservoir: String::new(),
        }
    }
}

/// Curve store handling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    /// `keep-first` or `error`
    pub duplicate_depths: DuplicateDepthPolicy,
    /// Fixed sample spacing for thickness; median spacing when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth_step: Option<f64>,
}

impl EvaluationConfig {
    /// Load configuration using the standard search order:
    /// 1. `$PETROZONE_CONFIG` environment variable
    /// 2. `./petrozone.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        Self::load_with_provenance().0
    }

    /// Same search order as `load()`, also returning which keys the user set.
    pub fn load_with_provenance() -> (Self, ConfigProvenance) {
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file_with_provenance(&p) {
                    Ok((config, provenance)) => {
                        info!(path = %p.display(), well = %config.well.name, "Loaded evaluation config from {}", defaults::CONFIG_ENV_VAR);
                        return (config, provenance);
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", defaults::CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", defaults::CONFIG_ENV_VAR);
            }
        }

        let local = PathBuf::from(defaults::CONFIG_FILE_NAME);
        if local.exists() {
            match Self::load_from_file_with_provenance(&local) {
                Ok((config, provenance)) => {
                    info!(well = %config.well.name, "Loaded evaluation config from ./{}", defaults::CONFIG_FILE_NAME);
                    return (config, provenance);
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", defaults::CONFIG_FILE_NAME);
                }
            }
        }

        info!("No {} found, using built-in defaults", defaults::CONFIG_FILE_NAME);
        (Self::default(), ConfigProvenance::default())
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let (config, _provenance) = Self::load_from_file_with_provenance(path)?;
        Ok(config)
    }

    /// Load from a specific TOML file path, also returning provenance.
    pub fn load_from_file_with_provenance(
        path: &Path,
    ) -> Result<(Self, ConfigProvenance), ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let (config, provenance) = Self::from_toml_str(&contents)
            .map_err(|e| e.with_path(path))?;
        Ok((config, provenance))
    }

    /// Parse and validate a TOML document.
    ///
    /// Unknown keys are logged as warnings; range errors and invalid zones
    /// fail with [`ConfigError::Validation`].
    pub fn from_toml_str(contents: &str) -> Result<(Self, ConfigProvenance), ConfigError> {
        let value: toml::Value = contents
            .parse()
            .map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;

        // Two-pass: check for unknown keys first (warnings only)
        let keys = super::validation::walk_toml_keys(&value, "");
        for w in super::validation::unknown_key_warnings(&keys) {
            warn!("{}", w);
        }

        let config: Self = value
            .try_into()
            .map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;

        let provenance = ConfigProvenance {
            explicit_keys: keys.into_iter().collect(),
        };
        Ok((config, provenance))
    }

    /// Apply method choices from the command line over the file's.
    ///
    /// Returns the keys whose value was set in the file and is now replaced.
    pub fn override_methods(
        &mut self,
        shale_volume: Option<VshMethod>,
        porosity: Option<PorosityMethod>,
        saturation: Option<SwMethod>,
        provenance: &ConfigProvenance,
    ) -> Vec<&'static str> {
        let mut replaced = Vec::new();
        override_method(&mut self.methods.shale_volume, shale_volume, "methods.shale_volume", provenance, &mut replaced);
        override_method(&mut self.methods.porosity, porosity, "methods.porosity", provenance, &mut replaced);
        override_method(&mut self.methods.saturation, saturation, "methods.saturation", provenance, &mut replaced);
        replaced
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Evaluation config saved");
        Ok(())
    }

    /// Zone table for this config.
    ///
    /// With no `[[zone]]` entries the caller evaluates the whole log as one
    /// default-parameter zone; see [`ZoneTable::whole_log`].
    pub fn zone_table(&self) -> ZoneTable {
        ZoneTable::new(self.zones.clone())
    }

    /// Method, cutoff and sampling settings for `run_evaluation`.
    pub fn settings(&self) -> EvaluationSettings {
        EvaluationSettings {
            methods: self.methods,
            cutoffs: self.cutoffs,
            depth_step: self.curves.depth_step,
        }
    }

    /// Range checks plus zone and cutoff validation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (mut errors, warnings) = super::validation::validate_physical_ranges(self);
        for w in &warnings {
            warn!(field = %w.field, "{}", w);
        }

        if let Err(e) = self.zone_table().validate() {
            errors.push(e.to_string());
        }
        if let Err(e) = self.cutoffs.validate() {
            errors.push(e.to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),

    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(toml::ser::Error),

    #[error("Config validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}

fn override_method<T: Copy + PartialEq + fmt::Display>(
    slot: &mut T,
    value: Option<T>,
    key: &'static str,
    provenance: &ConfigProvenance,
    replaced: &mut Vec<&'static str>,
) {
    let Some(value) = value else { return };
    if *slot != value && provenance.is_user_set(key) {
        info!(key, file = %slot, cli = %value, "Command-line method replaces config file choice");
        replaced.push(key);
    }
    *slot = value;
}

impl ConfigError {
    fn with_path(self, path: &Path) -> Self {
        match self {
            Self::Parse(_, e) => Self::Parse(path.to_path_buf(), e),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[well]
name = "Test-1"
field = "North Field"

[methods]
shale_volume = "Larionov"
porosity = "Neutron-Density"
saturation = "Simandoux"

[cutoffs]
vsh = 0.5
phi = 0.08
sw = 0.65

[curves]
duplicate_depths = "error"
depth_step = 0.5

[[zone]]
name = "Upper"
top = 1000.0
base = 1050.0
rw = 0.05

[[zone]]
name = "Lower"
top = 1050.0
base = 1100.0
gr_clean = 25.0
gr_shale = 140.0

[volumetrics]
fluid = "gas"
area_acres = 320.0
formation_volume_factor = 0.005
"#;

    #[test]
    fn test_empty_document_is_defaults() {
        let (config, provenance) = EvaluationConfig::from_toml_str("").unwrap();
        assert_eq!(config.methods, MethodSelection::default());
        assert_eq!(config.cutoffs, Cutoffs::default());
        assert!(config.zones.is_empty());
        assert!(config.volumetrics.is_none());
        assert!(provenance.explicit_keys.is_empty());
    }

    #[test]
    fn test_full_document() {
        let (config, provenance) = EvaluationConfig::from_toml_str(FULL).unwrap();
        assert_eq!(config.well.name, "Test-1");
        assert_eq!(config.methods.shale_volume, VshMethod::Larionov);
        assert_eq!(config.methods.porosity, PorosityMethod::NeutronDensity);
        assert_eq!(config.methods.saturation, SwMethod::Simandoux);
        assert_eq!(config.cutoffs.phi, 0.08);
        assert_eq!(config.curves.duplicate_depths, DuplicateDepthPolicy::Error);
        assert_eq!(config.curves.depth_step, Some(0.5));
        assert_eq!(config.zones.len(), 2);
        assert_eq!(config.zones[0].rw, 0.05);
        assert_eq!(config.zones[1].gr_shale, 140.0);
        assert_eq!(config.zones[1].rw, defaults::rw());
        assert!(config.volumetrics.is_some());
        assert!(provenance.is_user_set("methods.saturation"));
        assert!(!provenance.is_user_set("cutoffs.missing"));
    }

    #[test]
    fn test_invalid_zone_fails_validation() {
        let doc = r#"
[[zone]]
name = "Inverted"
top = 1100.0
base = 1000.0
"#;
        let err = EvaluationConfig::from_toml_str(doc).unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert!(errors.iter().any(|e| e.contains("Inverted")));
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_unknown_method_is_parse_error() {
        let doc = r#"
[methods]
saturation = "Dual-Water"
"#;
        assert!(matches!(
            EvaluationConfig::from_toml_str(doc),
            Err(ConfigError::Parse(..))
        ));
    }

    #[test]
    fn test_cli_override_reports_replaced_file_choice() {
        let doc = r#"
[methods]
saturation = "Simandoux"
"#;
        let (mut config, provenance) = EvaluationConfig::from_toml_str(doc).unwrap();
        let replaced = config.override_methods(
            Some(VshMethod::Larionov),
            None,
            Some(SwMethod::Indonesian),
            &provenance,
        );
        // shale_volume was a default, so only saturation counts as replaced
        assert_eq!(replaced, vec!["methods.saturation"]);
        assert_eq!(config.methods.shale_volume, VshMethod::Larionov);
        assert_eq!(config.methods.porosity, PorosityMethod::Density);
        assert_eq!(config.methods.saturation, SwMethod::Indonesian);
    }

    #[test]
    fn test_cli_override_with_same_method_replaces_nothing() {
        let (mut config, provenance) =
            EvaluationConfig::from_toml_str(r#"
[methods]
saturation = "Archie"
"#)
            .unwrap();
        let replaced = config.override_methods(None, None, Some(SwMethod::Archie), &provenance);
        assert!(replaced.is_empty());
        assert_eq!(config.methods.saturation, SwMethod::Archie);
    }

    #[test]
    fn test_to_toml_reloads() {
        let (config, _) = EvaluationConfig::from_toml_str(FULL).unwrap();
        let text = config.to_toml().unwrap();
        let (reloaded, _) = EvaluationConfig::from_toml_str(&text).unwrap();
        assert_eq!(reloaded.zones, config.zones);
        assert_eq!(reloaded.methods, config.methods);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("petrozone.toml");
        std::fs::write(&path, FULL).unwrap();
        let config = EvaluationConfig::load_from_file(&path).unwrap();
        assert_eq!(config.zones[0].name, "Upper");

        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            EvaluationConfig::load_from_file(&missing),
            Err(ConfigError::Io(..))
        ));
    }
}
