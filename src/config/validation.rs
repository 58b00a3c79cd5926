//! Config validation: unknown-key detection with Levenshtein suggestions
//! and physical range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

use super::EvaluationConfig;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Every valid dotted key path for `EvaluationConfig`.
///
/// Entries of the `[[zone]]` array share the `zone.*` paths.
/// Any new field added to the config structs must be added here too.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [well]
        "well",
        "well.name",
        "well.field",
        "well.reservoir",
        // [methods]
        "methods",
        "methods.shale_volume",
        "methods.porosity",
        "methods.saturation",
        // [cutoffs]
        "cutoffs",
        "cutoffs.vsh",
        "cutoffs.phi",
        "cutoffs.sw",
        // [curves]
        "curves",
        "curves.duplicate_depths",
        "curves.depth_step",
        // [[zone]]
        "zone",
        "zone.name",
        "zone.top",
        "zone.base",
        "zone.gr_clean",
        "zone.gr_shale",
        "zone.matrix_density",
        "zone.shale_density",
        "zone.fluid_density",
        "zone.a",
        "zone.m",
        "zone.n",
        "zone.rw",
        // [volumetrics]
        "volumetrics",
        "volumetrics.fluid",
        "volumetrics.area_acres",
        "volumetrics.formation_volume_factor",
        "volumetrics.recovery_factor",
        "volumetrics.conversion_factor",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// Arrays of tables contribute their element keys under the array's own
/// path, so `[[zone]] rw = 1` yields `["zone", "zone.rw"]`. Duplicates are
/// removed, first occurrence wins.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            match v {
                toml::Value::Table(_) => keys.extend(walk_toml_keys(v, &path)),
                toml::Value::Array(items) => {
                    for item in items.iter().filter(|i| i.is_table()) {
                        keys.extend(walk_toml_keys(item, &path));
                    }
                }
                _ => {}
            }
        }
    }
    let mut seen = HashSet::new();
    keys.retain(|k| seen.insert(k.clone()));
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Ties resolve to the alphabetically first key so suggestions are stable.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (levenshtein(unknown, k), k))
        .filter(|&(dist, _)| dist <= 3)
        .min()
        .map(|(_, k)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys, it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        return Vec::new(); // parse errors are handled by serde later
    };
    unknown_key_warnings(&walk_toml_keys(&value, ""))
}

/// Warnings for the dotted keys that are not config fields.
pub fn unknown_key_warnings(keys: &[String]) -> Vec<ValidationWarning> {
    let known = known_config_keys();
    keys.iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key.clone(),
        })
        .collect()
}

// ============================================================================
// Physical Range Validation
// ============================================================================

/// Validate physical ranges on a parsed config.
///
/// Returns (errors, warnings): errors are values no evaluation can use;
/// warnings are suspicious but evaluated as given.
pub fn validate_physical_ranges(config: &EvaluationConfig) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Cutoffs compare against fractions
    let c = &config.cutoffs;
    for (name, value) in [("vsh", c.vsh), ("phi", c.phi), ("sw", c.sw)] {
        if !(0.0..=1.0).contains(&value) {
            errors.push(format!(
                "cutoffs.{name} = {value:.3} is outside physical range (0-1)"
            ));
        }
    }

    if let Some(step) = config.curves.depth_step {
        if !(step > 0.0) {
            errors.push(format!("curves.depth_step = {step} must be > 0"));
        }
    }

    if let Some(v) = &config.volumetrics {
        if !(v.formation_volume_factor > 0.0) {
            errors.push(format!(
                "volumetrics.formation_volume_factor = {} must be > 0",
                v.formation_volume_factor
            ));
        }
        if v.area_acres < 0.0 {
            errors.push(format!(
                "volumetrics.area_acres = {} cannot be negative",
                v.area_acres
            ));
        }
        if let Some(rf) = v.recovery_factor {
            if !(0.0..=1.0).contains(&rf) {
                errors.push(format!(
                    "volumetrics.recovery_factor = {rf:.3} is outside physical range (0-1)"
                ));
            }
        }
    }

    for zone in &config.zones {
        let mut warn = |field: &str, message: String| {
            warnings.push(ValidationWarning {
                field: format!("zone[{}].{field}", zone.name),
                message: format!("zone '{}': {message}", zone.name),
                suggestion: None,
            });
        };

        // Densities: anything outside 1.0-3.2 g/cc is not a rock or pore fluid
        for (field, value) in [
            ("matrix_density", zone.matrix_density),
            ("shale_density", zone.shale_density),
        ] {
            if !(1.0..=3.2).contains(&value) {
                warn(field, format!("{field} = {value:.2} is outside typical range (1.0-3.2 g/cc)"));
            }
        }
        if !(0.5..=1.3).contains(&zone.fluid_density) {
            warn(
                "fluid_density",
                format!(
                    "fluid_density = {:.2} is outside typical range (0.5-1.3 g/cc)",
                    zone.fluid_density
                ),
            );
        }
        if zone.gr_shale < zone.gr_clean {
            warn(
                "gr_shale",
                format!(
                    "gr_shale ({:.1}) is below gr_clean ({:.1}); shale volume will be inverted",
                    zone.gr_shale, zone.gr_clean
                ),
            );
        }
        if !(0.5..=1.5).contains(&zone.a) {
            warn("a", format!("a = {:.2} is outside typical range (0.5-1.5)", zone.a));
        }
        if !(1.0..=3.0).contains(&zone.m) {
            warn("m", format!("m = {:.2} is outside typical range (1.0-3.0)", zone.m));
        }
        if !(1.0..=3.0).contains(&zone.n) {
            warn("n", format!("n = {:.2} is outside typical range (1.0-3.0)", zone.n));
        }
        if zone.rw <= 0.0 {
            warn("rw", format!("rw = {:.3} should be > 0; saturation will be zero or undefined", zone.rw));
        }
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Zone;

    #[test]
    fn test_levenshtein_identical() {
        assert_eq!(levenshtein("hello", "hello"), 0);
    }

    #[test]
    fn test_levenshtein_one_edit() {
        assert_eq!(levenshtein("saturaton", "saturation"), 1);
    }

    #[test]
    fn test_levenshtein_empty() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn test_walk_toml_keys_nested() {
        let toml: toml::Value = r#"
            [methods]
            saturation = "Archie"
        "#
        .parse()
        .unwrap();
        let keys = walk_toml_keys(&toml, "");
        assert!(keys.contains(&"methods".to_string()));
        assert!(keys.contains(&"methods.saturation".to_string()));
    }

    #[test]
    fn test_walk_toml_keys_array_of_tables() {
        let toml: toml::Value = r#"
            [[zone]]
            name = "A"
            rw = 0.1

            [[zone]]
            name = "B"
            gr_clean = 15.0
        "#
        .parse()
        .unwrap();
        let keys = walk_toml_keys(&toml, "");
        assert_eq!(keys, vec!["zone", "zone.name", "zone.rw", "zone.gr_clean"]);
    }

    #[test]
    fn test_typo_key_produces_warning_with_suggestion() {
        let toml_str = r#"
[cutoffs]
swc = 0.6
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "cutoffs.swc");
        assert_eq!(warnings[0].suggestion.as_deref(), Some("cutoffs.sw"));
    }

    #[test]
    fn test_typo_in_zone_entry() {
        let toml_str = r#"
[[zone]]
name = "A"
top = 1.0
base = 2.0
gr_shael = 120.0
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].suggestion.as_deref(), Some("zone.gr_shale"));
    }

    #[test]
    fn test_all_valid_keys_produce_zero_warnings() {
        let toml_str = r#"
[well]
name = "Test-1"

[methods]
porosity = "Density"

[cutoffs]
sw = 0.5

[[zone]]
name = "A"
top = 1.0
base = 2.0
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert!(warnings.is_empty(), "Expected 0 warnings, got: {warnings:?}");
    }

    #[test]
    fn test_suggest_correction_no_match_for_garbage() {
        let known = known_config_keys();
        assert!(suggest_correction("completely_unrelated_garbage_key_xyz", &known).is_none());
    }

    #[test]
    fn test_physical_range_defaults_clean() {
        let mut config = EvaluationConfig::default();
        config.zones.push(Zone::new("A", 1000.0, 1100.0));
        let (errors, warnings) = validate_physical_ranges(&config);
        assert!(errors.is_empty(), "Defaults should produce no errors: {errors:?}");
        assert!(warnings.is_empty(), "Defaults should produce no warnings: {warnings:?}");
    }

    #[test]
    fn test_cutoff_out_of_range_is_error() {
        let mut config = EvaluationConfig::default();
        config.cutoffs.sw = 1.5;
        let (errors, _) = validate_physical_ranges(&config);
        assert!(errors.iter().any(|e| e.contains("cutoffs.sw")));
    }

    #[test]
    fn test_zero_depth_step_is_error() {
        let mut config = EvaluationConfig::default();
        config.curves.depth_step = Some(0.0);
        let (errors, _) = validate_physical_ranges(&config);
        assert!(errors.iter().any(|e| e.contains("depth_step")));
    }

    #[test]
    fn test_suspicious_zone_parameters_warn() {
        let mut config = EvaluationConfig::default();
        let mut zone = Zone::new("Odd", 1000.0, 1100.0);
        zone.matrix_density = 4.5;
        zone.m = 5.0;
        zone.rw = 0.0;
        config.zones.push(zone);
        let (errors, warnings) = validate_physical_ranges(&config);
        assert!(errors.is_empty());
        assert!(warnings.iter().any(|w| w.field == "zone[Odd].matrix_density"));
        assert!(warnings.iter().any(|w| w.field == "zone[Odd].m"));
        assert!(warnings.iter().any(|w| w.field == "zone[Odd].rw"));
    }
}
