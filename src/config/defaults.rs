//! Built-in default values.
//!
//! Zone parameter defaults double as serde `default = "..."` functions so a
//! `[[zone]]` entry only needs the keys that differ.

// ============================================================================
// Zone Parameters
// ============================================================================

/// Clean sand gamma ray (API).
pub const fn gr_clean() -> f64 {
    20.0
}

/// Shale gamma ray (API).
pub const fn gr_shale() -> f64 {
    120.0
}

/// Quartz sandstone matrix density (g/cc).
pub const fn matrix_density() -> f64 {
    2.65
}

pub const fn shale_density() -> f64 {
    2.40
}

/// Fresh water filtrate (g/cc).
pub const fn fluid_density() -> f64 {
    1.00
}

pub const fn archie_a() -> f64 {
    1.0
}

pub const fn archie_m() -> f64 {
    2.0
}

pub const fn archie_n() -> f64 {
    2.0
}

/// Formation water resistivity (ohm.m).
pub const fn rw() -> f64 {
    0.03
}

// ============================================================================
// Net Pay Cutoffs
// ============================================================================

pub const VSH_CUTOFF: f64 = 0.4;
pub const PHI_CUTOFF: f64 = 0.10;
pub const SW_CUTOFF: f64 = 0.6;

// ============================================================================
// Volumetrics
// ============================================================================

/// Acre-ft to reservoir barrels.
pub const OIL_CONVERSION_FACTOR: f64 = 7758.0;

/// Acre-ft to cubic feet.
pub const GAS_CONVERSION_FACTOR: f64 = 43_560.0;

pub const OIL_RECOVERY_FACTOR: f64 = 0.1;

pub const GAS_RECOVERY_FACTOR: f64 = 0.5;

// ============================================================================
// Log Import
// ============================================================================

/// LAS null value, treated as missing on import.
pub const LAS_NULL: f64 = -999.25;

/// Config file searched in the working directory.
pub const CONFIG_FILE_NAME: &str = "petrozone.toml";

/// Environment variable pointing at a config file.
pub const CONFIG_ENV_VAR: &str = "PETROZONE_CONFIG";
