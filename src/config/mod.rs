//! Evaluation Configuration Module
//!
//! Methods, cutoffs, zones and curve handling loaded from TOML files.
//!
//! ## Loading Order
//!
//! 1. `PETROZONE_CONFIG` environment variable (path to TOML file)
//! 2. `petrozone.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! The config is an ordinary value passed into each evaluation; there is no
//! global instance.
//!
//! ```ignore
//! let config = EvaluationConfig::load();
//! let output = petrophysics::run_evaluation(&store, &config.zone_table(), &config.settings())?;
//! ```

mod eval_config;
pub mod defaults;
pub mod validation;

pub use eval_config::*;
