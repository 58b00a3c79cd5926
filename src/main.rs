//! Petrozone - Zone-Based Well Log Evaluation
//!
//! # Usage
//!
//! ```bash
//! # Evaluate a log with ./petrozone.toml (or $PETROZONE_CONFIG, or defaults)
//! petrozone evaluate --logs well.csv --summary summary.csv
//!
//! # Explicit config, method overrides, full JSON report
//! petrozone evaluate --logs well.csv --config zones.toml --sw-method Indonesian --json report.json
//!
//! # Stand-alone volumetrics
//! petrozone volumetrics --fluid oil --area 100 --thickness 10 --phie 0.1 --sw 0.2 --fvf 1.5
//!
//! # Validate a config file
//! petrozone check-config zones.toml
//!
//! # Show the effective config (defaults filled in)
//! petrozone print-config --config zones.toml
//! ```
//!
//! # Environment Variables
//!
//! - `PETROZONE_CONFIG`: Path to the evaluation config TOML
//! - `RUST_LOG`: Logging level (default: info)
//!
//! Logs go to stderr; `--log-json` switches them to JSON lines.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use petrozone::config::validation::{validate_physical_ranges, validate_unknown_keys};
use petrozone::config::{ConfigProvenance, EvaluationConfig};
use petrozone::io::{self, EvaluationReport};
use petrozone::petrophysics::volumetrics::{
    calculate_volumetrics, zone_volumetrics, HydrocarbonType, VolumetricInputs,
};
use petrozone::petrophysics::{run_evaluation, EvaluationOutput};
use petrozone::types::{PorosityMethod, SwMethod, VshMethod};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "petrozone")]
#[command(about = "Zone-based petrophysical well log evaluation")]
#[command(version)]
struct CliArgs {
    /// Emit logs as JSON lines instead of human-readable text
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a well log against the configured zones
    Evaluate(EvaluateArgs),

    /// Hydrocarbons in place for a single interval
    Volumetrics(VolumetricsArgs),

    /// Validate a config file and report typos and range problems
    CheckConfig {
        /// Path to the TOML config
        path: PathBuf,
    },

    /// Print the effective config as TOML
    PrintConfig {
        /// Config to print (default: standard search order)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
struct EvaluateArgs {
    /// Well log CSV with a header row (Depth, GR, RHOB, NPHI, RT, ...)
    #[arg(long)]
    logs: PathBuf,

    /// Evaluation config TOML (default: $PETROZONE_CONFIG, then ./petrozone.toml)
    #[arg(long, env = "PETROZONE_CONFIG")]
    config: Option<PathBuf>,

    /// Shale volume method override (Linear, Larionov)
    #[arg(long)]
    vsh_method: Option<VshMethod>,

    /// Porosity method override (Density, Neutron-Density)
    #[arg(long)]
    porosity_method: Option<PorosityMethod>,

    /// Water saturation method override (Archie, Simandoux, Indonesian)
    #[arg(long)]
    sw_method: Option<SwMethod>,

    /// Fixed sample spacing for net thickness (default: median spacing)
    #[arg(long)]
    depth_step: Option<f64>,

    /// Write the per-sample result table as CSV
    #[arg(long)]
    results: Option<PathBuf>,

    /// Write the zone summary table as CSV
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Write a JSON report (settings, summaries, volumetrics)
    #[arg(long)]
    json: Option<PathBuf>,

    /// Include every result row in the JSON report
    #[arg(long, requires = "json")]
    json_results: bool,
}

#[derive(clap::Args, Debug)]
struct VolumetricsArgs {
    /// oil or gas
    #[arg(long, default_value = "oil")]
    fluid: HydrocarbonType,

    /// Drainage area (acres)
    #[arg(long)]
    area: f64,

    /// Net pay thickness (ft)
    #[arg(long)]
    thickness: f64,

    /// Effective porosity (fraction)
    #[arg(long)]
    phie: f64,

    /// Water saturation (fraction)
    #[arg(long)]
    sw: f64,

    /// Formation volume factor: Bo (rb/STB) or Bg (rcf/SCF)
    #[arg(long)]
    fvf: f64,

    /// Recovery factor (default: 0.1 oil, 0.5 gas)
    #[arg(long)]
    recovery_factor: Option<f64>,

    /// Unit conversion factor (default: 7758 oil, 43560 gas)
    #[arg(long)]
    conversion_factor: Option<f64>,
}

// ============================================================================
// Commands
// ============================================================================

fn load_config(path: Option<&Path>) -> Result<(EvaluationConfig, ConfigProvenance)> {
    match path {
        Some(p) => EvaluationConfig::load_from_file_with_provenance(p)
            .with_context(|| format!("Failed to load config {}", p.display())),
        None => Ok(EvaluationConfig::load_with_provenance()),
    }
}

fn run_evaluate(args: &EvaluateArgs) -> Result<()> {
    let (mut config, provenance) = load_config(args.config.as_deref())?;

    let replaced = config.override_methods(
        args.vsh_method,
        args.porosity_method,
        args.sw_method,
        &provenance,
    );
    if !replaced.is_empty() {
        warn!(keys = ?replaced, "Command-line flags replace methods set in the config file");
    }
    if let Some(step) = args.depth_step {
        if !(step > 0.0) {
            bail!("--depth-step must be > 0, got {step}");
        }
        config.curves.depth_step = Some(step);
    }

    info!(
        well = %config.well.name,
        field = %config.well.field,
        zones = config.zones.len(),
        "Starting evaluation"
    );

    let required = config.methods.required_channels();
    let (store, _report) =
        io::read_log_csv(&args.logs, &required, config.curves.duplicate_depths)
            .with_context(|| format!("Failed to load log {}", args.logs.display()))?;

    let settings = config.settings();
    let output = run_evaluation(&store, &config.zone_table(), &settings)
        .context("Evaluation aborted")?;

    let volumetrics = match &config.volumetrics {
        Some(v) => Some(zone_volumetrics(v, &output.summaries).context("Volumetrics failed")?),
        None => None,
    };

    if let Some(path) = &args.results {
        io::export::write_file(path, |f| io::write_results_csv(&output.results, f))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), rows = output.results.len(), "Result table written");
    }
    if let Some(path) = &args.summary {
        io::export::write_file(path, |f| io::write_summary_csv(&output.summaries, f))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), zones = output.summaries.len(), "Zone summary written");
    }
    if let Some(path) = &args.json {
        let mut report = EvaluationReport::new(&config.well, settings, &output);
        if args.json_results {
            report = report.with_results(&output.results);
        }
        if let Some(v) = &volumetrics {
            report = report.with_volumetrics(v);
        }
        std::fs::write(path, report.to_json()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "JSON report written");
    }

    print_summary(&config, &output);
    if let Some(vols) = &volumetrics {
        println!();
        for v in vols {
            println!(
                "  {:<16} in place {:>16.0} {}   recoverable {:>16.0} {}",
                v.zone_name,
                v.result.in_place,
                v.result.fluid.unit(),
                v.result.recoverable,
                v.result.fluid.unit()
            );
        }
    }
    Ok(())
}

fn print_summary(config: &EvaluationConfig, output: &EvaluationOutput) {
    println!();
    println!(
        "  Well: {} | Field: {} | Vsh: {} | Porosity: {} | Sw: {} | step {:.3}",
        config.well.name,
        config.well.field,
        config.methods.shale_volume,
        config.methods.porosity,
        config.methods.saturation,
        output.depth_step
    );
    println!(
        "  {:<16} {:>9} {:>9} {:>8} {:>8} {:>6} {:>7} {:>7} {:>7}",
        "Zone", "Top", "Base", "Gross", "Net", "NTG", "Vsh", "PHIE", "Sw"
    );
    for s in &output.summaries {
        println!(
            "  {:<16} {:>9.2} {:>9.2} {:>8.2} {:>8.2} {:>6.2} {:>7.3} {:>7.3} {:>7.3}",
            s.zone_name,
            s.top,
            s.base,
            s.gross_thickness,
            s.net_thickness,
            s.net_to_gross,
            s.avg_vsh,
            s.avg_phie,
            s.avg_sw
        );
    }
    let anomalies = output.results.anomaly_count();
    if anomalies > 0 {
        println!("  {anomalies} result rows carry numeric anomalies (see Flags column)");
    }
}

fn run_volumetrics(args: &VolumetricsArgs) -> Result<()> {
    let inputs = VolumetricInputs {
        fluid: args.fluid,
        area_acres: args.area,
        net_pay_ft: args.thickness,
        phie: args.phie,
        sw: args.sw,
        formation_volume_factor: args.fvf,
        recovery_factor: args
            .recovery_factor
            .unwrap_or_else(|| args.fluid.default_recovery_factor()),
        conversion_factor: args
            .conversion_factor
            .unwrap_or_else(|| args.fluid.default_conversion_factor()),
    };
    let result = calculate_volumetrics(&inputs)?;
    let label = match args.fluid {
        HydrocarbonType::Oil => "OOIP",
        HydrocarbonType::Gas => "OGIP",
    };
    println!("{label}: {:.2} {}", result.in_place, result.fluid.unit());
    println!("Recoverable: {:.2} {}", result.recoverable, result.fluid.unit());
    Ok(())
}

fn run_check_config(path: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let typos = validate_unknown_keys(&contents);
    for w in &typos {
        println!("  warning: {w}");
    }

    let config: EvaluationConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    let (mut errors, warnings) = validate_physical_ranges(&config);
    for w in &warnings {
        println!("  warning: {w}");
    }
    if let Err(e) = config.zone_table().validate() {
        errors.push(e.to_string());
    }
    for e in &errors {
        println!("  error: {e}");
    }

    if errors.is_empty() {
        println!(
            "{}: OK ({} zones, {} warnings)",
            path.display(),
            config.zones.len(),
            typos.len() + warnings.len()
        );
        Ok(())
    } else {
        bail!("{}: {} errors", path.display(), errors.len())
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    let args = CliArgs::parse();

    // Initialize logging; stdout is reserved for tables and TOML
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if args.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    match &args.command {
        Command::Evaluate(a) => run_evaluate(a),
        Command::Volumetrics(a) => run_volumetrics(a),
        Command::CheckConfig { path } => run_check_config(path),
        Command::PrintConfig { config } => {
            let config = match config {
                Some(p) => EvaluationConfig::load_from_file(p)
                    .with_context(|| format!("Failed to load config {}", p.display()))?,
                None => EvaluationConfig::load(),
            };
            if config.zones.is_empty() {
                warn!("No zones configured; evaluation will use a single whole-log zone");
            }
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}
