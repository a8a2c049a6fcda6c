//! WellGate command-line front end
//!
//! Reads a JSON request, runs one verification, prints the JSON result to
//! stdout. Logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Barrier envelope (object request, or an array of envelopes for a batch)
//! wellgate verify-barriers envelope.json
//!
//! # Tool string against the equipment catalog
//! wellgate --catalog data/equipment.json validate-toolstring toolstring.json
//!
//! # Combined intervention plan
//! wellgate --catalog data/equipment.json plan plan.json
//!
//! # Print the effective configuration
//! wellgate check-config wellgate.toml
//! ```
//!
//! # Exit Codes
//!
//! - `0`: evaluated, no stop-job finding
//! - `1`: input, config or catalog error
//! - `2`: evaluated, at least one result requires stop-job
//!
//! # Environment Variables
//!
//! - `WELLGATE_CONFIG`: path to the engine config TOML
//! - `WELLGATE_CATALOG`: path to the equipment catalog JSON
//! - `RUST_LOG`: logging level (default: info)

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

use wellgate::{
    BarrierEnvelope, BarrierVerificationRequest, BarrierVerifier, CatalogHandle, EngineConfig,
    EquipmentCatalog, PlanGenerator, PlanRequest, ToolstringRequest, VerificationOptions,
    VerificationResult,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "wellgate")]
#[command(about = "Well barrier and toolstring verification engine")]
#[command(version)]
struct CliArgs {
    /// Engine config TOML (default: $WELLGATE_CONFIG, then ./wellgate.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Equipment catalog JSON, overrides [catalog].path
    #[arg(long, global = true, env = "WELLGATE_CATALOG")]
    catalog: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Verify a barrier envelope against NORSOK D-010 (use '-' for stdin)
    VerifyBarriers {
        /// Request object (options left out come from config), or an array of envelopes
        file: PathBuf,
    },

    /// Validate a tool string against the catalog and wellbore geometry
    ValidateToolstring {
        file: PathBuf,
    },

    /// Generate an intervention plan with an approved / flagged / rejected verdict
    Plan {
        file: PathBuf,
    },

    /// Load, validate and print the effective configuration
    CheckConfig {
        /// Config file to check (default: standard search order)
        file: Option<PathBuf>,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<ExitCode> {
    let args = CliArgs::parse();
    init_logging(args.json_logs);

    if let SubCommand::CheckConfig { file } = &args.command {
        return check_config(file.as_deref().or(args.config.as_deref()));
    }

    let config = load_config(args.config.as_deref())?;

    let stop_job = match &args.command {
        SubCommand::VerifyBarriers { file } => verify_barriers(file, &config)?,
        SubCommand::ValidateToolstring { file } => {
            let catalog = load_catalog(args.catalog.as_deref(), &config)?;
            let request: ToolstringRequest = read_json(file)?;
            let max_weight = request.max_weight.unwrap_or(config.toolstring.max_weight_lbs);
            let report = catalog
                .solver()
                .validate(&request.tool_string, &request.wellbore, max_weight)?;
            print_json(&report)?;
            report.stop_job_required
        }
        SubCommand::Plan { file } => {
            let catalog = load_catalog(args.catalog.as_deref(), &config)?;
            let request: PlanRequest = read_json(file)?;
            let plan = PlanGenerator::new(catalog.solver())
                .with_max_weight(config.toolstring.max_weight_lbs)?
                .with_options(config.verification)
                .generate_plan(&request)?;
            print_json(&plan)?;
            plan.stop_job_required
        }
        SubCommand::CheckConfig { .. } => false,
    };

    if stop_job {
        warn!("STOP JOB: do not proceed until violations are resolved");
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

// ============================================================================
// Subcommands
// ============================================================================

fn verify_barriers(file: &Path, config: &EngineConfig) -> Result<bool> {
    let raw: serde_json::Value = read_json(file)?;
    let output = evaluate_barriers(&BarrierVerifier::new(), raw, &config.verification)?;
    print_json(&output)?;
    Ok(output.stop_job_required())
}

/// Result of a barrier input: one request, or a batch of envelopes.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum BarrierOutput {
    Single(VerificationResult),
    Batch(Vec<VerificationResult>),
}

impl BarrierOutput {
    fn stop_job_required(&self) -> bool {
        match self {
            BarrierOutput::Single(r) => r.stop_job_required,
            BarrierOutput::Batch(rs) => rs.iter().any(|r| r.stop_job_required),
        }
    }
}

fn evaluate_barriers(
    verifier: &BarrierVerifier,
    raw: serde_json::Value,
    configured: &VerificationOptions,
) -> Result<BarrierOutput> {
    if raw.is_array() {
        let envelopes: Vec<BarrierEnvelope> =
            serde_json::from_value(raw).context("Invalid barrier envelope array")?;
        info!(envelopes = envelopes.len(), "Batch barrier verification");
        let results = verifier.verify_many(&envelopes, configured)?;
        Ok(BarrierOutput::Batch(results))
    } else {
        let request: BarrierVerificationRequest =
            serde_json::from_value(raw).context("Invalid barrier verification request")?;
        let options = request.options(configured);
        let result = verifier.verify(&request.barrier_envelope, &options)?;
        Ok(BarrierOutput::Single(result))
    }
}

fn check_config(path: Option<&Path>) -> Result<ExitCode> {
    let config = load_config(path)?;
    print!("{}", config.to_toml()?);
    info!("Config OK");
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// Helpers
// ============================================================================

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(p) => EngineConfig::load_from_file(p)
            .with_context(|| format!("Failed to load config {}", p.display())),
        None => Ok(EngineConfig::load()),
    }
}

fn load_catalog(cli_path: Option<&Path>, config: &EngineConfig) -> Result<CatalogHandle> {
    let Some(path) = cli_path.or(config.catalog.path.as_deref()) else {
        bail!("No equipment catalog configured: pass --catalog or set [catalog].path");
    };
    let catalog = EquipmentCatalog::load_from_file(path)
        .with_context(|| format!("Failed to load equipment catalog {}", path.display()))?;
    Ok(CatalogHandle::new(catalog))
}

/// Read and parse a JSON document; `-` reads stdin.
fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
