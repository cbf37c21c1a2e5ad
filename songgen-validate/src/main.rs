//! validate - song-generation request validator
//!
//! **Usage:**
//! ```bash
//! validate <INPUT> [OUTPUT] [--config <file>] [--workers <n>] [--export <file>]
//! ```
//!
//! Exit status is 0 when the corrected stream can be fed to generation as-is
//! and 1 when manual fixes are needed or the run failed.

use anyhow::{Context, Result};
use clap::Parser;
use songgen_common::config::{ConfigResolver, DEFAULT_LOG_LEVEL};
use songgen_validate::{default_output_path, StreamDriver, ValidateError, ValidationReport};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

/// Validate and auto-correct a JSONL file of song-generation requests
#[derive(Parser, Debug)]
#[clap(name = "validate")]
#[clap(about = "Validate and auto-correct song-generation request records (JSONL)")]
struct Args {
    /// Input JSONL file
    input: PathBuf,

    /// Corrected output file (default: corrected_<input name> beside the input)
    output: Option<PathBuf>,

    /// Configuration file (overrides SONGGEN_CONFIG and the user config)
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Worker threads for per-line validation
    #[clap(long, value_name = "N", env = "SONGGEN_WORKERS")]
    workers: Option<usize>,

    /// Also write the full report as JSON
    #[clap(long, value_name = "FILE")]
    export: Option<PathBuf>,
}

/// Reloads the log filter once the config level is known
///
/// `None` when `RUST_LOG` is set, which takes precedence over the config.
type LevelHandle = Option<reload::Handle<EnvFilter, Registry>>;

/// Start logging to stderr before config resolution so its warnings are seen
fn init_tracing() -> LevelHandle {
    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(DEFAULT_LOG_LEVEL), false),
    };
    let (filter, handle) = reload::Layer::new(filter);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
    (!from_env).then_some(handle)
}

fn apply_log_level(handle: &LevelHandle, level: &str) {
    if let Some(handle) = handle {
        if let Err(e) = handle.reload(EnvFilter::new(level)) {
            warn!("Cannot apply log level '{}': {}", level, e);
        }
    }
}

fn run(args: Args, log_level: &LevelHandle) -> Result<ValidationReport> {
    let mut config = ConfigResolver::new(args.config.clone())
        .resolve()
        .context("Failed to load configuration")?;
    if let Some(workers) = args.workers {
        config.runtime.workers = workers.max(1);
    }
    apply_log_level(log_level, &config.logging.level);
    info!("validate {}", env!("CARGO_PKG_VERSION"));

    let driver = StreamDriver::from_config(&config)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));

    let report = driver.run(&args.input, &output)?;

    if let Some(path) = &args.export {
        report.export_json(path)?;
        info!("Report exported to {}", path.display());
    }
    Ok(report)
}

fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = init_tracing();

    match run(args, &log_level) {
        Ok(report) => {
            print!("{}", report.render());
            println!("{}", report.closing_line());
            ExitCode::from(report.verdict.exit_status())
        }
        Err(e) => {
            match e.downcast_ref::<ValidateError>() {
                Some(ValidateError::InputNotFound(_)) => println!("Error: {}", e),
                _ => println!("Unexpected error: {:#}", e),
            }
            error!("Validation run failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
