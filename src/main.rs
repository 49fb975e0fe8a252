//! fever-triage - symptom triage from the command line
//!
//! Reads triage request documents (JSON), runs them through the classifier
//! and the triage policy, and prints response documents to stdout. Logs go
//! to stderr.
//!
//! # Usage
//!
//! ```bash
//! # One request
//! echo '{"fever":1,"headache":1,"age":25}' | fever-triage predict
//!
//! # JSON Lines in, JSON Lines out
//! fever-triage --model models/dengue_model.json batch --input requests.jsonl
//!
//! # Is a model loaded?
//! fever-triage status
//! ```
//!
//! # Environment Variables
//!
//! - `FEVER_TRIAGE_CONFIG`: Path to a TOML config file
//! - `FEVER_TRIAGE_MODEL`: Model file, overrides `model.path`
//! - `RUST_LOG`: Logging filter, overrides `logging.filter`

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter};

use fever_triage::config::{self, TriageConfig};
use fever_triage::report::{self, ErrorCode, ServiceStatus, TriageResponse};
use fever_triage::{ModelHandle, TriageEngine};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "fever-triage")]
#[command(about = "Dengue / malaria symptom triage")]
#[command(version)]
struct CliArgs {
    /// Path to a TOML config file (default: $FEVER_TRIAGE_CONFIG, then ./triage_config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Classifier model file, overrides `model.path`
    #[arg(long, value_name = "PATH", env = "FEVER_TRIAGE_MODEL")]
    model: Option<PathBuf>,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Triage a single request document
    Predict {
        /// Request file, or "-" for stdin
        #[arg(long, short, default_value = "-")]
        input: String,
    },

    /// Triage JSON Lines requests in parallel, one response per line
    Batch {
        /// Requests file, or "-" for stdin
        #[arg(long, short, default_value = "-")]
        input: String,
    },

    /// Print service status (model loaded or not)
    Status,

    /// Validate configuration and print the effective settings
    CheckConfig,
}

// ============================================================================
// Helpers
// ============================================================================

/// Raw input bytes. Decoding is left to the report layer so a bad record
/// becomes an error document instead of aborting the run.
fn read_input(input: &str) -> Result<Vec<u8>> {
    if input == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read request from stdin")?;
        Ok(buf)
    } else {
        std::fs::read(input).with_context(|| format!("Failed to read {input}"))
    }
}

fn load_config(explicit: Option<&Path>) -> Result<TriageConfig> {
    match explicit {
        Some(path) => {
            let config = TriageConfig::load_from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            info!(path = %path.display(), "Loaded triage config");
            Ok(config)
        }
        None => Ok(TriageConfig::load()),
    }
}

/// Exit status for a rejected request.
const fn exit_code_for(response: &TriageResponse) -> u8 {
    match response {
        TriageResponse::Success(_) => 0,
        TriageResponse::Failure(f) => match f.error.code {
            ErrorCode::BadRequest => 2,
            ErrorCode::ServiceUnavailable => 3,
            ErrorCode::InternalError => 1,
        },
    }
}

fn run_batch(engine: &TriageEngine, threads: usize, raw: &[u8]) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("Failed to build batch worker pool")?;
    let responses = pool.install(|| report::handle_jsonl(engine, raw));

    let failed = responses.iter().filter(|r| !r.is_success()).count();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for response in &responses {
        writeln!(out, "{}", response.to_json())?;
    }
    out.flush()?;

    info!(total = responses.len(), failed, "Batch triage complete");
    Ok(())
}

// ============================================================================
// Entry Point
// ============================================================================

fn main() -> Result<ExitCode> {
    // Initialize logging. The filter is reloaded from config once it is known,
    // unless RUST_LOG is set.
    let rust_log = EnvFilter::try_from_default_env().ok();
    let from_env = rust_log.is_some();
    let (filter, filter_handle) =
        reload::Layer::new(rust_log.unwrap_or_else(|| EnvFilter::new(config::defaults::LOG_FILTER)));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let mut triage_config = load_config(args.config.as_deref())?;
    if let Some(model) = args.model {
        triage_config.model.path = model;
    }
    if !from_env {
        let directive = triage_config.logging.filter.clone();
        filter_handle
            .modify(|f| *f = EnvFilter::new(directive))
            .context("Failed to apply logging.filter")?;
    }

    for w in config::validation::validate_settings(&triage_config) {
        warn!("{}", w);
    }

    if let SubCommand::CheckConfig = args.command {
        triage_config.validate()?;
        print!("{}", triage_config.to_toml()?);
        return Ok(ExitCode::SUCCESS);
    }

    let model = ModelHandle::load(&triage_config.model.path).with_context(|| {
        format!(
            "Failed to load model {}",
            triage_config.model.path.display()
        )
    })?;
    let engine = TriageEngine::new(model)
        .with_default_patient_name(triage_config.patient.default_name.clone());

    match args.command {
        SubCommand::Predict { input } => {
            let body = read_input(&input)?;
            let response = report::handle_bytes(&engine, &body);
            println!("{}", response.to_json());
            Ok(ExitCode::from(exit_code_for(&response)))
        }
        SubCommand::Batch { input } => {
            let raw = read_input(&input)?;
            run_batch(&engine, triage_config.batch.threads, &raw)?;
            Ok(ExitCode::SUCCESS)
        }
        SubCommand::Status => {
            let status = ServiceStatus::of(engine.model());
            println!("{}", serde_json::to_string(&status)?);
            Ok(ExitCode::SUCCESS)
        }
        SubCommand::CheckConfig => Ok(ExitCode::SUCCESS),
    }
}
