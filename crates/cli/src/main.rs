//! Predictive Maintenance CLI
//!
//! Loads the pipeline artifact, reads one record from a local JSON file,
//! and prints the prediction as a summary and as a JSON payload.

mod output;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use predictor_lib::{
    load_artifact, predictor::parse_record, InputRecord, LoadError, Predictor, DEFAULT_MODEL_PATH,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

/// Fixed input file read when no other path is given
const DEFAULT_INPUT_PATH: &str = "input.json";

/// Predictive Maintenance failure prediction CLI
#[derive(Parser)]
#[command(name = "predict")]
#[command(author, version, about = "Predict machine failure for one record of sensor readings", long_about = None)]
pub struct Cli {
    /// Pipeline artifact to load
    #[arg(long, short, env = "PREDICTOR_MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model: PathBuf,

    /// Input record file (a single JSON object)
    #[arg(long, short, default_value = DEFAULT_INPUT_PATH)]
    pub input: PathBuf,

    /// Also write the JSON payload to this file
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
            .with_writer(std::io::stderr)
            .init();
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&format!("Error: {:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let predictor = load_predictor(&cli.model)?;
    output::print_success("Model loaded successfully.");

    let record = read_record(&cli.input)?;
    output::print_success(&format!("New data loaded from {}.", cli.input.display()));

    let response = predictor
        .predict(record)
        .map_err(|e| anyhow!("prediction failed: {}", e))?;
    debug!(status = %response.status, confidence = response.confidence, "Prediction complete");

    output::print_results(&response)?;

    if let Some(path) = &cli.output {
        let payload = output::to_pretty_json(&response)?;
        std::fs::write(path, payload)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        output::print_success(&format!("Payload written to {}.", path.display()));
    }

    Ok(())
}

fn load_predictor(path: &Path) -> Result<Predictor> {
    match load_artifact(path) {
        Ok(artifact) => {
            debug!(
                version = %artifact.version(),
                checksum = %artifact.checksum,
                "Artifact loaded"
            );
            Ok(Predictor::from_artifact(artifact))
        }
        Err(LoadError::NotFound(_)) => Err(anyhow!("'{}' not found.", path.display())),
        Err(e) => Err(anyhow!("'{}' could not be loaded: {}", path.display(), e)),
    }
}

fn read_record(path: &Path) -> Result<InputRecord> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(anyhow!("'{}' not found.", path.display()))
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read '{}'", path.display()))
        }
    };
    parse_record(&bytes).map_err(|e| anyhow!("'{}' is not a usable record: {}", path.display(), e))
}
