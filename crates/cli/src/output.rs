//! Output formatting utilities

use anyhow::Result;
use colored::Colorize;
use predictor_lib::{PredictionResponse, PredictionStatus};
use serde::Serialize;

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Format confidence as a percentage with two decimals
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.2}%", confidence)
}

/// Color status based on outcome
pub fn color_status(status: PredictionStatus) -> String {
    match status {
        PredictionStatus::FailurePredicted => status.as_str().red().bold().to_string(),
        PredictionStatus::Nominal => status.as_str().green().to_string(),
    }
}

/// Serialize with four-space indentation
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf)?)
}

/// Print the human-readable summary followed by the JSON payload
pub fn print_results(response: &PredictionResponse) -> Result<()> {
    let payload = to_pretty_json(response)?;

    println!();
    println!("--- AI PREDICTION RESULTS ---");
    println!("Status: {}", color_status(response.status));
    println!("Confidence: {}", format_confidence(response.confidence));
    println!("-----------------------------");
    println!();
    println!("JSON output for automation tools:");
    println!("{}", payload);
    Ok(())
}
