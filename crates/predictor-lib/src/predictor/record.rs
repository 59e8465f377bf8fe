//! Record adaptation for inference
//!
//! Parses one caller-supplied record and shapes it into the single-row
//! table the pipeline expects, injecting the placeholder columns that
//! were part of the training schema but are never supplied at runtime.

use crate::error::PredictError;
use crate::models::{FeatureRow, InputRecord};
use serde_json::Value;

/// Placeholder product identifier column
pub const PRODUCT_ID_COLUMN: &str = "Product ID";
pub const PRODUCT_ID_PLACEHOLDER: &str = "Placeholder";

/// Placeholder failure type column
pub const FAILURE_TYPE_COLUMN: &str = "Failure Type";
pub const FAILURE_TYPE_PLACEHOLDER: &str = "No Failure";

/// Columns injected into every row, overwriting caller values
pub const PLACEHOLDER_COLUMNS: [(&str, &str); 2] = [
    (PRODUCT_ID_COLUMN, PRODUCT_ID_PLACEHOLDER),
    (FAILURE_TYPE_COLUMN, FAILURE_TYPE_PLACEHOLDER),
];

/// Parse a record from raw JSON bytes (an HTTP body or file contents)
pub fn parse_record(bytes: &[u8]) -> Result<InputRecord, PredictError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| PredictError::InvalidRecord(format!("malformed JSON: {}", e)))?;
    record_from_value(value)
}

/// Accept exactly one JSON object as an inference unit
pub fn record_from_value(value: Value) -> Result<InputRecord, PredictError> {
    match value {
        Value::Object(fields) => Ok(InputRecord::new(fields)),
        other => Err(PredictError::InvalidRecord(format!(
            "expected a single JSON object, found {}",
            json_kind(&other)
        ))),
    }
}

/// Build the single-row table with placeholder columns set
pub fn augment(record: &InputRecord) -> FeatureRow {
    let mut row = FeatureRow::new(record.fields().clone());
    for (column, value) in PLACEHOLDER_COLUMNS {
        row.set(column, value);
    }
    row
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
