//! Core data models for the failure predictor

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One caller-supplied record of sensor and equipment readings
///
/// Kept exactly as received so it can be echoed back in the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputRecord(Map<String, Value>);

impl InputRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

/// Single-row table handed to the pipeline: the input record plus placeholder columns
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    columns: Map<String, Value>,
}

impl FeatureRow {
    pub fn new(columns: Map<String, Value>) -> Self {
        Self { columns }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Set a column, replacing any value already present
    pub fn set(&mut self, column: &str, value: impl Into<Value>) {
        self.columns.insert(column.to_string(), value.into());
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Human-readable outcome of a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictionStatus {
    #[serde(rename = "Failure Predicted")]
    FailurePredicted,
    #[serde(rename = "Nominal")]
    Nominal,
}

impl PredictionStatus {
    pub fn from_label(label: u8) -> Self {
        if label == 1 {
            PredictionStatus::FailurePredicted
        } else {
            PredictionStatus::Nominal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionStatus::FailurePredicted => "Failure Predicted",
            PredictionStatus::Nominal => "Nominal",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, PredictionStatus::FailurePredicted)
    }
}

impl std::fmt::Display for PredictionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload returned to the caller for a successful prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub status: PredictionStatus,
    pub is_failure: bool,
    /// Probability of the predicted class as a percentage, two decimals
    pub confidence: f64,
    pub inputs: InputRecord,
}

/// Error body returned by the HTTP endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
