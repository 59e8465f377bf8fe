//! Prediction flow: record adaptation, inference and output formatting

mod inference;
mod output;
mod record;

pub use inference::{run_inference, Prediction};
pub use output::{confidence_percent, format_response, CONFIDENCE_DECIMALS};
pub use record::{
    augment, parse_record, record_from_value, FAILURE_TYPE_COLUMN, FAILURE_TYPE_PLACEHOLDER,
    PLACEHOLDER_COLUMNS, PRODUCT_ID_COLUMN, PRODUCT_ID_PLACEHOLDER,
};

use crate::error::PredictError;
use crate::model::ModelArtifact;
use crate::models::{FeatureRow, InputRecord, PredictionResponse};
use std::sync::Arc;

/// Trait for loaded classification pipelines
pub trait Pipeline: Send + Sync {
    /// Predicted class label and per-class probabilities for a single row
    fn classify(&self, row: &FeatureRow) -> Result<(i64, Vec<f64>), PredictError>;

    /// Predicted class label for a single row
    fn predict(&self, row: &FeatureRow) -> Result<i64, PredictError> {
        self.classify(row).map(|(label, _)| label)
    }

    /// Per-class probabilities for a single row
    fn predict_proba(&self, row: &FeatureRow) -> Result<Vec<f64>, PredictError> {
        self.classify(row).map(|(_, probabilities)| probabilities)
    }

    fn version(&self) -> &str;
}

/// Runs the full record -> response flow against one pipeline
#[derive(Clone)]
pub struct Predictor {
    pipeline: Arc<dyn Pipeline>,
}

impl Predictor {
    pub fn new(pipeline: Arc<dyn Pipeline>) -> Self {
        Self { pipeline }
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Self {
        Self::new(Arc::new(artifact.pipeline))
    }

    pub fn model_version(&self) -> &str {
        self.pipeline.version()
    }

    /// Augment, classify and format one record
    pub fn predict(&self, record: InputRecord) -> Result<PredictionResponse, PredictError> {
        let row = augment(&record);
        let prediction = run_inference(self.pipeline.as_ref(), &row)?;
        Ok(format_response(&prediction, record))
    }

    /// Parse raw JSON bytes as a record and predict
    pub fn predict_json(&self, bytes: &[u8]) -> Result<PredictionResponse, PredictError> {
        let record = parse_record(bytes)?;
        self.predict(record)
    }
}

/// Model availability, decided once at startup and fixed for the process lifetime
#[derive(Clone)]
pub enum ModelState {
    Loaded(Predictor),
    Unavailable { reason: String },
}

impl ModelState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ModelState::Loaded(_))
    }

    pub fn predictor(&self) -> Result<&Predictor, PredictError> {
        match self {
            ModelState::Loaded(predictor) => Ok(predictor),
            ModelState::Unavailable { .. } => Err(PredictError::ModelNotLoaded),
        }
    }

    /// Predict from raw bytes; an unavailable model wins over any body problem
    pub fn predict_json(&self, bytes: &[u8]) -> Result<PredictionResponse, PredictError> {
        self.predictor()?.predict_json(bytes)
    }
}
