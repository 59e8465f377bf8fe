//! Error types for artifact loading and prediction

use std::path::PathBuf;
use thiserror::Error;

/// Fixed message returned to callers when the server started without a model
pub const MODEL_NOT_LOADED_MESSAGE: &str = "Model is not loaded, check server logs.";

/// Errors raised while loading the pipeline artifact at startup
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("model artifact not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read model artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load ONNX model: {0}")]
    Model(String),

    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

/// Errors raised while turning one input record into a prediction
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("{}", MODEL_NOT_LOADED_MESSAGE)]
    ModelNotLoaded,

    #[error("invalid input record: {0}")]
    InvalidRecord(String),

    #[error("columns are missing: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("{message} in column '{column}'")]
    InvalidValue { column: String, message: String },

    #[error("inference failed: {0}")]
    Inference(String),
}

impl PredictError {
    /// Whether the error is the startup misconfiguration rather than a per-record failure
    pub fn is_model_unavailable(&self) -> bool {
        matches!(self, PredictError::ModelNotLoaded)
    }
}
