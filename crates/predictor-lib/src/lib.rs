//! Library for predictive-maintenance failure prediction
//!
//! This crate provides the core functionality for:
//! - Loading the ONNX pipeline artifact
//! - Adapting caller records into pipeline rows
//! - Running inference and formatting the response payload
//! - Health checks and observability

pub mod error;
pub mod health;
pub mod model;
pub mod models;
pub mod observability;
pub mod predictor;

pub use error::{LoadError, PredictError, MODEL_NOT_LOADED_MESSAGE};
pub use health::{
    ComponentHealth, ComponentStatus, HealthResponse, HealthSnapshot, ModelInfo, ReadinessResponse,
};
pub use model::{load_artifact, ModelArtifact, OnnxPipeline, DEFAULT_MODEL_PATH};
pub use models::*;
pub use observability::{PredictorMetrics, StructuredLogger};
pub use predictor::{ModelState, Pipeline, Predictor};
