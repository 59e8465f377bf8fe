//! Shared application state, built once at startup

use predictor_lib::{
    load_artifact, HealthSnapshot, ModelInfo, ModelState, Predictor, PredictorMetrics,
    StructuredLogger,
};
use std::path::Path;

/// Service name used in structured log events
pub const SERVICE_NAME: &str = "predictor-server";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub model: ModelState,
    pub health: HealthSnapshot,
    pub metrics: PredictorMetrics,
    pub logger: StructuredLogger,
}

impl AppState {
    pub fn new(
        model: ModelState,
        health: HealthSnapshot,
        metrics: PredictorMetrics,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            model,
            health,
            metrics,
            logger,
        }
    }

    /// Load the artifact and record the outcome in health and metrics
    ///
    /// A load failure does not abort startup: the server keeps serving and
    /// every prediction request reports the model as not loaded.
    pub fn initialize(model_path: impl AsRef<Path>) -> Self {
        let model_path = model_path.as_ref();
        let logger = StructuredLogger::new(SERVICE_NAME);
        let metrics = PredictorMetrics::new();

        let (model, health) = match load_artifact(model_path) {
            Ok(artifact) => {
                logger.log_model_loaded(
                    &artifact.path.display().to_string(),
                    artifact.version(),
                    &artifact.checksum,
                    artifact.size_bytes,
                );
                metrics.set_model_info(artifact.version(), artifact.short_checksum());
                let health = HealthSnapshot::model_loaded(ModelInfo {
                    version: artifact.version().to_string(),
                    checksum: artifact.checksum.clone(),
                });
                (ModelState::Loaded(Predictor::from_artifact(artifact)), health)
            }
            Err(e) => {
                let reason = e.to_string();
                logger.log_model_unavailable(&model_path.display().to_string(), &reason);
                let health = HealthSnapshot::model_unavailable(reason.clone());
                (ModelState::Unavailable { reason }, health)
            }
        };

        Self::new(model, health, metrics, logger)
    }
}
