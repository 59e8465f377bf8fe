//! Observability infrastructure for the failure predictor
//!
//! Provides:
//! - Prometheus metrics (request outcomes, inference latency, failures predicted, model info)
//! - Structured JSON logging with tracing

use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, register_int_counter_vec,
    GaugeVec, Histogram, IntCounter, IntCounterVec,
};
use std::sync::OnceLock;
use tracing::{error, info, warn};

/// Histogram buckets for inference latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1,
];

/// Outcome labels for the request counter
pub mod outcomes {
    pub const SUCCESS: &str = "success";
    pub const BAD_REQUEST: &str = "bad_request";
    pub const MODEL_UNAVAILABLE: &str = "model_unavailable";
}

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<PredictorMetricsInner> = OnceLock::new();

struct PredictorMetricsInner {
    requests_total: IntCounterVec,
    inference_latency_seconds: Histogram,
    failures_predicted: IntCounter,
    model_info: GaugeVec,
}

impl PredictorMetricsInner {
    fn new() -> Self {
        Self {
            requests_total: register_int_counter_vec!(
                "failure_predictor_requests_total",
                "Prediction requests by outcome",
                &["outcome"]
            )
            .expect("Failed to register requests_total"),

            inference_latency_seconds: register_histogram!(
                "failure_predictor_inference_latency_seconds",
                "Time spent adapting, classifying and formatting one record",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register inference_latency_seconds"),

            failures_predicted: register_int_counter!(
                "failure_predictor_failures_predicted_total",
                "Predictions whose outcome was a machine failure"
            )
            .expect("Failed to register failures_predicted"),

            model_info: register_gauge_vec!(
                "failure_predictor_model_info",
                "Information about the loaded pipeline artifact",
                &["version", "checksum"]
            )
            .expect("Failed to register model_info"),
        }
    }
}

/// Lightweight handle to the global metrics; clones share the same metrics
#[derive(Clone)]
pub struct PredictorMetrics {
    _private: (),
}

impl Default for PredictorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictorMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(PredictorMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &PredictorMetricsInner {
        GLOBAL_METRICS.get_or_init(PredictorMetricsInner::new)
    }

    pub fn inc_request(&self, outcome: &str) {
        self.inner()
            .requests_total
            .with_label_values(&[outcome])
            .inc();
    }

    pub fn observe_inference_latency(&self, duration_secs: f64) {
        self.inner().inference_latency_seconds.observe(duration_secs);
    }

    pub fn inc_failures_predicted(&self) {
        self.inner().failures_predicted.inc();
    }

    pub fn set_model_info(&self, version: &str, checksum: &str) {
        self.inner().model_info.reset();
        self.inner()
            .model_info
            .with_label_values(&[version, checksum])
            .set(1.0);
    }

    pub fn request_count(&self, outcome: &str) -> u64 {
        self.inner()
            .requests_total
            .with_label_values(&[outcome])
            .get()
    }
}

/// Structured logger for service events
#[derive(Clone)]
pub struct StructuredLogger {
    service: String,
}

impl StructuredLogger {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn log_startup(&self, version: &str, addr: &str) {
        info!(
            event = "server_started",
            service = %self.service,
            server_version = %version,
            addr = %addr,
            "AI Model Server starting on http://{}",
            addr
        );
    }

    pub fn log_model_loaded(&self, path: &str, model_version: &str, checksum: &str, size_bytes: usize) {
        info!(
            event = "model_loaded",
            service = %self.service,
            path = %path,
            model_version = %model_version,
            checksum = %checksum,
            size_bytes = size_bytes,
            "Model loaded successfully"
        );
    }

    pub fn log_model_unavailable(&self, path: &str, reason: &str) {
        error!(
            event = "model_unavailable",
            service = %self.service,
            path = %path,
            reason = %reason,
            "FATAL ERROR: {} could not be loaded, every prediction will fail",
            path
        );
    }

    pub fn log_prediction(&self, status: &str, confidence: f64, elapsed_us: u64) {
        info!(
            event = "prediction_served",
            service = %self.service,
            status = %status,
            confidence = confidence,
            elapsed_us = elapsed_us,
            "Prediction served"
        );
    }

    pub fn log_prediction_error(&self, error: &str, model_unavailable: bool) {
        if model_unavailable {
            error!(
                event = "prediction_failed",
                service = %self.service,
                error = %error,
                "Prediction rejected, model not loaded"
            );
        } else {
            warn!(
                event = "prediction_failed",
                service = %self.service,
                error = %error,
                "Prediction failed"
            );
        }
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "server_shutdown",
            service = %self.service,
            reason = %reason,
            "Prediction server shutting down"
        );
    }
}
