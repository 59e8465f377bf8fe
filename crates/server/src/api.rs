//! HTTP API: prediction, health checks and Prometheus metrics

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use predictor_lib::{observability::outcomes, ComponentStatus, ErrorResponse, PredictionResponse};
use prometheus::{Encoder, TextEncoder};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Run one record through the model
///
/// The body is read raw so that an unloaded model is reported before any
/// attempt to parse it.
async fn predict(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let start = Instant::now();

    match state.model.predict_json(&body) {
        Ok(response) => {
            let elapsed = start.elapsed();
            record_success(&state, &response, elapsed.as_secs_f64());
            state.logger.log_prediction(
                response.status.as_str(),
                response.confidence,
                elapsed.as_micros() as u64,
            );
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            let unavailable = e.is_model_unavailable();
            let (status, outcome) = if unavailable {
                (StatusCode::INTERNAL_SERVER_ERROR, outcomes::MODEL_UNAVAILABLE)
            } else {
                (StatusCode::BAD_REQUEST, outcomes::BAD_REQUEST)
            };
            state.metrics.inc_request(outcome);
            state.logger.log_prediction_error(&e.to_string(), unavailable);
            (status, Json(ErrorResponse::new(e.to_string()))).into_response()
        }
    }
}

fn record_success(state: &AppState, response: &PredictionResponse, elapsed_secs: f64) {
    state.metrics.inc_request(outcomes::SUCCESS);
    state.metrics.observe_inference_latency(elapsed_secs);
    if response.is_failure {
        state.metrics.inc_failures_predicted();
    }
}

/// Health check response - returns 200 if healthy, 503 if the model failed to load
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health.health();

    let status_code = match health.status {
        ComponentStatus::Healthy => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 only when a model is serving
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health.readiness();

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

/// Serve the API on an already bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);

    info!(addr = %listener.local_addr()?, "Starting API server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
