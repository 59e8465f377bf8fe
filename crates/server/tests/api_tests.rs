//! Integration tests for the prediction server endpoints

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use predictor_server::{create_router, serve, AppState};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

const MODEL_NOT_LOADED: &str = "Model is not loaded, check server logs.";

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../predictor-lib/tests/fixtures")
        .join(name)
}

fn setup_loaded_app() -> Router {
    let state = AppState::initialize(fixture("predictive_maintenance_pipeline.onnx"));
    assert!(state.model.is_loaded());
    create_router(Arc::new(state))
}

fn setup_unavailable_app() -> Router {
    let state = AppState::initialize(fixture("no_such_pipeline.onnx"));
    assert!(!state.model.is_loaded());
    create_router(Arc::new(state))
}

fn sample_record() -> Value {
    json!({
        "Air temperature [K]": 298.1,
        "Process temperature [K]": 308.6,
        "Rotational speed [rpm]": 1551,
        "Torque [Nm]": 42.8,
        "Tool wear [min]": 0,
        "Type": "L"
    })
}

fn post_predict(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_predict_returns_payload() {
    let app = setup_loaded_app();

    let response = app
        .oneshot(post_predict(sample_record().to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let payload = json_body(response).await;
    assert_eq!(payload["status"], "Nominal");
    assert_eq!(payload["is_failure"], false);
    assert_eq!(payload["confidence"], 99.27);
    assert_eq!(payload["inputs"], sample_record());
}

#[tokio::test]
async fn test_predict_failure_outcome() {
    let app = setup_loaded_app();
    let mut record = sample_record();
    record["Torque [Nm]"] = json!(70.0);
    record["Tool wear [min]"] = json!(240);
    record["Rotational speed [rpm]"] = json!(1300);
    record["Air temperature [K]"] = json!(302.5);
    record["Process temperature [K]"] = json!(311.2);

    let response = app.oneshot(post_predict(record.to_string())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let payload = json_body(response).await;
    assert_eq!(payload["status"], "Failure Predicted");
    assert_eq!(payload["is_failure"], true);
    assert_eq!(payload["confidence"], 94.12);
}

#[tokio::test]
async fn test_caller_failure_type_is_replaced_by_placeholder() {
    let state = AppState::initialize(fixture("failure_type_pipeline.onnx"));
    let app = create_router(Arc::new(state));
    let mut record = sample_record();
    record["Failure Type"] = json!("Power Failure");

    let omitted = app
        .clone()
        .oneshot(post_predict(sample_record().to_string()))
        .await
        .unwrap();
    let supplied = app.oneshot(post_predict(record.to_string())).await.unwrap();

    assert_eq!(supplied.status(), StatusCode::OK);
    let omitted = json_body(omitted).await;
    let supplied = json_body(supplied).await;
    assert_eq!(supplied["status"], "Nominal");
    assert_eq!(supplied["confidence"], omitted["confidence"]);
    assert_eq!(supplied["is_failure"], omitted["is_failure"]);
    assert_eq!(supplied["inputs"], record);
}

#[tokio::test]
async fn test_predict_missing_field_returns_400() {
    let app = setup_loaded_app();
    let mut record = sample_record();
    record.as_object_mut().unwrap().remove("Tool wear [min]");

    let response = app.oneshot(post_predict(record.to_string())).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = json_body(response).await;
    assert_eq!(payload["error"], "columns are missing: Tool wear [min]");
}

#[tokio::test]
async fn test_predict_malformed_body_returns_400() {
    let app = setup_loaded_app();

    let response = app.oneshot(post_predict("{\"Type\": ")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = json_body(response).await;
    assert!(!payload["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_predict_array_body_returns_400() {
    let app = setup_loaded_app();
    let body = json!([sample_record()]).to_string();

    let response = app.oneshot(post_predict(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = json_body(response).await;
    assert!(payload["error"].as_str().unwrap().contains("single JSON object"));
}

#[tokio::test]
async fn test_predict_without_model_always_500() {
    let bodies = vec![
        sample_record().to_string(),
        String::new(),
        "not json".to_string(),
        "[]".to_string(),
        "{}".to_string(),
    ];

    for body in bodies {
        let app = setup_unavailable_app();
        let response = app.oneshot(post_predict(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let payload = json_body(response).await;
        assert_eq!(payload, json!({"error": MODEL_NOT_LOADED}));
    }
}

#[tokio::test]
async fn test_predict_rejects_get() {
    let app = setup_loaded_app();

    let response = app.oneshot(get("/predict")).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_healthz_reports_model() {
    let app = setup_loaded_app();

    let response = app.oneshot(get("/healthz")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let health = json_body(response).await;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["components"]["model"]["status"], "healthy");
    assert_eq!(health["model"]["version"], "1.0.0");
    assert_eq!(health["model"]["checksum"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn test_healthz_returns_503_without_model() {
    let app = setup_unavailable_app();

    let response = app.oneshot(get("/healthz")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let health = json_body(response).await;
    assert_eq!(health["status"], "unhealthy");
    assert!(health["components"]["model"]["message"]
        .as_str()
        .unwrap()
        .contains("not found"));
}

#[tokio::test]
async fn test_readyz_tracks_model_state() {
    let loaded = setup_loaded_app();
    let response = loaded.oneshot(get("/readyz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["ready"], true);

    let unavailable = setup_unavailable_app();
    let response = unavailable.oneshot(get("/readyz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json_body(response).await["ready"], false);
}

#[tokio::test]
async fn test_metrics_endpoint_returns_prometheus_format() {
    let app = setup_loaded_app();

    let response = app
        .clone()
        .oneshot(post_predict(sample_record().to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/metrics")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("text/plain"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let metrics_text = String::from_utf8(body.to_vec()).unwrap();

    assert!(metrics_text.contains("failure_predictor_requests_total"));
    assert!(metrics_text.contains("failure_predictor_inference_latency_seconds_bucket"));
    assert!(metrics_text.contains("failure_predictor_model_info"));
}

#[tokio::test]
async fn test_serve_over_tcp() {
    let state = Arc::new(AppState::initialize(fixture("predictive_maintenance_pipeline.onnx")));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(serve(listener, state, async {
        let _ = shutdown_rx.await;
    }));

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/predict", addr))
        .json(&sample_record())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let payload: Value = response.json().await.unwrap();
    assert_eq!(payload["inputs"], sample_record());

    shutdown_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}
