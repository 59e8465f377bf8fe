//! Predictor Server - predictive-maintenance failure prediction over HTTP
//!
//! Loads the pipeline artifact once and serves `POST /predict` for the
//! automation tool, plus health and metrics endpoints.

use anyhow::{Context, Result};
use predictor_server::{serve, AppState, ServerConfig};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    let config = ServerConfig::load().context("Failed to load server configuration")?;
    info!(model_path = %config.model_path, "Server configured");

    let state = Arc::new(AppState::initialize(&config.model_path));
    let logger = state.logger.clone();

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    logger.log_startup(SERVER_VERSION, &addr);

    serve(listener, state, shutdown_signal()).await?;

    logger.log_shutdown("SIGINT received");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
