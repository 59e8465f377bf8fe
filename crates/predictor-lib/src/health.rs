//! Health check infrastructure for the prediction server
//!
//! The model component is decided once at startup, so health and readiness
//! are a fixed snapshot built alongside the model state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Health status of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    /// Component is functioning normally
    Healthy,
    /// Component has failed
    Unhealthy,
}

/// Information about a component's health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: ComponentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub last_check_timestamp: i64,
}

impl ComponentHealth {
    pub fn healthy() -> Self {
        Self {
            status: ComponentStatus::Healthy,
            message: None,
            last_check_timestamp: chrono::Utc::now().timestamp(),
        }
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: ComponentStatus::Unhealthy,
            message: Some(message.into()),
            last_check_timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// Identity of the loaded model, reported alongside health
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub version: String,
    pub checksum: String,
}

/// Overall health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ComponentStatus,
    pub components: HashMap<String, ComponentHealth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelInfo>,
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Component names for health tracking
pub mod components {
    pub const MODEL: &str = "model";
}

/// Health of the service as decided by the startup model load
#[derive(Debug, Clone)]
pub struct HealthSnapshot {
    model: ComponentHealth,
    info: Option<ModelInfo>,
}

impl HealthSnapshot {
    pub fn model_loaded(info: ModelInfo) -> Self {
        Self {
            model: ComponentHealth::healthy(),
            info: Some(info),
        }
    }

    pub fn model_unavailable(reason: impl Into<String>) -> Self {
        Self {
            model: ComponentHealth::unhealthy(reason),
            info: None,
        }
    }

    pub fn status(&self) -> ComponentStatus {
        self.model.status
    }

    pub fn health(&self) -> HealthResponse {
        let mut components = HashMap::new();
        components.insert(components::MODEL.to_string(), self.model.clone());
        HealthResponse {
            status: self.model.status,
            components,
            model: self.info.clone(),
        }
    }

    pub fn readiness(&self) -> ReadinessResponse {
        match self.model.status {
            ComponentStatus::Healthy => ReadinessResponse {
                ready: true,
                reason: None,
            },
            ComponentStatus::Unhealthy => ReadinessResponse {
                ready: false,
                reason: Some(
                    self.model
                        .message
                        .clone()
                        .unwrap_or_else(|| "Model is not loaded".to_string()),
                ),
            },
        }
    }
}
