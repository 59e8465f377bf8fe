//! Prediction server library
//!
//! Exposes the router and startup state so the binary and the
//! integration tests build the server the same way.

pub mod api;
pub mod config;
pub mod state;

pub use api::{create_router, serve};
pub use config::ServerConfig;
pub use state::{AppState, SERVICE_NAME};
