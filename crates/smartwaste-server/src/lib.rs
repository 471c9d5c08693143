//! smartwaste server
//!
//! JSON-over-HTTP transport for the smartwaste core: sensors post readings,
//! operators manage containers and request collection routes. Built with
//! Axum; an OpenAPI document is generated with utoipa when the `utoipa`
//! feature is enabled.

pub mod api;
pub mod error;
pub mod state;

pub mod server;

pub use error::{ApiError, ApiResult};
pub use server::{build_router, run_server};
pub use state::AppState;

pub use smartwaste_core::StoreOptions;

use std::time::Duration;

/// Configuration for the API server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub store: StoreOptions,
    /// Requests running longer than this are answered with 408
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database: "smartwaste.db".to_string(),
            store: StoreOptions::default(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Start the API server and block until shutdown
pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error + Send>> {
    server::run_server(config).await
}
