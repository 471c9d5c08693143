//! Liveness endpoints

use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

#[cfg_attr(feature = "utoipa", utoipa::path(
    get,
    path = "/ping",
    responses((status = 200, description = "Server is up"))
))]
pub async fn ping() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "pong" }))
}

/// Service identity and version
#[cfg_attr(feature = "utoipa", utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service health", body = HealthResponse))
))]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "smartwaste".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
