//! Sensor reading ingestion endpoint

use crate::error::ApiResult;
use crate::state::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use smartwaste_core::{Reading, Status};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct IngestResponse {
    pub message: String,
    /// Status the container moved to
    pub status: Status,
}

/// Submit a fill-level reading
#[cfg_attr(feature = "utoipa", utoipa::path(
    post,
    path = "/api/v1/readings",
    request_body = Reading,
    responses(
        (status = 202, description = "Reading accepted", body = IngestResponse),
        (status = 400, description = "Malformed or out-of-range reading"),
        (status = 404, description = "Unknown container"),
        (status = 500, description = "Storage failure, safe to retry")
    )
))]
pub async fn ingest_reading(
    State(state): State<AppState>,
    payload: Result<Json<Reading>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<IngestResponse>)> {
    let Json(reading) = payload?;
    let status = state.ingestor.ingest(reading).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(IngestResponse {
            message: "reading accepted".to_string(),
            status,
        }),
    ))
}
