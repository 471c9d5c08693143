//! Container management API endpoints

use crate::error::ApiResult;
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use smartwaste_core::{Container, ContainerDetails, Reading};

/// Query string for the readings history endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "utoipa", into_params(parameter_in = Query))]
pub struct ReadingsQuery {
    /// Page size, 1 to 100 (anything else means 50)
    pub limit: Option<i64>,
}

/// List all containers
#[cfg_attr(feature = "utoipa", utoipa::path(
    get,
    path = "/api/v1/containers",
    responses(
        (status = 200, description = "All containers, newest first", body = Vec<Container>),
        (status = 500, description = "Storage failure")
    )
))]
pub async fn list_containers(State(state): State<AppState>) -> ApiResult<Json<Vec<Container>>> {
    let containers = state.containers.list().await?;
    Ok(Json(containers))
}

/// Register a new container
#[cfg_attr(feature = "utoipa", utoipa::path(
    post,
    path = "/api/v1/containers",
    request_body = ContainerDetails,
    responses(
        (status = 201, description = "Container registered", body = Container),
        (status = 400, description = "Invalid location or capacity"),
        (status = 500, description = "Storage failure")
    )
))]
pub async fn create_container(
    State(state): State<AppState>,
    payload: Result<Json<ContainerDetails>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Container>)> {
    let Json(details) = payload?;
    let container = state.containers.register(details).await?;
    Ok((StatusCode::CREATED, Json(container)))
}

/// Get a single container
#[cfg_attr(feature = "utoipa", utoipa::path(
    get,
    path = "/api/v1/containers/{id}",
    params(("id" = String, Path, description = "Container id")),
    responses(
        (status = 200, description = "Container details", body = Container),
        (status = 404, description = "Container not found")
    )
))]
pub async fn get_container(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Container>> {
    Ok(Json(state.containers.get(&id).await?))
}

/// Replace a container's location and capacity
#[cfg_attr(feature = "utoipa", utoipa::path(
    put,
    path = "/api/v1/containers/{id}",
    params(("id" = String, Path, description = "Container id")),
    request_body = ContainerDetails,
    responses(
        (status = 204, description = "Container updated"),
        (status = 400, description = "Invalid location or capacity"),
        (status = 404, description = "Container not found")
    )
))]
pub async fn update_container(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ContainerDetails>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(details) = payload?;
    state.containers.update(&id, details).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a container and its readings
#[cfg_attr(feature = "utoipa", utoipa::path(
    delete,
    path = "/api/v1/containers/{id}",
    params(("id" = String, Path, description = "Container id")),
    responses(
        (status = 204, description = "Container deleted"),
        (status = 404, description = "Container not found")
    )
))]
pub async fn delete_container(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.containers.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Reading history for a container, newest first
#[cfg_attr(feature = "utoipa", utoipa::path(
    get,
    path = "/api/v1/containers/{id}/readings",
    params(("id" = String, Path, description = "Container id"), ReadingsQuery),
    responses(
        (status = 200, description = "Readings, newest first", body = Vec<Reading>),
        (status = 404, description = "Container not found")
    )
))]
pub async fn list_readings(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<ReadingsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Reading>>> {
    let Query(query) = query?;
    let readings = state.containers.readings(&id, query.limit).await?;
    Ok(Json(readings))
}
