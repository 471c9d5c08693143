//! Collection route planning endpoint

use crate::error::ApiResult;
use crate::state::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use smartwaste_core::{Point, Route, Status};

/// Route planning request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct RouteRequest {
    /// Where the truck starts
    pub start: Point,
    /// Statuses to collect; defaults to `["high"]`
    #[serde(default = "default_statuses")]
    pub statuses: Vec<Status>,
}

fn default_statuses() -> Vec<Status> {
    vec![Status::High]
}

/// Plan a nearest-neighbor collection route
#[cfg_attr(feature = "utoipa", utoipa::path(
    post,
    path = "/api/v1/routes",
    request_body = RouteRequest,
    responses(
        (status = 200, description = "Planned route (possibly empty)", body = Route),
        (status = 400, description = "Malformed request or start point"),
        (status = 500, description = "Storage failure")
    )
))]
pub async fn plan_route(
    State(state): State<AppState>,
    payload: Result<Json<RouteRequest>, JsonRejection>,
) -> ApiResult<Json<Route>> {
    let Json(request) = payload?;
    request.start.validate()?;

    let route = state
        .planner
        .plan_route(request.start, &request.statuses)
        .await?;
    Ok(Json(route))
}
