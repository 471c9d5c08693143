//! API endpoints

pub mod containers;
pub mod health;
pub mod readings;
pub mod routes;

pub use containers::{
    create_container, delete_container, get_container, list_containers, list_readings,
    update_container, ReadingsQuery,
};
pub use health::{health, ping, HealthResponse};
pub use readings::{ingest_reading, IngestResponse};
pub use routes::{plan_route, RouteRequest};

/// OpenAPI document for the public API
#[cfg(feature = "utoipa")]
#[derive(utoipa::OpenApi)]
#[openapi(
    info(
        title = "smartwaste API",
        description = "Waste container monitoring and collection routing"
    ),
    paths(
        health::ping,
        health::health,
        readings::ingest_reading,
        containers::list_containers,
        containers::create_container,
        containers::get_container,
        containers::update_container,
        containers::delete_container,
        containers::list_readings,
        routes::plan_route,
    ),
    components(schemas(
        smartwaste_core::Point,
        smartwaste_core::Status,
        smartwaste_core::Container,
        smartwaste_core::ContainerDetails,
        smartwaste_core::ContainerLocation,
        smartwaste_core::Reading,
        smartwaste_core::Route,
        smartwaste_core::RouteStop,
        HealthResponse,
        IngestResponse,
        RouteRequest,
    ))
)]
pub struct ApiDoc;
