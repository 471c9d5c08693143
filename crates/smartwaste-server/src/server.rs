//! Axum server setup

use crate::{api, state::AppState, ServerConfig};
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Build the API router over `state`
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    let v1 = Router::new()
        .route("/readings", post(api::ingest_reading))
        .route(
            "/containers",
            get(api::list_containers).post(api::create_container),
        )
        .route(
            "/containers/:id",
            get(api::get_container)
                .put(api::update_container)
                .delete(api::delete_container),
        )
        .route("/containers/:id/readings", get(api::list_readings))
        .route("/routes", post(api::plan_route));

    let app = Router::new()
        .route("/ping", get(api::ping))
        .route("/api/health", get(api::health))
        .nest("/api/v1", v1);

    #[cfg(feature = "utoipa")]
    let app = {
        use utoipa::OpenApi;
        app.route(
            "/api-docs/openapi.json",
            get(|| async { axum::Json(api::ApiDoc::openapi()) }),
        )
    };

    app.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE]),
    )
    .layer(TimeoutLayer::new(request_timeout))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// Open the store, bind, and serve until Ctrl-C or SIGTERM
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error + Send>> {
    tracing::info!(database = %config.database, "Starting smartwaste API");

    let state = AppState::open_with(&config.database, config.store.clone())
        .await
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;

    let app = build_router(state, config.request_timeout);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;

    tracing::info!("Listening on http://{}", addr);
    tracing::info!("   Health: http://{}/api/health", addr);
    #[cfg(feature = "utoipa")]
    tracing::info!("   OpenAPI: http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
