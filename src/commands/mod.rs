/*!
 * Subcommand handlers
 *
 * Each handler opens the store named by the resolved configuration, runs one
 * core operation, prints the result and returns it.
 */

pub mod containers;

pub use containers::{ContainerCommand, ContainerOutput};

use chrono::{DateTime, Utc};
use smartwaste_core::{
    ContainerStore, Ingestor, Point, Reading, Route, RoutePlanner, SqliteStore, Status,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

use crate::cli_style::{
    format_distance, print_info, print_success, route_table, section_header, Icons, Theme,
};
use crate::config::AppConfig;
use crate::error::{CliError, Result};
use crate::simulator::Simulator;

pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn ContainerStore>> {
    let store = SqliteStore::open_with(&config.database.path, config.store_options()).await?;
    Ok(Arc::new(store))
}

/// Record one reading through the ingestion transaction
pub async fn ingest(
    config: &AppConfig,
    container: String,
    fill_level: i32,
    at: Option<DateTime<Utc>>,
) -> Result<Status> {
    let ingestor = Ingestor::new(open_store(config).await?);
    let reading = Reading::new(container, fill_level, at.unwrap_or_else(Utc::now));

    let status = ingestor.ingest(reading.clone()).await?;
    print_success(&format!(
        "Reading {}% accepted for {} {} status {}",
        reading.fill_level,
        reading.container_id,
        Icons::ARROW_RIGHT,
        Theme::header(status)
    ));
    Ok(status)
}

/// Plan and print a collection route. No statuses means `high` only.
pub async fn route(config: &AppConfig, start: Point, statuses: Vec<Status>) -> Result<Route> {
    start.validate()?;
    let statuses = if statuses.is_empty() {
        vec![Status::High]
    } else {
        statuses
    };

    let planner = RoutePlanner::new(open_store(config).await?);
    let route = planner.plan_route(start, &statuses).await?;

    let wanted: Vec<String> = statuses.iter().map(|s| s.to_string()).collect();
    section_header(&format!("{} Route from {}", Icons::TRUCK, start));
    if route.is_empty() {
        print_info(&format!("No containers with status {}", wanted.join(", ")));
    } else {
        println!("{}", route_table(&route));
        print_info(&format!(
            "{} stops, {} total",
            route.len(),
            format_distance(route.total_distance_km)
        ));
    }
    Ok(route)
}

/// Run the HTTP API until Ctrl-C or SIGTERM
pub async fn serve(config: &AppConfig) -> Result<()> {
    let server_config = config.server_config();
    print_info(&format!(
        "Starting smartwaste API at http://{} (database: {})",
        server_config.addr(),
        server_config.database
    ));

    smartwaste_server::start_server(server_config)
        .await
        .map_err(|e| CliError::Server(e.to_string()))
}

/// Post simulated readings until Ctrl-C
pub async fn simulate(config: &AppConfig) -> Result<()> {
    let settings = &config.simulator;
    if settings.interval_secs == 0 {
        return Err(CliError::Usage("--interval must be at least 1 second".to_string()));
    }

    let mut simulator = Simulator::new(
        &settings.api_url,
        Duration::from_secs(settings.interval_secs),
        settings.containers.clone(),
    )?;

    print_info(&format!(
        "Simulating sensors against {} every {}s (Ctrl-C to stop)",
        settings.api_url, settings.interval_secs
    ));

    simulator
        .run(async {
            if let Err(err) = signal::ctrl_c().await {
                tracing::error!("Failed to install Ctrl+C handler: {}", err);
                std::future::pending::<()>().await;
            }
        })
        .await
}
