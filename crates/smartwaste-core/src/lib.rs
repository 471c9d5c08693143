//! smartwaste-core: container status tracking and collection routing
//!
//! # Overview
//!
//! Sensors report how full each waste container is. Every accepted reading
//! is appended to an event log and, in the same transaction, mirrored onto
//! the container as a coarse [`Status`] (`low`, `medium`, `high`). Collection
//! rounds are then planned by visiting every container in a requested set of
//! statuses with a greedy nearest-neighbor heuristic.
//!
//! # Components
//!
//! - [`classify`] and [`validate_reading`]: pure domain rules
//! - [`Ingestor`]: validate + atomic "append reading, update snapshot"
//! - [`RoutePlanner`]: candidate fetch + nearest-neighbor ordering
//! - [`ContainerService`]: registration, edits, deletion and history
//! - [`ContainerStore`]: the storage seam, with a SQLite backend
//!
//! # Example
//!
//! ```no_run
//! use smartwaste_core::{ContainerDetails, Ingestor, Point, Reading, RoutePlanner, Status};
//!
//! #[tokio::main]
//! async fn main() -> smartwaste_core::Result<()> {
//!     let store = smartwaste_core::open("waste.db").await?;
//!
//!     let container = store
//!         .create_container(&ContainerDetails::new(Point::new(40.41, -3.70), 1100))
//!         .await?;
//!
//!     let ingestor = Ingestor::new(store.clone());
//!     ingestor
//!         .ingest(Reading::new(&container.id, 92, chrono::Utc::now()))
//!         .await?;
//!
//!     let planner = RoutePlanner::new(store);
//!     let route = planner.plan_route(Point::new(40.40, -3.71), &[Status::High]).await?;
//!     println!("{} stops, {:.1} km", route.len(), route.total_distance_km);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use std::sync::Arc;

pub mod backends;
pub mod error;
pub mod geo;
pub mod ingest;
pub mod model;
pub mod planner;
pub mod service;

pub use error::{Error, Result};
pub use ingest::Ingestor;
pub use model::{
    classify, validate_reading, Container, ContainerDetails, ContainerLocation, Point, Reading,
    Status,
};
pub use planner::{Route, RoutePlanner, RouteStop};
pub use service::ContainerService;

#[cfg(feature = "sqlite")]
pub use backends::sqlite::{SqliteStore, StoreOptions};

/// Persistent storage for containers and their readings
///
/// Implementations must apply [`save_reading_and_update_container`] as a
/// single atomic unit and must return candidates from
/// [`find_containers_by_status`] in ascending id order, since the route
/// planner's tie-break depends on that order.
///
/// [`save_reading_and_update_container`]: ContainerStore::save_reading_and_update_container
/// [`find_containers_by_status`]: ContainerStore::find_containers_by_status
#[async_trait]
pub trait ContainerStore: Send + Sync {
    /// Append a reading and update its container's status snapshot atomically.
    ///
    /// Fails with `NotFound` (and persists nothing) when the container does
    /// not exist.
    async fn save_reading_and_update_container(
        &self,
        reading: &Reading,
        status: Status,
    ) -> Result<()>;

    /// Identity and location of every container whose status is in `statuses`
    async fn find_containers_by_status(&self, statuses: &[Status])
        -> Result<Vec<ContainerLocation>>;

    /// All containers, most recently registered first
    async fn find_all_containers(&self) -> Result<Vec<Container>>;

    /// A single container, or `NotFound`
    async fn find_container_by_id(&self, id: &str) -> Result<Container>;

    /// Register a new container; status fields start unset
    async fn create_container(&self, details: &ContainerDetails) -> Result<Container>;

    /// Replace location and capacity; `NotFound` when absent
    async fn update_container(&self, id: &str, details: &ContainerDetails) -> Result<()>;

    /// Remove a container and its readings; `NotFound` when absent
    async fn delete_container(&self, id: &str) -> Result<()>;

    /// Up to `limit` readings for a container, newest first
    async fn find_readings_by_container_id(&self, id: &str, limit: u32) -> Result<Vec<Reading>>;
}

/// Open the default store at the specified path
///
/// Accepts a plain file path or a `sqlite://` URL. The schema is migrated
/// on open.
#[cfg(feature = "sqlite")]
pub async fn open(path: &str) -> Result<Arc<dyn ContainerStore>> {
    let store = SqliteStore::open(path).await?;
    Ok(Arc::new(store))
}
