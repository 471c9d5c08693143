//! Shared application state

use smartwaste_core::{
    ContainerService, ContainerStore, Ingestor, RoutePlanner, SqliteStore, StoreOptions,
};
use std::sync::Arc;

/// Services shared across all handlers, each holding the same store
#[derive(Clone)]
pub struct AppState {
    pub ingestor: Ingestor,
    pub planner: RoutePlanner,
    pub containers: ContainerService,
}

impl AppState {
    pub fn new(store: Arc<dyn ContainerStore>) -> Self {
        Self {
            ingestor: Ingestor::new(store.clone()),
            planner: RoutePlanner::new(store.clone()),
            containers: ContainerService::new(store),
        }
    }

    /// Open the SQLite store at `path` and wire the services to it
    pub async fn open(path: &str) -> smartwaste_core::Result<Self> {
        Self::open_with(path, StoreOptions::default()).await
    }

    pub async fn open_with(path: &str, options: StoreOptions) -> smartwaste_core::Result<Self> {
        let store = SqliteStore::open_with(path, options).await?;
        Ok(Self::new(Arc::new(store)))
    }
}
