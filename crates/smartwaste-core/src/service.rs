//! Container registration and history queries

use std::sync::Arc;
use tracing::info;

use crate::model::{Container, ContainerDetails, Reading};
use crate::{ContainerStore, Result};

/// Number of readings returned when the caller gives no usable limit
pub const DEFAULT_READINGS_LIMIT: u32 = 50;

/// Largest page of readings a caller may request
pub const MAX_READINGS_LIMIT: u32 = 100;

/// Replace a missing or out-of-range limit with the default
pub fn clamp_readings_limit(limit: Option<i64>) -> u32 {
    match limit {
        Some(n) if n > 0 && n <= i64::from(MAX_READINGS_LIMIT) => n as u32,
        _ => DEFAULT_READINGS_LIMIT,
    }
}

#[derive(Clone)]
pub struct ContainerService {
    store: Arc<dyn ContainerStore>,
}

impl ContainerService {
    pub fn new(store: Arc<dyn ContainerStore>) -> Self {
        Self { store }
    }

    pub async fn register(&self, details: ContainerDetails) -> Result<Container> {
        details.validate()?;
        let container = self
            .store
            .create_container(&details)
            .await
            .map_err(|e| e.context("register container"))?;

        info!(
            id = %container.id,
            location = %container.location,
            capacity_liters = container.capacity_liters,
            "Registered container"
        );
        Ok(container)
    }

    pub async fn get(&self, id: &str) -> Result<Container> {
        self.store
            .find_container_by_id(id)
            .await
            .map_err(|e| e.context("get container"))
    }

    /// Every container, most recently registered first
    pub async fn list(&self) -> Result<Vec<Container>> {
        self.store
            .find_all_containers()
            .await
            .map_err(|e| e.context("list containers"))
    }

    pub async fn update(&self, id: &str, details: ContainerDetails) -> Result<()> {
        details.validate()?;
        self.store
            .update_container(id, &details)
            .await
            .map_err(|e| e.context("update container"))?;

        info!(id, location = %details.location, "Updated container");
        Ok(())
    }

    /// Remove a container together with its reading history
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.store
            .delete_container(id)
            .await
            .map_err(|e| e.context("delete container"))?;

        info!(id, "Deleted container");
        Ok(())
    }

    /// Most recent readings for a container, newest first
    ///
    /// `limit` is clamped with [`clamp_readings_limit`]. Fails with
    /// `NotFound` for an unknown container rather than returning an empty
    /// history.
    pub async fn readings(&self, id: &str, limit: Option<i64>) -> Result<Vec<Reading>> {
        self.get(id).await?;

        self.store
            .find_readings_by_container_id(id, clamp_readings_limit(limit))
            .await
            .map_err(|e| e.context("list readings"))
    }
}
