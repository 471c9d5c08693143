//! Reading ingestion: validate, classify, persist atomically

use std::sync::Arc;
use tracing::{debug, warn};

use crate::model::{classify, validate_reading, Reading, Status};
use crate::{ContainerStore, Result};

/// Accepts sensor readings and keeps container snapshots in step with them
#[derive(Clone)]
pub struct Ingestor {
    store: Arc<dyn ContainerStore>,
}

impl Ingestor {
    pub fn new(store: Arc<dyn ContainerStore>) -> Self {
        Self { store }
    }

    /// Record a reading and return the status it produced.
    ///
    /// Invalid readings are rejected before the store is touched. The reading
    /// append and the snapshot update either both persist or neither does.
    /// Readings older than the current snapshot are accepted and still
    /// overwrite it.
    pub async fn ingest(&self, reading: Reading) -> Result<Status> {
        if let Err(err) = validate_reading(&reading) {
            debug!(container_id = %reading.container_id, error = %err, "Rejected reading");
            return Err(err);
        }

        let status = classify(reading.fill_level);

        self.store
            .save_reading_and_update_container(&reading, status)
            .await
            .map_err(|err| {
                warn!(
                    container_id = %reading.container_id,
                    error = %err,
                    "Failed to persist reading"
                );
                err.context("ingest reading")
            })?;

        debug!(
            container_id = %reading.container_id,
            fill_level = reading.fill_level,
            status = %status,
            "Reading ingested"
        );
        Ok(status)
    }
}
