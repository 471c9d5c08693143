//! SQLite backend implementation
//!
//! Provides persistent storage using SQLite with WAL mode for concurrency.
//! Timestamps are stored as integer microseconds since the Unix epoch so that
//! ordering in SQL matches chronological order.

use crate::{
    Container, ContainerDetails, ContainerLocation, ContainerStore, Error, Point, Reading, Result,
    Status,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::{migrate::MigrateDatabase, QueryBuilder, Row, Sqlite};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Connection pool tuning for [`SqliteStore`]
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub max_connections: u32,
    /// How long a writer waits on a locked database before failing
    pub busy_timeout: Duration,
    pub acquire_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            max_connections: 5,
            busy_timeout: Duration::from_secs(5),
            acquire_timeout: Duration::from_secs(10),
        }
    }
}

/// SQLite-backed container store
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open or create a SQLite database at the specified path
    ///
    /// Automatically runs migrations to set up the schema.
    pub async fn open(path: &str) -> Result<Self> {
        Self::open_with(path, StoreOptions::default()).await
    }

    pub async fn open_with(path: &str, options: StoreOptions) -> Result<Self> {
        let db_url = if path.starts_with("sqlite:") {
            path.to_string()
        } else {
            format!("sqlite://{}", path)
        };

        let exists = Sqlite::database_exists(&db_url)
            .await
            .map_err(|e| Error::from(e).context("check database"))?;
        if !exists {
            Sqlite::create_database(&db_url)
                .await
                .map_err(|e| Error::from(e).context("create database"))?;
        }

        let connect = SqliteConnectOptions::from_str(&db_url)
            .map_err(|e| Error::from(e).context("parse database url"))?
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(options.busy_timeout)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(options.max_connections)
            .acquire_timeout(options.acquire_timeout)
            .connect_with(connect)
            .await
            .map_err(|e| Error::from(e).context("connect to database"))?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        debug!(url = %db_url, "Opened container store");
        Ok(Self { pool })
    }

    /// Get the underlying pool (for advanced usage)
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn to_micros(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_micros()
}

fn from_micros(micros: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| Error::Persistence(format!("timestamp out of range: {}", micros)))
}

/// Current time at the precision the store keeps
fn now() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_micros(now.timestamp_micros()).unwrap_or(now)
}

const CONTAINER_COLUMNS: &str = "id, latitude, longitude, capacity_liters, current_status, \
     last_fill_level, last_updated_at, created_at, updated_at";

fn row_to_container(row: &SqliteRow) -> Result<Container> {
    let current_status = row
        .try_get::<Option<String>, _>("current_status")?
        .map(|s| Status::from_str(&s))
        .transpose()
        .map_err(|e| Error::Persistence(format!("corrupt container row: {}", e)))?;

    let last_updated_at = row
        .try_get::<Option<i64>, _>("last_updated_at")?
        .map(from_micros)
        .transpose()?;

    Ok(Container {
        id: row.try_get("id")?,
        location: Point::new(row.try_get("latitude")?, row.try_get("longitude")?),
        capacity_liters: row.try_get("capacity_liters")?,
        current_status,
        last_fill_level: row.try_get("last_fill_level")?,
        last_updated_at,
        created_at: from_micros(row.try_get("created_at")?)?,
        updated_at: from_micros(row.try_get("updated_at")?)?,
    })
}

fn row_to_reading(row: &SqliteRow) -> Result<Reading> {
    Ok(Reading {
        container_id: row.try_get("container_id")?,
        fill_level: row.try_get("fill_level")?,
        timestamp: from_micros(row.try_get("recorded_at")?)?,
    })
}

#[async_trait]
impl ContainerStore for SqliteStore {
    async fn save_reading_and_update_container(
        &self,
        reading: &Reading,
        status: Status,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE containers
             SET current_status = ?, last_fill_level = ?, last_updated_at = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(status.as_str())
        .bind(reading.fill_level)
        .bind(to_micros(reading.timestamp))
        .bind(to_micros(now()))
        .bind(&reading.container_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::from(e).context("update container snapshot"))?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(Error::container_not_found(&reading.container_id));
        }

        sqlx::query("INSERT INTO readings (container_id, fill_level, recorded_at) VALUES (?, ?, ?)")
            .bind(&reading.container_id)
            .bind(reading.fill_level)
            .bind(to_micros(reading.timestamp))
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::from(e).context("insert reading"))?;

        tx.commit()
            .await
            .map_err(|e| Error::from(e).context("commit reading"))?;
        Ok(())
    }

    async fn find_containers_by_status(
        &self,
        statuses: &[Status],
    ) -> Result<Vec<ContainerLocation>> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT id, latitude, longitude FROM containers WHERE current_status IN (",
        );
        let mut separated = query.separated(", ");
        for status in statuses {
            separated.push_bind(status.as_str());
        }
        separated.push_unseparated(") ORDER BY id ASC");

        let rows = query.build().fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| {
                Ok(ContainerLocation {
                    id: row.try_get("id")?,
                    location: Point::new(row.try_get("latitude")?, row.try_get("longitude")?),
                })
            })
            .collect()
    }

    async fn find_all_containers(&self) -> Result<Vec<Container>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM containers ORDER BY created_at DESC, id ASC",
            CONTAINER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_container).collect()
    }

    async fn find_container_by_id(&self, id: &str) -> Result<Container> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM containers WHERE id = ?",
            CONTAINER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => row_to_container(&r),
            None => Err(Error::container_not_found(id)),
        }
    }

    async fn create_container(&self, details: &ContainerDetails) -> Result<Container> {
        let created_at = now();
        let container = Container {
            id: Uuid::new_v4().to_string(),
            location: details.location,
            capacity_liters: details.capacity_liters,
            current_status: None,
            last_fill_level: None,
            last_updated_at: None,
            created_at,
            updated_at: created_at,
        };

        sqlx::query(
            "INSERT INTO containers
                 (id, latitude, longitude, capacity_liters, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&container.id)
        .bind(container.location.latitude)
        .bind(container.location.longitude)
        .bind(container.capacity_liters)
        .bind(to_micros(created_at))
        .bind(to_micros(created_at))
        .execute(&self.pool)
        .await?;

        Ok(container)
    }

    async fn update_container(&self, id: &str, details: &ContainerDetails) -> Result<()> {
        let result = sqlx::query(
            "UPDATE containers
             SET latitude = ?, longitude = ?, capacity_liters = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(details.location.latitude)
        .bind(details.location.longitude)
        .bind(details.capacity_liters)
        .bind(to_micros(now()))
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::container_not_found(id));
        }
        Ok(())
    }

    async fn delete_container(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM containers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::container_not_found(id));
        }
        Ok(())
    }

    async fn find_readings_by_container_id(&self, id: &str, limit: u32) -> Result<Vec<Reading>> {
        let rows = sqlx::query(
            "SELECT container_id, fill_level, recorded_at FROM readings
             WHERE container_id = ?
             ORDER BY recorded_at DESC, id DESC
             LIMIT ?",
        )
        .bind(id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_reading).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, TimeZone};
    use tempfile::NamedTempFile;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    fn details(lat: f64, lon: f64) -> ContainerDetails {
        ContainerDetails::new(Point::new(lat, lon), 1100)
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_sqlite_basic_flow() -> TestResult {
        let tmp = NamedTempFile::new()?;
        let store = SqliteStore::open(tmp.path().to_str().unwrap()).await?;

        let created = store.create_container(&details(40.41, -3.70)).await?;
        assert_eq!(created.current_status, None);
        assert_eq!(created.last_fill_level, None);

        let fetched = store.find_container_by_id(&created.id).await?;
        assert_eq!(fetched, created);

        store
            .save_reading_and_update_container(&Reading::new(&created.id, 85, t0()), Status::High)
            .await?;

        let fetched = store.find_container_by_id(&created.id).await?;
        assert_eq!(fetched.current_status, Some(Status::High));
        assert_eq!(fetched.last_fill_level, Some(85));
        assert_eq!(fetched.last_updated_at, Some(t0()));

        let readings = store.find_readings_by_container_id(&created.id, 10).await?;
        assert_eq!(readings, vec![Reading::new(&created.id, 85, t0())]);

        Ok(())
    }

    #[tokio::test]
    async fn test_reading_for_unknown_container_persists_nothing() -> TestResult {
        let tmp = NamedTempFile::new()?;
        let store = SqliteStore::open(tmp.path().to_str().unwrap()).await?;

        let err = store
            .save_reading_and_update_container(&Reading::new("missing", 50, t0()), Status::Medium)
            .await
            .unwrap_err();
        assert_eq!(err, Error::container_not_found("missing"));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM readings")
            .fetch_one(store.pool())
            .await?;
        assert_eq!(count, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_find_by_status_filters_and_orders_by_id() -> TestResult {
        let tmp = NamedTempFile::new()?;
        let store = SqliteStore::open(tmp.path().to_str().unwrap()).await?;

        let mut ids = Vec::new();
        for (level, status) in [(90, Status::High), (50, Status::Medium), (95, Status::High)] {
            let c = store.create_container(&details(40.0, -3.0)).await?;
            store
                .save_reading_and_update_container(&Reading::new(&c.id, level, t0()), status)
                .await?;
            ids.push((c.id, status));
        }
        // Never-read containers carry no status and are never candidates
        store.create_container(&details(41.0, -3.0)).await?;

        let high = store.find_containers_by_status(&[Status::High]).await?;
        let mut expected: Vec<String> = ids
            .iter()
            .filter(|(_, s)| *s == Status::High)
            .map(|(id, _)| id.clone())
            .collect();
        expected.sort();
        let got: Vec<String> = high.into_iter().map(|c| c.id).collect();
        assert_eq!(got, expected);

        let both = store
            .find_containers_by_status(&[Status::High, Status::Medium])
            .await?;
        assert_eq!(both.len(), 3);

        assert!(store.find_containers_by_status(&[]).await?.is_empty());
        assert!(store
            .find_containers_by_status(&[Status::Low])
            .await?
            .is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_readings_newest_first_with_limit() -> TestResult {
        let tmp = NamedTempFile::new()?;
        let store = SqliteStore::open(tmp.path().to_str().unwrap()).await?;
        let c = store.create_container(&details(40.0, -3.0)).await?;

        for minutes in [0, 30, 10, 20] {
            let ts = t0() + ChronoDuration::minutes(minutes);
            store
                .save_reading_and_update_container(&Reading::new(&c.id, 10, ts), Status::Low)
                .await?;
        }

        let readings = store.find_readings_by_container_id(&c.id, 3).await?;
        let offsets: Vec<i64> = readings
            .iter()
            .map(|r| (r.timestamp - t0()).num_minutes())
            .collect();
        assert_eq!(offsets, vec![30, 20, 10]);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_and_delete() -> TestResult {
        let tmp = NamedTempFile::new()?;
        let store = SqliteStore::open(tmp.path().to_str().unwrap()).await?;
        let c = store.create_container(&details(40.0, -3.0)).await?;

        store
            .update_container(&c.id, &ContainerDetails::new(Point::new(41.5, 2.1), 3200))
            .await?;
        let updated = store.find_container_by_id(&c.id).await?;
        assert_eq!(updated.location, Point::new(41.5, 2.1));
        assert_eq!(updated.capacity_liters, 3200);
        assert_eq!(updated.created_at, c.created_at);

        assert!(store
            .update_container("nope", &details(0.0, 0.0))
            .await
            .unwrap_err()
            .is_not_found());

        store.delete_container(&c.id).await?;
        assert!(store.find_container_by_id(&c.id).await.unwrap_err().is_not_found());
        assert!(store.delete_container(&c.id).await.unwrap_err().is_not_found());

        Ok(())
    }

    #[tokio::test]
    async fn test_reopen_keeps_data() -> TestResult {
        let tmp = NamedTempFile::new()?;
        let path = tmp.path().to_str().unwrap().to_string();

        let id = {
            let store = SqliteStore::open(&path).await?;
            let c = store.create_container(&details(40.0, -3.0)).await?;
            store.close().await;
            c.id
        };

        let store = SqliteStore::open(&path).await?;
        assert_eq!(store.find_container_by_id(&id).await?.id, id);
        Ok(())
    }

    #[tokio::test]
    async fn test_open_in_missing_directory_is_persistence_error() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("missing").join("waste.db");

        let err = SqliteStore::open(path.to_str().unwrap()).await.err().unwrap();
        assert!(err.is_retryable(), "unexpected error: {}", err);
        Ok(())
    }
}
