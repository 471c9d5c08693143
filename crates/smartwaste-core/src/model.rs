//! Domain entities: points, statuses, containers and sensor readings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Error;

/// Fill level at or above which a container is considered full
pub const HIGH_THRESHOLD: i32 = 80;

/// Fill level at or above which a container is considered half full
pub const MEDIUM_THRESHOLD: i32 = 40;

/// A geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check that both coordinates are finite and within range
    pub fn validate(&self) -> Result<(), Error> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::Validation(format!(
                "latitude must be within [-90, 90], got {}",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::Validation(format!(
                "longitude must be within [-180, 180], got {}",
                self.longitude
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Collection urgency derived from the latest fill level
///
/// Variants are declared in urgency order, so `Low < Medium < High`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Below 40% full
    Low,
    /// Between 40% and 79% full
    Medium,
    /// 80% full or more
    High,
}

impl Status {
    /// All statuses in ascending urgency
    pub const ALL: [Status; 3] = [Status::Low, Status::Medium, Status::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Low => "low",
            Status::Medium => "medium",
            Status::High => "high",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Status::Low),
            "medium" => Ok(Status::Medium),
            "high" => Ok(Status::High),
            _ => Err(Error::Validation(format!("invalid status: {}", s))),
        }
    }
}

/// Map a fill-level percentage to its status tier.
///
/// Callers must range-check the level first (see [`validate_reading`]).
pub fn classify(fill_level: i32) -> Status {
    if fill_level >= HIGH_THRESHOLD {
        Status::High
    } else if fill_level >= MEDIUM_THRESHOLD {
        Status::Medium
    } else {
        Status::Low
    }
}

/// A registered waste container and its latest known state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Container {
    pub id: String,
    pub location: Point,
    pub capacity_liters: i32,
    /// Unset until the first reading arrives
    pub current_status: Option<Status>,
    pub last_fill_level: Option<i32>,
    /// Timestamp of the reading that produced `current_status`
    pub last_updated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Identity and position of a route candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ContainerLocation {
    pub id: String,
    pub location: Point,
}

impl From<&Container> for ContainerLocation {
    fn from(container: &Container) -> Self {
        Self {
            id: container.id.clone(),
            location: container.location,
        }
    }
}

/// Client-editable container attributes, used for registration and edits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ContainerDetails {
    pub location: Point,
    pub capacity_liters: i32,
}

impl ContainerDetails {
    pub fn new(location: Point, capacity_liters: i32) -> Self {
        Self {
            location,
            capacity_liters,
        }
    }

    /// Check capacity and coordinate ranges
    pub fn validate(&self) -> Result<(), Error> {
        if self.capacity_liters <= 0 {
            return Err(Error::Validation(format!(
                "capacity_liters must be positive, got {}",
                self.capacity_liters
            )));
        }

        self.location.validate()
    }
}

/// A single fill-level measurement reported by a container sensor
///
/// Readings are immutable events. A missing `timestamp` decodes to the Unix
/// epoch, which the validator treats as unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Reading {
    #[serde(default)]
    pub container_id: String,
    pub fill_level: i32,
    #[serde(default)]
    pub timestamp: DateTime<Utc>,
}

impl Reading {
    pub fn new(container_id: impl Into<String>, fill_level: i32, timestamp: DateTime<Utc>) -> Self {
        Self {
            container_id: container_id.into(),
            fill_level,
            timestamp,
        }
    }

    /// Whether the reading may be persisted
    pub fn is_valid(&self) -> bool {
        validate_reading(self).is_ok()
    }
}

/// Return the first structural or range problem with a reading
pub fn validate_reading(reading: &Reading) -> Result<(), Error> {
    if reading.container_id.is_empty() {
        return Err(Error::Validation("container_id is required".to_string()));
    }
    if !(0..=100).contains(&reading.fill_level) {
        return Err(Error::Validation(format!(
            "fill_level must be within [0, 100], got {}",
            reading.fill_level
        )));
    }
    if reading.timestamp == DateTime::<Utc>::default() {
        return Err(Error::Validation("timestamp is required".to_string()));
    }
    Ok(())
}
