//! Backend implementations for ContainerStore
//!
//! - `sqlite`: SQLite-based backend (default, requires `sqlite` feature)

#[cfg(feature = "sqlite")]
pub mod sqlite;
