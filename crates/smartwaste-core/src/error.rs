//! Error taxonomy shared by the store, the services and the transports

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by core operations
///
/// The kind is preserved as errors travel up from the store; only the
/// message gains context about the failing operation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Malformed or out-of-range input (client error, never retried)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced entity does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Storage-layer failure of any kind
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl Error {
    /// Shorthand for a missing container
    pub fn container_not_found(id: impl Into<String>) -> Self {
        Error::NotFound {
            entity: "container",
            id: id.into(),
        }
    }

    /// Prefix a persistence failure with the operation that produced it.
    ///
    /// Validation and not-found errors already name their subject and are
    /// returned untouched.
    pub fn context(self, operation: &str) -> Self {
        match self {
            Error::Persistence(msg) => Error::Persistence(format!("{}: {}", operation, msg)),
            other => other,
        }
    }

    /// Whether the caller may retry the same request
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Persistence(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

#[cfg(feature = "sqlite")]
impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound {
                entity: "row",
                id: String::new(),
            },
            other => Error::Persistence(other.to_string()),
        }
    }
}

#[cfg(feature = "sqlite")]
impl From<sqlx::migrate::MigrateError> for Error {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Error::Persistence(format!("migration failed: {}", err))
    }
}
