/*!
 * Error types for the smartwaste CLI
 */

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

/// Exit code constants for structured process exit
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_USAGE: i32 = 2;

#[derive(Debug, Error)]
pub enum CliError {
    /// Unreadable or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Bad command-line input that clap could not catch
    #[error("Usage error: {0}")]
    Usage(String),

    /// A core operation failed
    #[error(transparent)]
    Operation(#[from] smartwaste_core::Error),

    /// The API server failed to start or crashed
    #[error("Server error: {0}")]
    Server(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::Usage(_) => EXIT_USAGE,
            CliError::Operation(_) | CliError::Server(_) | CliError::Other(_) => EXIT_FAILURE,
        }
    }

    /// Short hint printed under the error message
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::Config(_) => Some("Check the --config file and SMARTWASTE_* variables"),
            CliError::Operation(smartwaste_core::Error::NotFound { .. }) => {
                Some("List known containers with `smartwaste containers list`")
            }
            CliError::Operation(err) if err.is_retryable() => {
                Some("The database may be busy; retrying is safe")
            }
            _ => None,
        }
    }
}
