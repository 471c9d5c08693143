/*!
 * smartwaste - smart waste collection toolkit
 *
 * Command-line front end over `smartwaste-core` and `smartwaste-server`:
 * - Layered configuration (TOML file, SMARTWASTE_* environment, flags)
 * - Structured logging to the terminal or a JSON file
 * - Container administration and reading ingestion against SQLite
 * - Nearest-neighbor collection routes rendered as tables
 * - A sensor simulator that posts readings to a running API
 */

pub mod cli_style;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod simulator;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{CliError, Result};
pub use simulator::Simulator;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
