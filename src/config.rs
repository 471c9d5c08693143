/*!
 * Configuration for the smartwaste CLI and server
 *
 * Values are layered: built-in defaults, then an optional TOML file, then
 * `SMARTWASTE_*` environment variables, then command-line flags.
 */

use serde::{Deserialize, Serialize};
use smartwaste_core::StoreOptions;
use smartwaste_server::ServerConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{CliError, Result};

pub const ENV_DATABASE: &str = "SMARTWASTE_DATABASE";
pub const ENV_HOST: &str = "SMARTWASTE_HOST";
pub const ENV_PORT: &str = "SMARTWASTE_PORT";
pub const ENV_LOG: &str = "SMARTWASTE_LOG";

/// Top-level configuration file layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub log: LogSection,
    pub simulator: SimulatorSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// SQLite file path or `sqlite://` URL
    pub path: String,
    pub max_connections: u32,
    pub busy_timeout_ms: u64,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            path: "smartwaste.db".to_string(),
            max_connections: 5,
            busy_timeout_ms: 5000,
            acquire_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    pub level: LogLevel,
    /// JSON log file (None = compact output on stdout)
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorSection {
    /// Base URL of the API the simulator posts to
    pub api_url: String,
    /// Seconds between rounds
    pub interval_secs: u64,
    /// Containers to report for; empty means "ask the API"
    pub containers: Vec<String>,
}

impl Default for SimulatorSection {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8080".to_string(),
            interval_secs: 10,
            containers: Vec::new(),
        }
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(CliError::Config(format!("unknown log level: {}", other))),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        toml::from_str(&contents)
            .map_err(|e| CliError::Config(format!("invalid {}: {}", path.display(), e)))
    }

    /// Defaults, overlaid with `path` when given, then with the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `SMARTWASTE_*` overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db) = lookup(ENV_DATABASE) {
            self.database.path = db;
        }
        if let Some(host) = lookup(ENV_HOST) {
            self.server.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port.parse().map_err(|_| {
                CliError::Config(format!("{} is not a valid port: {}", ENV_PORT, port))
            })?;
        }
        if let Some(level) = lookup(ENV_LOG) {
            self.log.level = level.parse()?;
        }
        Ok(())
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            max_connections: self.database.max_connections.max(1),
            busy_timeout: Duration::from_millis(self.database.busy_timeout_ms),
            acquire_timeout: Duration::from_secs(self.database.acquire_timeout_secs),
        }
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.server.host.clone(),
            port: self.server.port,
            database: self.database.path.clone(),
            store: self.store_options(),
            request_timeout: Duration::from_secs(self.server.request_timeout_secs.max(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.path, "smartwaste.db");
        assert_eq!(config.log.level, LogLevel::Info);
        assert_eq!(config.simulator.interval_secs, 10);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let toml_str = r#"
[server]
port = 9090

[log]
level = "debug"
file = "/var/log/smartwaste.json"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(config.log.file, Some(PathBuf::from("/var/log/smartwaste.json")));
        assert_eq!(config.database, DatabaseSection::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[database]\npath = \"from-file.db\"\n\n[server]\nhost = \"0.0.0.0\"\nport = 7000"
        )
        .unwrap();

        let mut config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.database.path, "from-file.db");

        config
            .apply_env(env(&[(ENV_DATABASE, "from-env.db"), (ENV_PORT, "7100")]))
            .unwrap();
        assert_eq!(config.database.path, "from-env.db");
        assert_eq!(config.server.port, 7100);
        // Untouched by the environment
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_bad_env_values_are_config_errors() {
        let mut config = AppConfig::default();
        let err = config.apply_env(env(&[(ENV_PORT, "eighty")])).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));

        let err = config.apply_env(env(&[(ENV_LOG, "loud")])).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = AppConfig::from_file(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);
    }

    #[test]
    fn test_server_config_mapping() {
        let mut config = AppConfig::default();
        config.database.max_connections = 0;
        config.database.busy_timeout_ms = 250;

        let server = config.server_config();
        assert_eq!(server.addr(), "127.0.0.1:8080");
        assert_eq!(server.store.max_connections, 1);
        assert_eq!(server.store.busy_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LogLevel::Error.to_tracing_level(), tracing::Level::ERROR);
        assert_eq!(LogLevel::Trace.to_tracing_level(), tracing::Level::TRACE);
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
    }
}
