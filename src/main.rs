/*!
 * smartwaste CLI - Command Line Interface
 *
 * Runs the HTTP API, administers containers, records readings, plans
 * collection routes and drives the sensor simulator.
 */

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use smartwaste::{
    cli_style::{print_error, print_warning},
    commands::{self, ContainerCommand},
    config::{AppConfig, LogLevel},
    error::{CliError, Result, EXIT_SUCCESS},
    logging,
};
use smartwaste_core::{Point, Status};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "smartwaste")]
#[command(
    version,
    about = "Smart waste collection: container status tracking and route planning",
    long_about = None
)]
struct Cli {
    /// TOML configuration file
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// SQLite database path (overrides config and SMARTWASTE_DATABASE)
    #[arg(long, value_name = "PATH", global = true)]
    database: Option<String>,

    /// Log level
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<LogLevel>,

    /// Write JSON logs to this file instead of the terminal
    #[arg(long, value_name = "FILE", global = true)]
    log: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage containers
    #[command(subcommand)]
    Containers(ContainerCommand),

    /// Record one fill-level reading
    Ingest {
        #[arg(long, value_name = "ID")]
        container: String,
        /// Fill level in percent (0-100)
        #[arg(long, value_name = "PERCENT", allow_hyphen_values = true)]
        fill: i32,
        /// When the reading was taken (RFC 3339, default now)
        #[arg(long, value_name = "TIMESTAMP")]
        at: Option<DateTime<Utc>>,
    },

    /// Plan a nearest-neighbor collection route
    Route {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Statuses to visit (repeatable, default high)
        #[arg(long = "status", value_name = "STATUS")]
        statuses: Vec<Status>,
    },

    /// Post simulated sensor readings to a running API
    Simulate {
        /// Base URL of the API
        #[arg(long, value_name = "URL")]
        api: Option<String>,
        /// Seconds between rounds
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,
        /// Containers to simulate (repeatable, default all registered)
        #[arg(long = "container", value_name = "ID")]
        containers: Vec<String>,
    },
}

fn main() {
    let code = match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            print_error(&e.to_string(), e.suggestion());
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // File, then environment, then flags
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(database) = cli.database {
        config.database.path = database;
    }
    if let Some(level) = cli.log_level {
        config.log.level = level;
    }
    if cli.log.is_some() {
        config.log.file = cli.log;
    }

    if let Err(e) = logging::init_logging(&config.log, cli.verbose) {
        print_warning(&format!("Failed to initialize logging: {}", e));
    }

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to create async runtime: {}", e)))?;

    runtime.block_on(dispatch(config, cli.command))
}

async fn dispatch(mut config: AppConfig, command: Commands) -> Result<()> {
    match command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            commands::serve(&config).await
        }
        Commands::Containers(sub) => commands::containers::handle(&config, sub)
            .await
            .map(|_| ()),
        Commands::Ingest {
            container,
            fill,
            at,
        } => commands::ingest(&config, container, fill, at).await.map(|_| ()),
        Commands::Route { lat, lon, statuses } => {
            commands::route(&config, Point::new(lat, lon), statuses)
                .await
                .map(|_| ())
        }
        Commands::Simulate {
            api,
            interval,
            containers,
        } => {
            if let Some(api) = api {
                config.simulator.api_url = api;
            }
            if let Some(interval) = interval {
                config.simulator.interval_secs = interval;
            }
            if !containers.is_empty() {
                config.simulator.containers = containers;
            }
            commands::simulate(&config).await
        }
    }
}
