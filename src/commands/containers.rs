/*!
 * `smartwaste containers` - direct container administration against the store
 */

use clap::Subcommand;
use smartwaste_core::{Container, ContainerDetails, ContainerService, Point, Reading};

use crate::cli_style::{
    container_details_table, container_table, print_info, print_success, readings_table,
    section_header, Icons,
};
use crate::config::AppConfig;
use crate::error::Result;

#[derive(Debug, Clone, Subcommand)]
pub enum ContainerCommand {
    /// List all containers, newest first
    List,

    /// Register a new container
    Add {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Capacity in litres
        #[arg(long)]
        capacity: i32,
    },

    /// Show one container
    Show { id: String },

    /// Replace a container's location and capacity
    Update {
        id: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long)]
        capacity: i32,
    },

    /// Delete a container and its reading history
    Remove { id: String },

    /// Show recent readings for a container
    Readings {
        id: String,
        /// How many readings (1-100, default 50)
        #[arg(long)]
        limit: Option<i64>,
    },
}

/// Outcome of a container command, returned for callers that want the data
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerOutput {
    Containers(Vec<Container>),
    Container(Container),
    Readings(Vec<Reading>),
    Done,
}

pub async fn handle(config: &AppConfig, command: ContainerCommand) -> Result<ContainerOutput> {
    let service = ContainerService::new(super::open_store(config).await?);

    let output = match command {
        ContainerCommand::List => {
            let containers = service.list().await?;
            if containers.is_empty() {
                print_info("No containers registered yet");
            } else {
                println!("{}", container_table(&containers));
            }
            ContainerOutput::Containers(containers)
        }
        ContainerCommand::Add { lat, lon, capacity } => {
            let container = service
                .register(ContainerDetails::new(Point::new(lat, lon), capacity))
                .await?;
            print_success(&format!("{} Registered container {}", Icons::BIN, container.id));
            ContainerOutput::Container(container)
        }
        ContainerCommand::Show { id } => {
            let container = service.get(&id).await?;
            println!("{}", container_details_table(&container));
            ContainerOutput::Container(container)
        }
        ContainerCommand::Update {
            id,
            lat,
            lon,
            capacity,
        } => {
            service
                .update(&id, ContainerDetails::new(Point::new(lat, lon), capacity))
                .await?;
            print_success(&format!("Updated container {}", id));
            ContainerOutput::Done
        }
        ContainerCommand::Remove { id } => {
            service.delete(&id).await?;
            print_success(&format!("Removed container {} and its readings", id));
            ContainerOutput::Done
        }
        ContainerCommand::Readings { id, limit } => {
            let readings = service.readings(&id, limit).await?;
            section_header(&format!("Readings for {}", id));
            if readings.is_empty() {
                print_info("No readings recorded yet");
            } else {
                println!("{}", readings_table(&readings));
            }
            ContainerOutput::Readings(readings)
        }
    };

    Ok(output)
}
