/*!
 * smartwaste CLI Style System
 *
 * Styling helpers for terminal output: themed text, status colouring and
 * comfy-table renderings of containers, readings and routes.
 */

use chrono::{DateTime, Utc};
use comfy_table::{presets, Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::{style, StyledObject};
use smartwaste_core::{Container, Reading, Route, Status};

// ============================================================================
// THEME COLORS
// ============================================================================

pub struct Theme;

impl Theme {
    pub fn primary<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).cyan()
    }

    pub fn success<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).green()
    }

    pub fn warning<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).yellow()
    }

    pub fn error<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).red()
    }

    pub fn muted<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).dim()
    }

    /// Header style (bold cyan)
    pub fn header<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).cyan().bold()
    }
}

// ============================================================================
// ICONS
// ============================================================================

pub struct Icons;

impl Icons {
    pub const SUCCESS: &'static str = "✓";
    pub const ERROR: &'static str = "✗";
    pub const WARNING: &'static str = "⚠";
    pub const INFO: &'static str = "ℹ";
    pub const TRUCK: &'static str = "🚛";
    pub const BIN: &'static str = "🗑";
    pub const ARROW_RIGHT: &'static str = "→";
}

// ============================================================================
// TABLES
// ============================================================================

/// Create a styled data table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Create a minimal table (no outer borders)
pub fn create_minimal_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_NO_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn header_cells(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|name| Cell::new(name).fg(Color::Cyan).add_attribute(Attribute::Bold))
        .collect()
}

/// Key-value table for a single record
pub fn stats_table(items: &[(&str, String)]) -> Table {
    let mut table = create_minimal_table();

    for (key, value) in items {
        table.add_row(vec![
            Cell::new(key).fg(Color::Cyan),
            Cell::new(value)
                .fg(Color::White)
                .add_attribute(Attribute::Bold),
        ]);
    }

    table
}

/// Status cell coloured by urgency; unset renders as a dash
pub fn status_cell(status: Option<Status>) -> Cell {
    match status {
        Some(Status::High) => Cell::new("high")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Some(Status::Medium) => Cell::new("medium").fg(Color::Yellow),
        Some(Status::Low) => Cell::new("low").fg(Color::Green),
        None => Cell::new("-").fg(Color::DarkGrey),
    }
}

pub fn container_table(containers: &[Container]) -> Table {
    let mut table = create_table();
    table.set_header(header_cells(&[
        "ID", "Latitude", "Longitude", "Capacity (L)", "Status", "Fill %", "Last reading",
    ]));

    for c in containers {
        table.add_row(vec![
            Cell::new(&c.id),
            Cell::new(format!("{:.6}", c.location.latitude)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.6}", c.location.longitude)).set_alignment(CellAlignment::Right),
            Cell::new(c.capacity_liters).set_alignment(CellAlignment::Right),
            status_cell(c.current_status),
            Cell::new(
                c.last_fill_level
                    .map(|f| f.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            )
            .set_alignment(CellAlignment::Right),
            Cell::new(format_timestamp(c.last_updated_at)).fg(Color::DarkGrey),
        ]);
    }

    table
}

/// Every field of one container, one per row
pub fn container_details_table(c: &Container) -> Table {
    stats_table(&[
        ("ID", c.id.clone()),
        ("Location", c.location.to_string()),
        ("Capacity", format!("{} L", c.capacity_liters)),
        (
            "Status",
            c.current_status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ),
        (
            "Fill level",
            c.last_fill_level
                .map(|f| format!("{}%", f))
                .unwrap_or_else(|| "-".to_string()),
        ),
        ("Last reading", format_timestamp(c.last_updated_at)),
        ("Registered", format_timestamp(Some(c.created_at))),
        ("Updated", format_timestamp(Some(c.updated_at))),
    ])
}

pub fn readings_table(readings: &[Reading]) -> Table {
    let mut table = create_table();
    table.set_header(header_cells(&["Recorded at", "Fill %", "Status"]));

    for r in readings {
        table.add_row(vec![
            Cell::new(format_timestamp(Some(r.timestamp))),
            Cell::new(r.fill_level).set_alignment(CellAlignment::Right),
            status_cell(Some(smartwaste_core::classify(r.fill_level))),
        ]);
    }

    table
}

pub fn route_table(route: &Route) -> Table {
    let mut table = create_table();
    table.set_header(header_cells(&["#", "Container", "Location", "Leg", "Cumulative"]));

    let mut cumulative = 0.0;
    for (idx, stop) in route.stops.iter().enumerate() {
        cumulative += stop.leg_km;
        table.add_row(vec![
            Cell::new(idx + 1).set_alignment(CellAlignment::Right),
            Cell::new(&stop.container.id),
            Cell::new(stop.container.location.to_string()).fg(Color::DarkGrey),
            Cell::new(format_distance(stop.leg_km)).set_alignment(CellAlignment::Right),
            Cell::new(format_distance(cumulative)).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

// ============================================================================
// FORMATTING
// ============================================================================

/// Metres below one kilometre, otherwise kilometres with two decimals
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{:.0} m", km * 1000.0)
    } else {
        format!("{:.2} km", km)
    }
}

pub fn format_timestamp(ts: Option<DateTime<Utc>>) -> String {
    match ts {
        Some(ts) => ts.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "-".to_string(),
    }
}

// ============================================================================
// MESSAGES
// ============================================================================

/// Print a styled error message with optional suggestion
pub fn print_error(message: &str, suggestion: Option<&str>) {
    eprintln!(
        "\n{} {}",
        Theme::error(format!("{} Error:", Icons::ERROR)),
        message
    );

    if let Some(hint) = suggestion {
        eprintln!(
            "  {} {}",
            Theme::muted(Icons::ARROW_RIGHT),
            Theme::muted(hint)
        );
    }
    eprintln!();
}

pub fn print_warning(message: &str) {
    eprintln!(
        "{} {}",
        Theme::warning(Icons::WARNING.to_string()),
        Theme::warning(message)
    );
}

pub fn print_success(message: &str) {
    println!(
        "{} {}",
        Theme::success(Icons::SUCCESS.to_string()),
        Theme::success(message)
    );
}

pub fn print_info(message: &str) {
    println!("{} {}", Theme::primary(Icons::INFO.to_string()), message);
}

/// Draw a section header with a line
pub fn section_header(title: &str) {
    let line_len = 50 - title.chars().count().min(40);
    println!(
        "\n{} {}",
        Theme::header(title),
        Theme::muted("─".repeat(line_len))
    );
}
