//! Output formatting and persistence for station traffic.
//!
//! Supports pretty-printed JSON, CSV append, and the display strings the
//! map frontend shows (tooltip text and wall-clock minute labels).

use anyhow::Result;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::{debug, info};

use crate::model::StationTraffic;
use crate::traffic::TrafficSnapshot;
use csv::WriterBuilder;

/// Logs a snapshot as pretty-printed JSON.
pub fn print_json(snapshot: &TrafficSnapshot) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(snapshot)?);
    Ok(())
}

/// Appends one row per station to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_records(path: &str, stations: &[StationTraffic]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for station in stations {
        writer.serialize(station)?;
    }
    writer.flush()?;

    Ok(())
}

/// Renders a minute of day as a short wall-clock label, e.g. `8:05 AM`.
pub fn format_minute(minute: u16) -> String {
    let hour24 = minute / 60;
    let min = minute % 60;
    let (hour12, meridiem) = match hour24 {
        0 => (12, "AM"),
        1..=11 => (hour24, "AM"),
        12 => (12, "PM"),
        _ => (hour24 - 12, "PM"),
    };
    format!("{}:{:02} {}", hour12, min, meridiem)
}

/// The per-station tooltip line shown on hover.
pub fn tooltip_line(station: &StationTraffic) -> String {
    format!(
        "{} trips ({} departures, {} arrivals)",
        station.total_traffic, station.departures, station.arrivals
    )
}
