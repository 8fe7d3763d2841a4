//! Loading of the raw station and trip datasets from disk.
//!
//! Stations arrive as GBFS-style JSON (`{"data": {"stations": [...]}}`),
//! trips as a CSV export with one row per ride. Both are consumed once at
//! startup; everything downstream works on the in-memory records.

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use crate::model::{RawTrip, Station, Trip};

#[derive(Deserialize)]
struct StationFeed {
    data: StationFeedData,
}

#[derive(Deserialize)]
struct StationFeedData {
    stations: Vec<Station>,
}

/// Reads the station list from a GBFS-style JSON file.
///
/// Duplicate `short_name` entries keep the last occurrence; each duplicate
/// is logged with a warning.
pub fn load_stations(path: &Path) -> Result<Vec<Station>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open station file {}", path.display()))?;
    let feed: StationFeed = serde_json::from_reader(file)
        .with_context(|| format!("failed to parse station JSON {}", path.display()))?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut stations: Vec<Station> = Vec::with_capacity(feed.data.stations.len());

    for station in feed.data.stations {
        if seen.contains(&station.short_name) {
            warn!(short_name = %station.short_name, "Duplicate station id, keeping last");
            stations.retain(|s| s.short_name != station.short_name);
        } else {
            seen.insert(station.short_name.clone());
        }
        stations.push(station);
    }

    info!(station_count = stations.len(), "Stations loaded");
    Ok(stations)
}

/// Reads and parses the trip CSV.
///
/// Rows with malformed timestamps are skipped with a warning rather than
/// aborting the batch; the skip count is reported once at the end.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a row cannot be
/// deserialized at the CSV level (missing columns).
pub fn load_trips(path: &Path) -> Result<Vec<Trip>> {
    let file =
        File::open(path).with_context(|| format!("failed to open trip file {}", path.display()))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut trips = Vec::new();
    let mut skipped = 0usize;

    for result in reader.deserialize() {
        let raw: RawTrip = result.with_context(|| format!("bad CSV row in {}", path.display()))?;
        match Trip::from_raw(&raw) {
            Ok(trip) => trips.push(trip),
            Err(e) => {
                warn!(ride_id = %raw.ride_id, error = %e, "Skipping unparseable trip");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, kept = trips.len(), "Some trip rows were skipped");
    }
    info!(trip_count = trips.len(), "Trips loaded");

    Ok(trips)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_stations_parses_gbfs_envelope() {
        let path = temp_file(
            "bikeflow_test_stations.json",
            r#"{"data": {"stations": [
                {"short_name": "A32000", "name": "Main St", "lon": -71.09, "lat": 42.36},
                {"short_name": "B32012", "lon": -71.11, "lat": 42.37}
            ]}}"#,
        );

        let stations = load_stations(&path).unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].short_name, "A32000");
        assert_eq!(stations[0].name.as_deref(), Some("Main St"));
        assert_eq!(stations[1].name, None);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_stations_duplicate_keeps_last() {
        let path = temp_file(
            "bikeflow_test_stations_dup.json",
            r#"{"data": {"stations": [
                {"short_name": "A32000", "name": "Old", "lon": -71.0, "lat": 42.0},
                {"short_name": "A32000", "name": "New", "lon": -71.1, "lat": 42.1}
            ]}}"#,
        );

        let stations = load_stations(&path).unwrap();
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].name.as_deref(), Some("New"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_trips_skips_malformed_timestamps() {
        let path = temp_file(
            "bikeflow_test_trips.csv",
            "ride_id,started_at,ended_at,start_station_id,end_station_id\n\
             r1,2024-03-05 08:05:00,2024-03-05 08:15:00,A32000,B32012\n\
             r2,garbage,2024-03-05 09:00:00,A32000,B32012\n\
             r3,2024-03-05 09:30:00,2024-03-05 09:41:00,B32012,A32000\n",
        );

        let trips = load_trips(&path).unwrap();
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0].ride_id, "r1");
        assert_eq!(trips[1].ride_id, "r3");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_trips_ignores_extra_columns() {
        let path = temp_file(
            "bikeflow_test_trips_extra.csv",
            "ride_id,bike_type,started_at,ended_at,start_station_id,end_station_id\n\
             r1,electric,2024-03-05 08:05:00,2024-03-05 08:15:00,A32000,B32012\n",
        );

        let trips = load_trips(&path).unwrap();
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].start_minute, 8 * 60 + 5);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_trips_missing_file() {
        let result = load_trips(Path::new("/nonexistent/bikeflow_trips.csv"));
        assert!(result.is_err());
    }
}
