//! Per-station traffic rollup over a filtered trip set.

use std::collections::HashMap;

use crate::model::{Station, StationTraffic, Trip};

/// Counts trips per station identifier. Missing identifiers read as 0.
fn rollup<'a>(trips: &'a [Trip], key: impl Fn(&'a Trip) -> &'a str) -> HashMap<&'a str, u32> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for trip in trips {
        *counts.entry(key(trip)).or_insert(0) += 1;
    }
    counts
}

/// Annotates every station with departure and arrival counts drawn from the
/// two candidate trip sets.
///
/// Departure candidates are grouped by their start station, arrival
/// candidates by their end station. A station absent from both groupings
/// gets all-zero counts; trips referencing a station id not in `stations`
/// are silently dropped. The output preserves the size and order of the
/// input station list, and `total_traffic` is always
/// `departures + arrivals`.
pub fn compute_station_traffic(
    stations: &[Station],
    departure_trips: &[Trip],
    arrival_trips: &[Trip],
) -> Vec<StationTraffic> {
    let departures = rollup(departure_trips, |t| t.start_station_id.as_str());
    let arrivals = rollup(arrival_trips, |t| t.end_station_id.as_str());

    stations
        .iter()
        .map(|station| {
            let id = station.short_name.as_str();
            let departures = departures.get(id).copied().unwrap_or(0);
            let arrivals = arrivals.get(id).copied().unwrap_or(0);

            StationTraffic {
                short_name: station.short_name.clone(),
                name: station.name.clone(),
                lon: station.lon,
                lat: station.lat,
                departures,
                arrivals,
                total_traffic: departures + arrivals,
            }
        })
        .collect()
}
