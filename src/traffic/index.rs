//! Minute-of-day bucket index over the trip set.

use crate::model::{MINUTES_PER_DAY, Trip};
use tracing::info;

/// Trips bucketed by minute of day, once by start minute (departures) and
/// once by end minute (arrivals).
///
/// The index is built once per dataset and is read-only afterwards: `build`
/// consumes its input and there is no append API, so re-indexing always
/// means rebuilding from scratch. Every ingested trip appears in exactly
/// one departure slot and exactly one arrival slot.
#[derive(Debug)]
pub struct TripIndex {
    departures_by_minute: Vec<Vec<Trip>>,
    arrivals_by_minute: Vec<Vec<Trip>>,
    trip_count: usize,
}

impl TripIndex {
    /// Buckets the full trip set by start and end minute.
    pub fn build(trips: Vec<Trip>) -> TripIndex {
        let mut departures_by_minute: Vec<Vec<Trip>> = vec![Vec::new(); MINUTES_PER_DAY];
        let mut arrivals_by_minute: Vec<Vec<Trip>> = vec![Vec::new(); MINUTES_PER_DAY];
        let trip_count = trips.len();

        for trip in trips {
            arrivals_by_minute[trip.end_minute as usize].push(trip.clone());
            departures_by_minute[trip.start_minute as usize].push(trip);
        }

        info!(trip_count, "Trip index built");

        TripIndex {
            departures_by_minute,
            arrivals_by_minute,
            trip_count,
        }
    }

    /// Departure buckets, indexed by start minute. Length is always 1440.
    pub fn departures_by_minute(&self) -> &[Vec<Trip>] {
        &self.departures_by_minute
    }

    /// Arrival buckets, indexed by end minute. Length is always 1440.
    pub fn arrivals_by_minute(&self) -> &[Vec<Trip>] {
        &self.arrivals_by_minute
    }

    /// Number of trips ingested into the index.
    pub fn trip_count(&self) -> usize {
        self.trip_count
    }
}
