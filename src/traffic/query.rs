//! Query facade tying the window filter and the aggregator together.

use serde::Serialize;
use tracing::debug;

use crate::model::{Station, StationTraffic};
use crate::traffic::aggregate::compute_station_traffic;
use crate::traffic::index::TripIndex;
use crate::traffic::window::{TimeFilter, filter_by_minute};

/// Which radius range the rendering layer should apply. The whole-day view
/// spans a much wider traffic range than a 2-hour window, so filtered
/// queries get a larger minimum and maximum radius to keep circles visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleHint {
    Unfiltered,
    Filtered,
}

impl ScaleHint {
    /// Suggested `[min, max]` circle radius in pixels for a sqrt scale over
    /// `total_traffic`.
    pub fn radius_range(self) -> (f64, f64) {
        match self {
            ScaleHint::Unfiltered => (0.0, 25.0),
            ScaleHint::Filtered => (3.0, 50.0),
        }
    }
}

/// Result of one traffic query: every station annotated under the given
/// filter, plus the display-scale hint derived from it.
#[derive(Debug, Serialize)]
pub struct TrafficSnapshot {
    pub stations: Vec<StationTraffic>,
    pub scale_hint: ScaleHint,
}

impl TrafficSnapshot {
    /// Sum of `total_traffic` over all stations.
    pub fn system_total(&self) -> u64 {
        self.stations.iter().map(|s| s.total_traffic as u64).sum()
    }
}

/// Owns the station list and the built trip index, and answers time-filter
/// queries against them.
///
/// `query` is a pure function of its filter: the index and station list are
/// immutable after construction and every call returns a fresh snapshot, so
/// rapid repeated queries (a dragged slider) are safe and deterministic.
pub struct TrafficEngine {
    stations: Vec<Station>,
    index: TripIndex,
}

impl TrafficEngine {
    pub fn new(stations: Vec<Station>, index: TripIndex) -> TrafficEngine {
        TrafficEngine { stations, index }
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn trip_count(&self) -> usize {
        self.index.trip_count()
    }

    /// Recomputes per-station traffic for one time filter.
    pub fn query(&self, filter: TimeFilter) -> TrafficSnapshot {
        let departure_candidates = filter_by_minute(self.index.departures_by_minute(), filter);
        let arrival_candidates = filter_by_minute(self.index.arrivals_by_minute(), filter);

        debug!(
            ?filter,
            departure_candidates = departure_candidates.len(),
            arrival_candidates = arrival_candidates.len(),
            "Traffic query"
        );

        let stations =
            compute_station_traffic(&self.stations, &departure_candidates, &arrival_candidates);

        let scale_hint = match filter {
            TimeFilter::All => ScaleHint::Unfiltered,
            TimeFilter::Around(_) => ScaleHint::Filtered,
        };

        TrafficSnapshot {
            stations,
            scale_hint,
        }
    }
}
