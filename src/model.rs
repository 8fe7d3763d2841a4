//! Data types shared across the traffic pipeline.

use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Number of minute buckets in one day.
pub const MINUTES_PER_DAY: usize = 1440;

/// A single row deserialized from the trip CSV. Timestamps are still raw
/// strings at this point; extra CSV columns are ignored.
#[derive(Debug, Deserialize)]
pub struct RawTrip {
    pub ride_id: String,
    pub started_at: String,
    pub ended_at: String,
    pub start_station_id: String,
    pub end_station_id: String,
}

/// A parsed trip with its minute-of-day fields derived once at ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub ride_id: String,
    pub start_station_id: String,
    pub end_station_id: String,
    pub started_at: NaiveDateTime,
    pub ended_at: NaiveDateTime,
    /// Wall-clock minute of day the trip started, in `0..1440`.
    pub start_minute: u16,
    /// Wall-clock minute of day the trip ended, in `0..1440`.
    pub end_minute: u16,
}

impl Trip {
    /// Parses a raw CSV row into a [`Trip`], deriving both minute-of-day
    /// fields.
    ///
    /// # Errors
    ///
    /// Returns an error if either timestamp fails to parse. Malformed
    /// timestamps never default to minute 0.
    pub fn from_raw(raw: &RawTrip) -> Result<Trip> {
        let started_at = parse_timestamp(&raw.started_at)
            .with_context(|| format!("trip {}: bad started_at {:?}", raw.ride_id, raw.started_at))?;
        let ended_at = parse_timestamp(&raw.ended_at)
            .with_context(|| format!("trip {}: bad ended_at {:?}", raw.ride_id, raw.ended_at))?;

        Ok(Trip {
            ride_id: raw.ride_id.clone(),
            start_station_id: raw.start_station_id.clone(),
            end_station_id: raw.end_station_id.clone(),
            started_at,
            ended_at,
            start_minute: minutes_since_midnight(started_at),
            end_minute: minutes_since_midnight(ended_at),
        })
    }
}

/// Truncates a timestamp to its wall-clock minute of day. Seconds are
/// dropped; this is not an elapsed-duration calculation.
pub fn minutes_since_midnight(t: NaiveDateTime) -> u16 {
    (t.hour() * 60 + t.minute()) as u16
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    // `%.f` also accepts timestamps without fractional seconds.
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .with_context(|| format!("unparseable timestamp {:?}", s))
}

/// A bike-share station as loaded from the GBFS-style station JSON, keyed
/// by its `short_name`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Station {
    pub short_name: String,
    #[serde(default)]
    pub name: Option<String>,
    pub lon: f64,
    pub lat: f64,
}

/// A station annotated with traffic counts for one time filter. Freshly
/// computed on every query; counts never accumulate across calls.
#[derive(Debug, Clone, Serialize)]
pub struct StationTraffic {
    pub short_name: String,
    pub name: Option<String>,
    pub lon: f64,
    pub lat: f64,
    pub departures: u32,
    pub arrivals: u32,
    pub total_traffic: u32,
}

impl StationTraffic {
    /// Share of this station's traffic that is departures, or `None` for a
    /// zero-traffic station.
    pub fn departure_ratio(&self) -> Option<f64> {
        if self.total_traffic == 0 {
            None
        } else {
            Some(self.departures as f64 / self.total_traffic as f64)
        }
    }

    /// Quantizes the departure ratio into three flow classes (0.0 = all
    /// arrivals, 0.5 = balanced, 1.0 = all departures). Zero-traffic
    /// stations read as balanced.
    pub fn flow_class(&self) -> f64 {
        match self.departure_ratio() {
            None => 0.5,
            Some(r) if r < 1.0 / 3.0 => 0.0,
            Some(r) if r < 2.0 / 3.0 => 0.5,
            Some(_) => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(started_at: &str, ended_at: &str) -> RawTrip {
        RawTrip {
            ride_id: "ride-1".to_string(),
            started_at: started_at.to_string(),
            ended_at: ended_at.to_string(),
            start_station_id: "A32000".to_string(),
            end_station_id: "B32012".to_string(),
        }
    }

    #[test]
    fn test_from_raw_derives_minutes() {
        let trip = Trip::from_raw(&raw("2024-03-05 08:05:59", "2024-03-05 08:27:03")).unwrap();
        assert_eq!(trip.start_minute, 8 * 60 + 5);
        assert_eq!(trip.end_minute, 8 * 60 + 27);
    }

    #[test]
    fn test_from_raw_ignores_seconds() {
        // 08:05:59 and 08:05:00 land in the same bucket
        let a = Trip::from_raw(&raw("2024-03-05 08:05:59", "2024-03-05 09:00:00")).unwrap();
        let b = Trip::from_raw(&raw("2024-03-05 08:05:00", "2024-03-05 09:00:00")).unwrap();
        assert_eq!(a.start_minute, b.start_minute);
    }

    #[test]
    fn test_from_raw_accepts_fractional_seconds() {
        let trip = Trip::from_raw(&raw("2024-03-05 23:59:01.123", "2024-03-06 00:00:30")).unwrap();
        assert_eq!(trip.start_minute, 1439);
        assert_eq!(trip.end_minute, 0);
    }

    #[test]
    fn test_from_raw_rejects_malformed_timestamp() {
        let err = Trip::from_raw(&raw("not-a-date", "2024-03-05 09:00:00")).unwrap_err();
        assert!(err.to_string().contains("started_at"));
    }

    #[test]
    fn test_departure_ratio_zero_traffic() {
        let st = StationTraffic {
            short_name: "A32000".to_string(),
            name: None,
            lon: -71.09,
            lat: 42.36,
            departures: 0,
            arrivals: 0,
            total_traffic: 0,
        };
        assert_eq!(st.departure_ratio(), None);
        assert_eq!(st.flow_class(), 0.5);
    }

    #[test]
    fn test_flow_class_quantizes() {
        let mut st = StationTraffic {
            short_name: "A32000".to_string(),
            name: None,
            lon: -71.09,
            lat: 42.36,
            departures: 9,
            arrivals: 1,
            total_traffic: 10,
        };
        assert_eq!(st.flow_class(), 1.0);
        st.departures = 5;
        st.arrivals = 5;
        assert_eq!(st.flow_class(), 0.5);
        st.departures = 0;
        st.arrivals = 10;
        assert_eq!(st.flow_class(), 0.0);
    }
}
