//! Sliding time-of-day window over the minute buckets.

use anyhow::{Result, bail};

use crate::model::{MINUTES_PER_DAY, Trip};

/// Half-width of the query window, in minutes, on each side of the center.
pub const WINDOW_HALF_WIDTH: u16 = 60;

/// External sentinel meaning "no time filter".
pub const NO_FILTER: i32 = -1;

/// Time-of-day selection for a traffic query: either the whole day, or a
/// ±60-minute window centered on one minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFilter {
    All,
    Around(u16),
}

impl TimeFilter {
    /// Validates a raw slider value: `-1` means no filter, anything else
    /// must be a minute of day in `0..1440`.
    ///
    /// # Errors
    ///
    /// Returns an error for values outside `{-1} ∪ [0, 1439]`; callers are
    /// expected to clamp UI input before calling.
    pub fn from_raw(value: i32) -> Result<TimeFilter> {
        match value {
            NO_FILTER => Ok(TimeFilter::All),
            m if (0..MINUTES_PER_DAY as i32).contains(&m) => Ok(TimeFilter::Around(m as u16)),
            other => bail!("time filter {} out of range (-1 or 0..=1439)", other),
        }
    }
}

/// Flattens the buckets selected by `filter` into one trip list.
///
/// With [`TimeFilter::All`] this is the concatenation of all 1440 slots in
/// slot order, intra-slot order preserved. With [`TimeFilter::Around`] the
/// window is the half-open minute range `[center - 60, center + 60)`,
/// wrapping across midnight when needed.
pub fn filter_by_minute(buckets: &[Vec<Trip>], filter: TimeFilter) -> Vec<Trip> {
    match filter {
        TimeFilter::All => buckets.iter().flatten().cloned().collect(),
        TimeFilter::Around(center) => {
            let len = MINUTES_PER_DAY;
            let min = (center as usize + len - WINDOW_HALF_WIDTH as usize) % len;
            let max = (center as usize + WINDOW_HALF_WIDTH as usize) % len;

            if min > max {
                // Window spans midnight: [min, 1440) then [0, max).
                buckets[min..]
                    .iter()
                    .chain(buckets[..max].iter())
                    .flatten()
                    .cloned()
                    .collect()
            } else {
                buckets[min..max].iter().flatten().cloned().collect()
            }
        }
    }
}
