//! Minute-bucketed traffic aggregation.
//!
//! Trips are indexed once into 1440 minute-of-day buckets (separately by
//! start and end minute), then each query slides a circular ±60-minute
//! window over the buckets and rolls the surviving trips up into
//! per-station departure/arrival counts.

pub mod aggregate;
pub mod index;
pub mod query;
pub mod window;

pub use index::TripIndex;
pub use query::{ScaleHint, TrafficEngine, TrafficSnapshot};
pub use window::{NO_FILTER, TimeFilter};
