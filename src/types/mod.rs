//! Core types shared by the engine, the corrector and the display.
//!
//! ## Architecture
//!
//! - [`RaceTime`] is a route-sheet clock value convertible to centiseconds
//! - [`ReferencePoint`] and [`EventKind`] describe one row of a route sheet
//! - [`SpeedSegment`] is a derived run of constant instructed speed
//! - [`CalibrationState`] is the copy the integrator publishes
//! - [`RecordedSnapshot`] is one entry of the checkpoint comparison log
//! - [`OdometerTick`] is the manual counter step stored as a preference
//! - [`PublishRate`] controls subscription cadence
//!
//! ```rust
//! use pacekeeper::types::RaceTime;
//!
//! let start: RaceTime = "08:30:00:00".parse().unwrap();
//! assert_eq!(start.to_centiseconds(), 3_060_000);
//! assert_eq!(start.to_string(), "08:30:00:00");
//! ```

mod odometer_tick;
mod publish_rate;
mod race_time;
mod route;
mod snapshot;
mod state;

pub use odometer_tick::{ODOMETER_TICK_KEY, OdometerTick};
pub use publish_rate::PublishRate;
pub use race_time::{
    CENTISECONDS_PER_HOUR, CENTISECONDS_PER_MINUTE, CENTISECONDS_PER_SECOND, RaceTime,
};
pub use route::{EventKind, ReferencePoint, SpeedSegment};
pub use snapshot::RecordedSnapshot;
pub use state::CalibrationState;
