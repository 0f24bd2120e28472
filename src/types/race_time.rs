//! Route-sheet clock values

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{PaceError, Result};

/// Centiseconds in one hour.
pub const CENTISECONDS_PER_HOUR: i64 = 360_000;
/// Centiseconds in one minute.
pub const CENTISECONDS_PER_MINUTE: i64 = 6_000;
/// Centiseconds in one second.
pub const CENTISECONDS_PER_SECOND: i64 = 100;

/// A time of day as printed on a route sheet (`HH:MM:SS:CC`).
///
/// Hours are 0-23, minutes and seconds 0-59, centiseconds 0-99.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct RaceTime {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub centiseconds: u8,
}

impl RaceTime {
    /// Build a time, rejecting out-of-range fields.
    pub fn new(hours: u8, minutes: u8, seconds: u8, centiseconds: u8) -> Result<Self> {
        if hours > 23 || minutes > 59 || seconds > 59 || centiseconds > 99 {
            return Err(PaceError::invalid_route_sheet(format!(
                "time {:02}:{:02}:{:02}:{:02} out of range",
                hours, minutes, seconds, centiseconds
            )));
        }
        Ok(Self { hours, minutes, seconds, centiseconds })
    }

    /// Total centiseconds since midnight.
    pub fn to_centiseconds(self) -> i64 {
        self.hours as i64 * CENTISECONDS_PER_HOUR
            + self.minutes as i64 * CENTISECONDS_PER_MINUTE
            + self.seconds as i64 * CENTISECONDS_PER_SECOND
            + self.centiseconds as i64
    }

    /// Split a centisecond count back into clock fields.
    ///
    /// Negative values clamp to midnight and hours wrap past a day.
    pub fn from_centiseconds(total: i64) -> Self {
        let total = total.max(0);
        Self {
            hours: ((total / CENTISECONDS_PER_HOUR) % 24) as u8,
            minutes: ((total / CENTISECONDS_PER_MINUTE) % 60) as u8,
            seconds: ((total / CENTISECONDS_PER_SECOND) % 60) as u8,
            centiseconds: (total % CENTISECONDS_PER_SECOND) as u8,
        }
    }

    /// `MM:SS:CC` form used in the snapshot table.
    pub fn short(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.minutes, self.seconds, self.centiseconds)
    }
}

impl fmt::Display for RaceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds, self.centiseconds
        )
    }
}

impl FromStr for RaceTime {
    type Err = PaceError;

    fn from_str(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.trim().split(':').collect();
        if fields.len() != 4 {
            return Err(PaceError::invalid_route_sheet(format!(
                "expected HH:MM:SS:CC, got '{}'",
                s
            )));
        }

        let mut parsed = [0u8; 4];
        for (slot, field) in parsed.iter_mut().zip(&fields) {
            *slot = field.parse().map_err(|_| {
                PaceError::invalid_route_sheet(format!("invalid time field '{}' in '{}'", field, s))
            })?;
        }

        Self::new(parsed[0], parsed[1], parsed[2], parsed[3])
    }
}
