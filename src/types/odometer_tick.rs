//! Manual odometer tick distance

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::PaceError;

/// Preference key under which the tick distance is stored.
pub const ODOMETER_TICK_KEY: &str = "odometer_tick_distance";

/// Distance added or removed by one click of the manual odometer counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum OdometerTick {
    #[default]
    #[serde(rename = "100m")]
    Meters100,
    #[serde(rename = "50m")]
    Meters50,
    #[serde(rename = "25m")]
    Meters25,
}

impl OdometerTick {
    pub fn meters(self) -> f64 {
        match self {
            OdometerTick::Meters100 => 100.0,
            OdometerTick::Meters50 => 50.0,
            OdometerTick::Meters25 => 25.0,
        }
    }

    /// Stored preference value.
    pub fn as_str(self) -> &'static str {
        match self {
            OdometerTick::Meters100 => "100m",
            OdometerTick::Meters50 => "50m",
            OdometerTick::Meters25 => "25m",
        }
    }
}

impl fmt::Display for OdometerTick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OdometerTick {
    type Err = PaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "100m" => Ok(OdometerTick::Meters100),
            "50m" => Ok(OdometerTick::Meters50),
            "25m" => Ok(OdometerTick::Meters25),
            other => Err(PaceError::InvalidPreference {
                key: ODOMETER_TICK_KEY.to_string(),
                value: other.to_string(),
            }),
        }
    }
}
