//! Publication rate control for state subscriptions

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How often a subscriber wants calibration state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum PublishRate {
    /// Every publication from the integrator (one per tick and per operation)
    Native,

    /// At most this many updates per second, latest value wins.
    /// Rates at or above the engine tick rate fall back to Native.
    Max(u32),
}

impl PublishRate {
    /// Normalize against the engine tick frequency.
    pub fn normalize(self, tick_hz: f64) -> Self {
        match self {
            PublishRate::Native => PublishRate::Native,
            PublishRate::Max(0) => PublishRate::Native,
            PublishRate::Max(hz) if hz as f64 >= tick_hz => PublishRate::Native,
            PublishRate::Max(hz) => PublishRate::Max(hz),
        }
    }

    /// Sampling interval, if sampling is needed at this tick frequency.
    pub fn sample_interval(self, tick_hz: f64) -> Option<Duration> {
        match self.normalize(tick_hz) {
            PublishRate::Native => None,
            PublishRate::Max(hz) => Some(Duration::from_secs_f64(1.0 / hz as f64)),
        }
    }
}
