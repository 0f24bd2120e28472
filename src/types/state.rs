//! Published calibration state

use serde::{Deserialize, Serialize};

/// Read-only copy of the engine's calibration state.
///
/// This is what the integrator publishes after every tick and every operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct CalibrationState {
    /// Distance integrated from instructed speed, uncorrected
    pub raw_distance_meters: f64,
    /// `raw_distance_meters * 1000 / calibration_factor`
    pub corrected_distance_meters: f64,
    /// Per-mille scale between simulated and measured distance
    pub calibration_factor: f64,
    /// Instructed speed currently in effect (km/h)
    pub current_speed_kmh: f64,
    /// Whether the integrator advances time and distance
    pub is_running: bool,
    /// Signed schedule error in seconds, positive when ahead
    pub live_deviation: f64,
    /// Manually accumulated odometer reading
    pub odometer_meters: f64,
    /// Elapsed race time since the clock was armed
    pub race_clock_centiseconds: i64,
}

impl CalibrationState {
    /// Default state for a given calibration factor.
    pub fn with_factor(calibration_factor: f64) -> Self {
        Self {
            raw_distance_meters: 0.0,
            corrected_distance_meters: 0.0,
            calibration_factor,
            current_speed_kmh: 0.0,
            is_running: false,
            live_deviation: 0.0,
            odometer_meters: 0.0,
            race_clock_centiseconds: 0,
        }
    }
}
