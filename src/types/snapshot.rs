//! Checkpoint comparison records

use serde::{Deserialize, Serialize};

/// One comparison between the corrected clock and the route sheet.
///
/// Immutable once recorded. The start-of-leg snapshot has zero diffs and no
/// recommended factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct RecordedSnapshot {
    pub reference_index: usize,
    /// Race clock plus manual correction at recording
    pub recorded_centiseconds: i64,
    /// Scheduled time of the reference
    pub expected_centiseconds: i64,
    /// `expected - recorded`; positive is early
    pub diff_centiseconds: i64,
    /// Timing error converted to distance at the reference's speed
    pub diff_meters: f64,
    pub recommended_factor: Option<f64>,
    pub raw_meters_at_recording: f64,
    pub odometer_meters_at_recording: f64,
}
