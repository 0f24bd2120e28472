//! Checkpoint comparison and the snapshot log
//!
//! Comparing a checkpoint is deterministic: given the reference, the published
//! calibration state and the crew's manual clock correction, [`compare`]
//! produces the timing error, its distance equivalent at the instructed speed,
//! and the factor that would have made simulated distance match the odometer.
//!
//! ```rust
//! use pacekeeper::corrector::{diff_meters, recommended_factor};
//!
//! // 4 s late at 82 km/h
//! assert!((diff_meters(82, -400) + 91.111).abs() < 1e-3);
//! assert_eq!(recommended_factor(1500.0, 1000.0), Some(1500.0));
//! assert_eq!(recommended_factor(1042.0, 0.0), None);
//! ```

use serde::Serialize;
use tracing::debug;

use crate::types::{CENTISECONDS_PER_HOUR, CalibrationState, RecordedSnapshot, ReferencePoint};
use crate::{PaceError, Result};

/// km/h to meters per centisecond divisor (`3.6 * 100`).
pub const KMH_PER_METERS_PER_CENTISECOND: f64 = 360.0;

/// Factor for which corrected distance equals the odometer reading.
///
/// Absent unless both distances are positive.
pub fn recommended_factor(raw_distance_meters: f64, odometer_meters: f64) -> Option<f64> {
    (raw_distance_meters > 0.0 && odometer_meters > 0.0)
        .then(|| raw_distance_meters / odometer_meters * 1000.0)
}

/// Timing error expressed as distance at the instructed speed.
pub fn diff_meters(instructed_speed_kmh: u32, diff_centiseconds: i64) -> f64 {
    instructed_speed_kmh as f64 / KMH_PER_METERS_PER_CENTISECOND * diff_centiseconds as f64
}

/// Largest clock correction accepted, one day either way.
pub const MAX_CLOCK_CORRECTION_CENTISECONDS: i64 = 24 * CENTISECONDS_PER_HOUR;

/// Compare the corrected clock against a reference.
///
/// Fails with [`PaceError::InvalidClockCorrection`] when the correction is
/// larger than [`MAX_CLOCK_CORRECTION_CENTISECONDS`] or the corrected clock
/// does not fit.
pub fn compare(
    reference_index: usize,
    reference: &ReferencePoint,
    state: &CalibrationState,
    clock_correction_centiseconds: i64,
) -> Result<RecordedSnapshot> {
    let invalid = || PaceError::InvalidClockCorrection { centiseconds: clock_correction_centiseconds };
    if clock_correction_centiseconds.unsigned_abs() > MAX_CLOCK_CORRECTION_CENTISECONDS as u64 {
        return Err(invalid());
    }

    let expected = reference.expected_centiseconds();
    let recorded = state
        .race_clock_centiseconds
        .checked_add(clock_correction_centiseconds)
        .ok_or_else(invalid)?;
    let diff = expected.checked_sub(recorded).ok_or_else(invalid)?;

    Ok(RecordedSnapshot {
        reference_index,
        recorded_centiseconds: recorded,
        expected_centiseconds: expected,
        diff_centiseconds: diff,
        diff_meters: diff_meters(reference.instructed_speed, diff),
        recommended_factor: recommended_factor(state.raw_distance_meters, state.odometer_meters),
        raw_meters_at_recording: state.raw_distance_meters,
        odometer_meters_at_recording: state.odometer_meters,
    })
}

/// Zero-diff snapshot taken when the leg starts exactly on schedule.
pub fn start_of_leg(
    reference_index: usize,
    reference: &ReferencePoint,
    state: &CalibrationState,
) -> RecordedSnapshot {
    let expected = reference.expected_centiseconds();
    RecordedSnapshot {
        reference_index,
        recorded_centiseconds: expected,
        expected_centiseconds: expected,
        diff_centiseconds: 0,
        diff_meters: 0.0,
        recommended_factor: None,
        raw_meters_at_recording: state.raw_distance_meters,
        odometer_meters_at_recording: state.odometer_meters,
    }
}

/// Append-only, creation-ordered snapshot log for one checkpoint.
///
/// Only the last entry can be removed, and never the first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SnapshotLog {
    entries: Vec<RecordedSnapshot>,
}

impl SnapshotLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, snapshot: RecordedSnapshot) {
        debug!(
            reference = snapshot.reference_index,
            diff_cs = snapshot.diff_centiseconds,
            factor = ?snapshot.recommended_factor,
            "Snapshot recorded"
        );
        self.entries.push(snapshot);
    }

    /// Remove the most recent snapshot.
    ///
    /// Fails with [`PaceError::CannotUndo`] when only the start-of-leg
    /// snapshot (or nothing) is left.
    pub fn undo(&mut self) -> Result<RecordedSnapshot> {
        if self.entries.len() <= 1 {
            return Err(PaceError::CannotUndo { snapshots: self.entries.len() });
        }
        let removed = self.entries.pop().ok_or(PaceError::CannotUndo { snapshots: 0 })?;
        debug!(reference = removed.reference_index, "Snapshot undone");
        Ok(removed)
    }

    pub fn entries(&self) -> &[RecordedSnapshot] {
        &self.entries
    }

    pub fn last(&self) -> Option<&RecordedSnapshot> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent factor recommendation, if any snapshot produced one.
    pub fn latest_recommended_factor(&self) -> Option<f64> {
        self.entries.iter().rev().find_map(|s| s.recommended_factor)
    }
}
