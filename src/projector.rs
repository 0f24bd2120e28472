//! Pace display projection
//!
//! Pure functions that turn a route sheet, the reference cursor, the snapshot
//! log and a published [`CalibrationState`] into what a dashboard shows. Nothing
//! here mutates engine or session state.

use serde::Serialize;

use crate::route_sheet::RouteSheet;
use crate::types::{CalibrationState, EventKind, RaceTime, RecordedSnapshot, ReferencePoint, SpeedSegment};

/// Speed segments around the one containing a reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct SegmentWindow {
    pub previous: Option<SpeedSegment>,
    pub current: Option<SpeedSegment>,
    pub next: Option<SpeedSegment>,
    pub after_next: Option<SpeedSegment>,
}

impl SegmentWindow {
    /// Window centred on segment `k`.
    pub fn around(segments: &[SpeedSegment], k: usize) -> Self {
        Self {
            previous: k.checked_sub(1).and_then(|i| segments.get(i).copied()),
            current: segments.get(k).copied(),
            next: segments.get(k + 1).copied(),
            after_next: segments.get(k + 2).copied(),
        }
    }

    /// Window for the segment containing `reference_index`.
    ///
    /// Empty when the sheet has no references.
    pub fn for_reference(sheet: &RouteSheet, reference_index: usize) -> Self {
        match sheet.segment_index_for(reference_index) {
            Some(k) => Self::around(sheet.segments(), k),
            None => Self::default(),
        }
    }
}

/// Schedule position derived from the live deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum PaceStatus {
    Ahead,
    Behind,
    OnPace,
}

impl PaceStatus {
    /// Classify a signed deviation in seconds. `|deviation| <= tolerance` is on pace.
    pub fn classify(deviation_seconds: f64, tolerance_seconds: f64) -> Self {
        if !deviation_seconds.is_finite() || deviation_seconds.abs() <= tolerance_seconds.abs() {
            PaceStatus::OnPace
        } else if deviation_seconds > 0.0 {
            PaceStatus::Ahead
        } else {
            PaceStatus::Behind
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaceStatus::Ahead => "AHEAD",
            PaceStatus::Behind => "BEHIND",
            PaceStatus::OnPace => "ON PACE",
        }
    }
}

/// Detail column of a route-sheet row.
///
/// `+30s` for an advance, `-15s` for a delay, `2.5km` for a distance speed
/// change, `ZC` appended for control zones, and `-` when there is nothing to
/// show.
pub fn reference_detail(reference: &ReferencePoint) -> String {
    let mut parts = Vec::with_capacity(2);

    if let Some(extra) = reference.extra_value.filter(|v| *v != 0.0) {
        match reference.kind {
            EventKind::AdvanceSeconds => parts.push(format!("+{}s", extra)),
            EventKind::DelaySeconds => parts.push(format!("-{}s", extra)),
            EventKind::SpeedChangeByDistance => parts.push(format!("{}km", extra)),
            _ => {}
        }
    }
    if reference.is_control_zone {
        parts.push("ZC".to_string());
    }

    if parts.is_empty() { "-".to_string() } else { parts.join(" ") }
}

/// Rows a dashboard highlights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct HighlightedRows {
    /// Route-sheet row under the cursor
    pub reference: Option<usize>,
    /// Most recent snapshot row
    pub snapshot: Option<usize>,
}

pub fn highlighted_rows(cursor: Option<usize>, snapshots: &[RecordedSnapshot]) -> HighlightedRows {
    HighlightedRows {
        reference: cursor,
        snapshot: snapshots.len().checked_sub(1),
    }
}

/// Signed centiseconds from the race clock to `target`; negative once passed.
pub fn countdown(race_clock_centiseconds: i64, target: RaceTime) -> i64 {
    target.to_centiseconds() - race_clock_centiseconds
}

/// Everything a dashboard frame needs, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct PaceView {
    pub clock: RaceTime,
    pub status: PaceStatus,
    pub live_deviation: f64,
    pub segments: SegmentWindow,
    pub rows: HighlightedRows,
    /// Centiseconds until the reference under the cursor
    pub to_next_reference: Option<i64>,
}

impl PaceView {
    pub fn project(
        sheet: &RouteSheet,
        cursor: usize,
        snapshots: &[RecordedSnapshot],
        state: &CalibrationState,
        tolerance_seconds: f64,
    ) -> Self {
        let to_next_reference = sheet
            .get(cursor)
            .ok()
            .map(|reference| countdown(state.race_clock_centiseconds, reference.time));

        Self {
            clock: RaceTime::from_centiseconds(state.race_clock_centiseconds),
            status: PaceStatus::classify(state.live_deviation, tolerance_seconds),
            live_deviation: state.live_deviation,
            segments: SegmentWindow::for_reference(sheet, cursor),
            rows: highlighted_rows(Some(cursor).filter(|_| !sheet.is_empty()), snapshots),
            to_next_reference,
        }
    }
}
