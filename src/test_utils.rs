//! Route-sheet fixtures shared by unit tests and benchmarks
//!
//! The dashboard fixture is the leg used throughout the crew's reference
//! layout: a LAR at 08:30:00:00 followed by six references, with a speed
//! change to 80 km/h and back.

#![cfg(any(test, feature = "benchmark"))]

use crate::route_sheet::RouteSheet;
use crate::types::{EventKind, RaceTime, ReferencePoint};

/// Checkpoint id used by the dashboard fixture.
pub const DASHBOARD_CHECKPOINT_ID: i64 = 8;

/// Build a reference from a centisecond timestamp.
pub fn reference(order_index: i32, centiseconds: i64, kind: EventKind, speed: u32) -> ReferencePoint {
    ReferencePoint::new(order_index, RaceTime::from_centiseconds(centiseconds), kind, speed)
}

fn at(text: &str) -> RaceTime {
    match text.parse() {
        Ok(time) => time,
        Err(e) => panic!("bad fixture time {}: {}", text, e),
    }
}

/// The dashboard leg as an unvalidated reference list.
pub fn dashboard_references() -> Vec<ReferencePoint> {
    vec![
        ReferencePoint::new(0, at("08:30:00:00"), EventKind::StartOfLeg, 82),
        ReferencePoint::new(1, at("08:31:46:55"), EventKind::Reference, 82),
        ReferencePoint::new(2, at("08:33:52:27"), EventKind::Reference, 82),
        ReferencePoint::new(3, at("08:35:34:18"), EventKind::Reference, 82).control_zone(),
        ReferencePoint::new(4, at("08:38:00:00"), EventKind::Reference, 82),
        ReferencePoint::new(5, at("08:40:00:00"), EventKind::SpeedChangeByReference, 80),
        ReferencePoint::new(6, at("08:42:00:00"), EventKind::SpeedChangeByReference, 82),
    ]
}

/// The dashboard leg as a validated sheet.
pub fn dashboard_route_sheet() -> RouteSheet {
    match RouteSheet::new(DASHBOARD_CHECKPOINT_ID, dashboard_references()) {
        Ok(sheet) => sheet,
        Err(e) => panic!("dashboard fixture is invalid: {}", e),
    }
}

/// A long synthetic leg with a speed change every `run` references.
pub fn synthetic_references(len: usize, run: usize) -> Vec<ReferencePoint> {
    (0..len)
        .map(|i| {
            let kind = if i == 0 { EventKind::StartOfLeg } else { EventKind::Reference };
            let speed = 60 + ((i / run.max(1)) % 5) as u32 * 5;
            reference(i as i32, 3_060_000 + i as i64 * 1_000, kind, speed)
        })
        .collect()
}
