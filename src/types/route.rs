//! Route-sheet reference points and derived speed segments

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::RaceTime;
use crate::PaceError;

/// What a reference point instructs the crew to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum EventKind {
    /// Start of the leg (LAR)
    #[serde(rename = "LAR")]
    StartOfLeg,
    /// Plain timed reference (REF)
    #[serde(rename = "REF")]
    Reference,
    /// Advance the schedule by `extra_value` seconds (ADL)
    #[serde(rename = "ADL")]
    AdvanceSeconds,
    /// Delay the schedule by `extra_value` seconds (ATR)
    #[serde(rename = "ATR")]
    DelaySeconds,
    /// Speed change at a time (CVT)
    #[serde(rename = "CVT")]
    SpeedChangeByTime,
    /// Speed change after `extra_value` kilometers (CVD)
    #[serde(rename = "CVD")]
    SpeedChangeByDistance,
    /// Speed change at a reference (CVR)
    #[serde(rename = "CVR")]
    SpeedChangeByReference,
}

impl EventKind {
    /// Route-sheet code for this kind.
    pub fn code(self) -> &'static str {
        match self {
            EventKind::StartOfLeg => "LAR",
            EventKind::Reference => "REF",
            EventKind::AdvanceSeconds => "ADL",
            EventKind::DelaySeconds => "ATR",
            EventKind::SpeedChangeByTime => "CVT",
            EventKind::SpeedChangeByDistance => "CVD",
            EventKind::SpeedChangeByReference => "CVR",
        }
    }

    /// Whether `extra_value` carries meaning for this kind.
    pub fn uses_extra_value(self) -> bool {
        matches!(
            self,
            EventKind::AdvanceSeconds | EventKind::DelaySeconds | EventKind::SpeedChangeByDistance
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for EventKind {
    type Err = PaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LAR" => Ok(EventKind::StartOfLeg),
            "REF" => Ok(EventKind::Reference),
            "ADL" => Ok(EventKind::AdvanceSeconds),
            "ATR" => Ok(EventKind::DelaySeconds),
            "CVT" => Ok(EventKind::SpeedChangeByTime),
            "CVD" => Ok(EventKind::SpeedChangeByDistance),
            "CVR" => Ok(EventKind::SpeedChangeByReference),
            other => Err(PaceError::invalid_route_sheet(format!("unknown event kind '{}'", other))),
        }
    }
}

/// One timed instruction on a checkpoint's route sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct ReferencePoint {
    /// Position on the sheet, unique per checkpoint
    pub order_index: i32,
    /// Scheduled time at this point
    pub time: RaceTime,
    /// Instruction kind
    pub kind: EventKind,
    /// Speed to hold from this point on (km/h)
    pub instructed_speed: u32,
    /// Seconds for ADL/ATR, kilometers for CVD
    pub extra_value: Option<f64>,
    /// Timing-control location (display only)
    pub is_control_zone: bool,
}

impl ReferencePoint {
    /// Shorthand for a reference without extra value or control-zone flag.
    pub fn new(order_index: i32, time: RaceTime, kind: EventKind, instructed_speed: u32) -> Self {
        Self { order_index, time, kind, instructed_speed, extra_value: None, is_control_zone: false }
    }

    /// Attach an extra value.
    pub fn with_extra(mut self, extra_value: f64) -> Self {
        self.extra_value = Some(extra_value);
        self
    }

    /// Flag as a control zone.
    pub fn control_zone(mut self) -> Self {
        self.is_control_zone = true;
        self
    }

    /// Scheduled arrival in centiseconds.
    pub fn expected_centiseconds(&self) -> i64 {
        self.time.to_centiseconds()
    }
}

/// A run of consecutive references sharing one instructed speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct SpeedSegment {
    /// Instructed speed (km/h)
    pub speed: u32,
    /// Index of the reference where the run begins
    pub start_reference_index: usize,
}
