//! Calibration state and the integration step
//!
//! [`Calibration`] is the authoritative, single-owner state behind the pace
//! engine. It has no notion of wall-clock time: the integrator measures elapsed
//! time on a monotonic clock and feeds it to [`Calibration::advance`].
//!
//! ## Distance model
//!
//! ```text
//! raw       += (speed_kmh / 3.6) * dt
//! corrected  = raw * 1000 / factor
//! ```
//!
//! With this convention the factor recommended at a checkpoint,
//! `raw / odometer * 1000`, is exactly the one for which `corrected` equals the
//! measured odometer distance.
//!
//! ## Live deviation
//!
//! `(odometer - corrected) / (speed_kmh / 3.6)` seconds when the crew is
//! counting odometer distance and an instructed speed is set, else zero.
//! Positive means the car is ahead of the ideal car.

use std::time::Duration;
use tracing::{trace, warn};

use crate::types::CalibrationState;
use crate::{PaceError, Result};

/// km/h to m/s divisor.
pub const KMH_PER_MPS: f64 = 3.6;

/// Mutable calibration state. Single owner; see [`crate::engine`].
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    raw_distance_meters: f64,
    calibration_factor: f64,
    default_factor: f64,
    current_speed_kmh: f64,
    is_running: bool,
    live_deviation: f64,
    odometer_meters: f64,
    race_clock_centiseconds: i64,
    /// Sub-centisecond time not yet added to the race clock
    clock_remainder: f64,
}

impl Calibration {
    /// Fresh state using `default_factor` as the reset value.
    pub fn new(default_factor: f64) -> Result<Self> {
        check_factor(default_factor)?;
        Ok(Self {
            raw_distance_meters: 0.0,
            calibration_factor: default_factor,
            default_factor,
            current_speed_kmh: 0.0,
            is_running: false,
            live_deviation: 0.0,
            odometer_meters: 0.0,
            race_clock_centiseconds: 0,
            clock_remainder: 0.0,
        })
    }

    /// Read-only copy for publication.
    pub fn state(&self) -> CalibrationState {
        CalibrationState {
            raw_distance_meters: self.raw_distance_meters,
            corrected_distance_meters: self.corrected_distance_meters(),
            calibration_factor: self.calibration_factor,
            current_speed_kmh: self.current_speed_kmh,
            is_running: self.is_running,
            live_deviation: self.live_deviation,
            odometer_meters: self.odometer_meters,
            race_clock_centiseconds: self.race_clock_centiseconds,
        }
    }

    pub fn corrected_distance_meters(&self) -> f64 {
        self.raw_distance_meters * 1000.0 / self.calibration_factor
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// One integration step. No-op while stopped.
    pub fn advance(&mut self, dt: Duration) {
        if !self.is_running {
            return;
        }

        let seconds = dt.as_secs_f64();
        self.raw_distance_meters += (self.current_speed_kmh / KMH_PER_MPS) * seconds;

        let centiseconds = self.clock_remainder + seconds * 100.0;
        let whole = centiseconds.round();
        self.clock_remainder = centiseconds - whole;
        self.race_clock_centiseconds = self.race_clock_centiseconds.saturating_add(whole as i64);

        self.refresh_deviation();
        trace!(
            dt_ms = dt.as_millis() as u64,
            raw = self.raw_distance_meters,
            clock = self.race_clock_centiseconds,
            "Integrated"
        );
    }

    pub fn start(&mut self) {
        self.is_running = true;
    }

    pub fn stop(&mut self) {
        self.is_running = false;
    }

    /// Flip the running flag, returning the new value.
    pub fn toggle(&mut self) -> bool {
        self.is_running = !self.is_running;
        self.is_running
    }

    /// Applies from the next step; accumulated distance is untouched.
    pub fn set_instructed_speed(&mut self, kmh: f64) {
        if !kmh.is_finite() {
            warn!(kmh, "Ignoring non-finite instructed speed");
            return;
        }
        self.current_speed_kmh = kmh.max(0.0);
        self.refresh_deviation();
    }

    pub fn set_calibration_factor(&mut self, factor: f64) -> Result<f64> {
        check_factor(factor)?;
        self.calibration_factor = factor;
        self.refresh_deviation();
        Ok(self.calibration_factor)
    }

    pub fn adjust_calibration_factor(&mut self, delta: f64) -> Result<f64> {
        self.set_calibration_factor(self.calibration_factor + delta)
    }

    pub fn record_odometer_reading(&mut self, meters: f64) {
        if !meters.is_finite() {
            warn!(meters, "Ignoring non-finite odometer reading");
            return;
        }
        self.odometer_meters = meters.max(0.0);
        self.refresh_deviation();
    }

    /// Relative nudge, floored at zero. Returns the new reading.
    pub fn adjust_odometer(&mut self, delta: f64) -> f64 {
        if !delta.is_finite() {
            warn!(delta, "Ignoring non-finite odometer adjustment");
            return self.odometer_meters;
        }
        self.odometer_meters = (self.odometer_meters + delta).max(0.0);
        self.refresh_deviation();
        self.odometer_meters
    }

    pub fn reset_odometer(&mut self) {
        self.odometer_meters = 0.0;
        self.refresh_deviation();
    }

    /// Clears distance, clock and running flag. Keeps factor, odometer and speed.
    pub fn soft_reset(&mut self) {
        self.raw_distance_meters = 0.0;
        self.race_clock_centiseconds = 0;
        self.clock_remainder = 0.0;
        self.is_running = false;
        self.live_deviation = 0.0;
    }

    /// Back to the state [`Calibration::new`] produced.
    pub fn full_reset(&mut self) {
        *self = Self {
            raw_distance_meters: 0.0,
            calibration_factor: self.default_factor,
            default_factor: self.default_factor,
            current_speed_kmh: 0.0,
            is_running: false,
            live_deviation: 0.0,
            odometer_meters: 0.0,
            race_clock_centiseconds: 0,
            clock_remainder: 0.0,
        };
    }

    /// Set the race clock without touching the running flag.
    pub fn arm_race_clock(&mut self, start_centiseconds: i64) {
        self.race_clock_centiseconds = start_centiseconds.max(0);
        self.clock_remainder = 0.0;
    }

    fn refresh_deviation(&mut self) {
        let speed_mps = self.current_speed_kmh / KMH_PER_MPS;
        self.live_deviation = if self.odometer_meters > 0.0 && speed_mps > 0.0 {
            (self.odometer_meters - self.corrected_distance_meters()) / speed_mps
        } else {
            0.0
        };
    }
}

fn check_factor(factor: f64) -> Result<()> {
    if factor.is_finite() && factor > 0.0 {
        Ok(())
    } else {
        Err(PaceError::InvalidCalibration { factor })
    }
}
