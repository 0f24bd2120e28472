//! Session configuration
//!
//! Defaults for the engine and session. A config value is passed into
//! construction; nothing here is process-wide.
//!
//! ```rust
//! use pacekeeper::SessionConfig;
//!
//! let config = SessionConfig::from_yaml_str("default_calibration_factor: 1050.5\n").unwrap();
//! assert_eq!(config.default_calibration_factor, 1050.5);
//! assert_eq!(config.tick_interval_ms, 50);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::types::OdometerTick;
use crate::{PaceError, Result};

/// Calibration factor used until the crew tunes one.
pub const DEFAULT_CALIBRATION_FACTOR: f64 = 1042.0;

/// Integrator tick period.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 50;

/// Configuration for a pace session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Factor restored by a full reset
    pub default_calibration_factor: f64,
    /// Tick distance used when no preference is stored
    pub default_odometer_tick: OdometerTick,
    /// Integrator tick period in milliseconds
    pub tick_interval_ms: u64,
    /// Deviation band (seconds) reported as on pace
    pub on_pace_tolerance_seconds: f64,
    /// Keep the tuned factor and soft reset when moving to the next checkpoint
    pub carry_calibration_across_checkpoints: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_calibration_factor: DEFAULT_CALIBRATION_FACTOR,
            default_odometer_tick: OdometerTick::Meters100,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            on_pace_tolerance_seconds: 0.1,
            carry_calibration_across_checkpoints: false,
        }
    }
}

impl SessionConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: SessionConfig = serde_yaml_ng::from_str(yaml)
            .map_err(|e| PaceError::config("session config", e.to_string()))?;
        config.validate()?;
        debug!(?config, "Loaded session config");
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| PaceError::file_error(path.to_path_buf(), e))?;
        Self::from_yaml_str(&yaml)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        let factor = self.default_calibration_factor;
        if !factor.is_finite() || factor <= 0.0 {
            return Err(PaceError::InvalidCalibration { factor });
        }
        if self.tick_interval_ms == 0 {
            return Err(PaceError::config("tick_interval_ms", "must be greater than zero"));
        }
        if !self.on_pace_tolerance_seconds.is_finite() || self.on_pace_tolerance_seconds < 0.0 {
            return Err(PaceError::config("on_pace_tolerance_seconds", "must be a non-negative number"));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Integrator ticks per second.
    pub fn tick_hz(&self) -> f64 {
        1000.0 / self.tick_interval_ms as f64
    }
}
