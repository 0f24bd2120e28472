//! Error types for the pace engine.
//!
//! Every error here is local and recoverable: the operation that produced it is
//! rejected, engine and session state are left untouched, and the caller can
//! re-issue the operation once the input is fixed.
//!
//! ## Error Categories
//!
//! - **Calibration Errors**: non-positive or non-finite calibration factors
//! - **Checkpoint Errors**: no checkpoint loaded, empty route sheet, index out of range, undo
//! - **Route Sheet Errors**: reference lists that break ordering invariants
//! - **Collaborator Errors**: failures reported by the route-sheet or preference store
//! - **Engine Errors**: the integrator task is no longer running
//!
//! ```rust
//! use pacekeeper::PaceError;
//!
//! let error = PaceError::CannotUndo { snapshots: 1 };
//! assert!(error.is_recoverable());
//! for suggestion in error.recovery_suggestions() {
//!     println!("  - {}", suggestion);
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pace operations.
pub type Result<T, E = PaceError> = std::result::Result<T, E>;

/// Main error type for pace operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PaceError {
    #[error("Invalid calibration factor {factor}: must be finite and greater than zero")]
    InvalidCalibration { factor: f64 },

    #[error("No checkpoint is loaded")]
    NoActiveCheckpoint,

    #[error("Checkpoint {checkpoint_id} has no reference points")]
    EmptyReferenceList { checkpoint_id: i64 },

    #[error("Cannot undo: only {snapshots} snapshot(s) recorded")]
    CannotUndo { snapshots: usize },

    #[error("Reference index {index} out of range (route sheet has {len} references)")]
    ReferenceIndexOutOfRange { index: usize, len: usize },

    #[error("Clock correction of {centiseconds} centiseconds is out of range")]
    InvalidClockCorrection { centiseconds: i64 },

    #[error("Invalid route sheet: {reason}")]
    InvalidRouteSheet { reason: String },

    #[error("Invalid preference value '{value}' for '{key}'")]
    InvalidPreference { key: String, value: String },

    #[error("Route sheet source failed: {reason}")]
    Source {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Configuration error in {context}: {details}")]
    Config { context: String, details: String },

    #[error("File error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Pace engine is not running")]
    EngineStopped,
}

impl PaceError {
    /// Returns whether the caller can fix the input and re-issue the operation.
    ///
    /// Only a stopped engine requires building a new one.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, PaceError::EngineStopped)
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            PaceError::InvalidCalibration { .. } => vec![
                "Use a calibration factor greater than zero",
                "Use a smaller adjustment step",
            ],
            PaceError::NoActiveCheckpoint => vec!["Load a checkpoint before recording"],
            PaceError::EmptyReferenceList { .. } => {
                vec!["Add at least a start-of-leg reference to the checkpoint"]
            }
            PaceError::CannotUndo { .. } => {
                vec!["The start-of-leg snapshot cannot be undone", "Reload the checkpoint to restart the leg"]
            }
            PaceError::ReferenceIndexOutOfRange { .. } => {
                vec!["Select a reference inside the route sheet"]
            }
            PaceError::InvalidClockCorrection { .. } => {
                vec!["Enter a clock correction of less than a day"]
            }
            PaceError::InvalidRouteSheet { .. } => vec![
                "Make the first reference a start-of-leg (LAR)",
                "Keep reference times strictly increasing",
                "Keep order indexes unique",
            ],
            PaceError::InvalidPreference { .. } => {
                vec!["Use one of the supported tick distances: 100m, 50m, 25m"]
            }
            PaceError::Source { .. } => {
                vec!["Check the route sheet store is reachable", "Retry the operation"]
            }
            PaceError::Config { .. } => {
                vec!["Check the configuration file syntax", "Remove unknown or invalid values"]
            }
            PaceError::File { .. } => {
                vec!["Check the file exists and is readable", "Check file permissions"]
            }
            PaceError::EngineStopped => vec!["Open a new session"],
        }
    }

    /// Helper constructor for collaborator failures.
    pub fn source_failed(reason: impl Into<String>) -> Self {
        PaceError::Source { reason: reason.into(), source: None }
    }

    /// Helper constructor for collaborator failures with an underlying cause.
    pub fn source_failed_with(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        PaceError::Source { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for route sheet invariant violations.
    pub fn invalid_route_sheet(reason: impl Into<String>) -> Self {
        PaceError::InvalidRouteSheet { reason: reason.into() }
    }

    /// Helper constructor for configuration errors.
    pub fn config(context: impl Into<String>, details: impl Into<String>) -> Self {
        PaceError::Config { context: context.into(), details: details.into() }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        PaceError::File { path, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn messages_carry_their_context(
            factor in -1.0e6f64..0.0,
            index in 0usize..1000,
            len in 0usize..1000,
            reason in "[a-z ]{1,40}",
        ) {
            let calibration = PaceError::InvalidCalibration { factor }.to_string();
            prop_assert!(calibration.contains(&factor.to_string()));

            let range = PaceError::ReferenceIndexOutOfRange { index, len }.to_string();
            prop_assert!(range.contains(&index.to_string()));
            prop_assert!(range.contains(&len.to_string()));

            let sheet = PaceError::invalid_route_sheet(reason.clone()).to_string();
            prop_assert!(sheet.contains(&reason));
        }
    }

    #[test]
    fn source_chain_is_preserved() {
        let io = std::io::Error::other("disk unplugged");
        let error = PaceError::source_failed_with("list references", Box::new(io));

        let source = std::error::Error::source(&error).expect("source should be attached");
        assert_eq!(source.to_string(), "disk unplugged");
    }

    #[test]
    fn only_stopped_engine_is_unrecoverable() {
        assert!(PaceError::NoActiveCheckpoint.is_recoverable());
        assert!(PaceError::CannotUndo { snapshots: 1 }.is_recoverable());
        assert!(PaceError::InvalidCalibration { factor: 0.0 }.is_recoverable());
        assert!(!PaceError::EngineStopped.is_recoverable());
    }

    #[test]
    fn every_variant_has_suggestions() {
        let errors = [
            PaceError::InvalidCalibration { factor: -1.0 },
            PaceError::NoActiveCheckpoint,
            PaceError::EmptyReferenceList { checkpoint_id: 3 },
            PaceError::CannotUndo { snapshots: 1 },
            PaceError::ReferenceIndexOutOfRange { index: 9, len: 2 },
            PaceError::InvalidClockCorrection { centiseconds: i64::MAX },
            PaceError::invalid_route_sheet("bad"),
            PaceError::InvalidPreference { key: "k".into(), value: "v".into() },
            PaceError::source_failed("down"),
            PaceError::config("yaml", "bad indent"),
            PaceError::file_error(PathBuf::from("/nope"), std::io::Error::other("x")),
            PaceError::EngineStopped,
        ];

        for error in &errors {
            assert!(!error.recovery_suggestions().is_empty(), "{error} has no suggestions");
        }
    }

    #[test]
    fn error_is_send_sync_static() {
        fn assert_send_sync_static<T: Send + Sync + 'static>() {}
        assert_send_sync_static::<PaceError>();
    }
}
