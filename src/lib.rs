//! Pace timing and correction engine for time-speed-distance rallies.
//!
//! Pacekeeper integrates simulated distance and race time from the instructed
//! speed, lets the crew nudge the calibration factor and the manual odometer
//! while running, and checkpoints the corrected clock against the route sheet.
//!
//! # Features
//!
//! - **Tick integrator**: one owner task, monotonic clock, ordered operations
//! - **Checkpoint corrector**: timing and distance error plus a recommended factor
//! - **Route sheets**: validated reference lists with derived speed segments
//! - **Display projection**: segment window, pace status and row labels
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pacekeeper::{Pacekeeper, PublishRate, SessionConfig};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> pacekeeper::Result<()> {
//!     let mut session = Pacekeeper::open("rally.yaml", 8, SessionConfig::default()).await?;
//!     let mut states = Box::pin(session.engine().subscribe(PublishRate::Max(10)));
//!
//!     // At the scheduled start
//!     session.record_checkpoint(0).await?;
//!
//!     while let Some(state) = states.next().await {
//!         println!("{} m, {:+.1} s", state.corrected_distance_meters, state.live_deviation);
//!     }
//!     Ok(())
//! }
//! ```

// Core types and error handling
mod error;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Engine
pub mod calibration;
pub mod config;
pub mod engine;
pub mod stream;

// Checkpointing
pub mod corrector;
pub mod route_sheet;
pub mod session;

// Collaborators
pub mod source;
pub mod sources;

pub mod projector;

// Core exports
pub use error::*;
pub use types::*;

// Main API exports
pub use config::SessionConfig;
pub use corrector::SnapshotLog;
pub use engine::PaceEngine;
pub use projector::{PaceStatus, PaceView, SegmentWindow};
pub use route_sheet::RouteSheet;
pub use session::{NextCheckpoint, PaceSession};
pub use source::{PreferenceStore, RouteSheetSource};
pub use sources::{MemoryPreferences, MemoryRouteSheets, YamlRouteSheets};

use std::sync::Arc;

/// Entry point for common session setups.
pub struct Pacekeeper;

impl Pacekeeper {
    /// Open a checkpoint from a YAML race book.
    ///
    /// Preferences live in memory for the lifetime of the session.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file is missing or is not a valid race book
    /// - The checkpoint is not in the book
    /// - The configuration does not validate
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use pacekeeper::{Pacekeeper, SessionConfig};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> pacekeeper::Result<()> {
    /// let session = Pacekeeper::open("rally.yaml", 8, SessionConfig::default()).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn open<P: AsRef<std::path::Path>>(
        race_book: P,
        checkpoint_id: i64,
        config: SessionConfig,
    ) -> Result<PaceSession> {
        let sheets = YamlRouteSheets::open(race_book)?;
        PaceSession::open(Arc::new(sheets), Arc::new(MemoryPreferences::new()), checkpoint_id, config)
            .await
    }

    /// Start a bare integrator without route sheets.
    ///
    /// Must be called from within a `tokio` runtime; outside one it returns
    /// [`PaceError::Config`].
    pub fn engine(config: &SessionConfig) -> Result<PaceEngine> {
        PaceEngine::spawn(config)
    }
}
