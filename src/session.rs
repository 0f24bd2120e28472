//! Checkpoint session: cursor, record/undo and checkpoint navigation
//!
//! A [`PaceSession`] ties one [`PaceEngine`] to the route sheet of the active
//! checkpoint. It owns the reference cursor and the [`SnapshotLog`]. Methods
//! that touch either take `&mut self`, so recording and undoing can never
//! interleave.
//!
//! ```rust,no_run
//! use pacekeeper::{MemoryPreferences, MemoryRouteSheets, PaceSession, SessionConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> pacekeeper::Result<()> {
//! let sheets = Arc::new(MemoryRouteSheets::new());
//! let prefs = Arc::new(MemoryPreferences::new());
//! let mut session = PaceSession::open(sheets, prefs, 8, SessionConfig::default()).await?;
//!
//! // Crew presses "go" at the scheduled start
//! session.record_checkpoint(0).await?;
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::corrector::{self, SnapshotLog};
use crate::engine::PaceEngine;
use crate::route_sheet::RouteSheet;
use crate::source::{PreferenceStore, RouteSheetSource};
use crate::projector::PaceView;
use crate::types::{CalibrationState, ODOMETER_TICK_KEY, OdometerTick, RaceTime, RecordedSnapshot};
use crate::{PaceError, Result};

/// Start of the checkpoint after the active one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct NextCheckpoint {
    pub checkpoint_id: i64,
    pub start: RaceTime,
}

#[derive(Debug)]
struct ActiveCheckpoint {
    sheet: RouteSheet,
    cursor: usize,
    log: SnapshotLog,
}

/// One crew's timing session over a sequence of checkpoints.
pub struct PaceSession {
    engine: PaceEngine,
    source: Arc<dyn RouteSheetSource>,
    prefs: Arc<dyn PreferenceStore>,
    config: SessionConfig,
    odometer_tick: OdometerTick,
    active: Option<ActiveCheckpoint>,
}

impl PaceSession {
    /// Session with a running engine and no checkpoint loaded.
    pub async fn new(
        source: Arc<dyn RouteSheetSource>,
        prefs: Arc<dyn PreferenceStore>,
        config: SessionConfig,
    ) -> Result<Self> {
        let engine = PaceEngine::spawn(&config)?;
        let odometer_tick = Self::load_odometer_tick(prefs.as_ref(), &config).await?;

        Ok(Self {
            engine,
            source,
            prefs,
            config,
            odometer_tick,
            active: None,
        })
    }

    /// Session with `checkpoint_id` loaded and the engine fully reset.
    pub async fn open(
        source: Arc<dyn RouteSheetSource>,
        prefs: Arc<dyn PreferenceStore>,
        checkpoint_id: i64,
        config: SessionConfig,
    ) -> Result<Self> {
        let mut session = Self::new(source, prefs, config).await?;
        session.load_checkpoint(checkpoint_id).await?;
        Ok(session)
    }

    async fn load_odometer_tick(
        prefs: &dyn PreferenceStore,
        config: &SessionConfig,
    ) -> Result<OdometerTick> {
        let Some(stored) = prefs.get_preference(ODOMETER_TICK_KEY).await? else {
            return Ok(config.default_odometer_tick);
        };

        match stored.parse() {
            Ok(tick) => Ok(tick),
            Err(e) => {
                warn!(
                    value = %stored,
                    fallback = %config.default_odometer_tick,
                    "Ignoring stored odometer tick: {}",
                    e
                );
                Ok(config.default_odometer_tick)
            }
        }
    }

    async fn fetch_sheet(&self, checkpoint_id: i64) -> Result<RouteSheet> {
        let references = self.source.list_references(checkpoint_id).await?;
        RouteSheet::new(checkpoint_id, references)
    }

    /// Load a checkpoint, drop the previous log and fully reset the engine.
    pub async fn load_checkpoint(&mut self, checkpoint_id: i64) -> Result<&RouteSheet> {
        let sheet = self.fetch_sheet(checkpoint_id).await?;
        self.engine.full_reset().await?;
        Ok(self.activate(sheet))
    }

    fn activate(&mut self, sheet: RouteSheet) -> &RouteSheet {
        info!(
            checkpoint = sheet.checkpoint_id(),
            references = sheet.len(),
            segments = sheet.segments().len(),
            "Checkpoint loaded"
        );
        let active = self.active.insert(ActiveCheckpoint {
            sheet,
            cursor: 0,
            log: SnapshotLog::new(),
        });
        &active.sheet
    }

    /// Unload the active checkpoint. The engine keeps its state.
    pub fn close_checkpoint(&mut self) {
        if let Some(active) = self.active.take() {
            debug!(checkpoint = active.sheet.checkpoint_id(), "Checkpoint closed");
        }
    }

    fn active(&self) -> Result<&ActiveCheckpoint> {
        self.active.as_ref().ok_or(PaceError::NoActiveCheckpoint)
    }

    /// Record arrival at the reference under the cursor.
    ///
    /// The first recording of a leg always starts it from the start-of-leg
    /// reference, wherever the cursor is: it arms the race clock to the
    /// scheduled start, logs a zero-diff snapshot and starts the integrator.
    /// Every later recording compares the corrected clock against the
    /// reference under the cursor. Either way the instructed speed becomes the
    /// reference's speed and the cursor moves to the next reference, if any.
    ///
    /// Fails with [`PaceError::InvalidClockCorrection`] when the correction is
    /// out of range; nothing is recorded in that case.
    pub async fn record_checkpoint(
        &mut self,
        clock_correction_centiseconds: i64,
    ) -> Result<RecordedSnapshot> {
        let active = self.active.as_mut().ok_or(PaceError::NoActiveCheckpoint)?;
        if active.sheet.is_empty() {
            return Err(PaceError::EmptyReferenceList {
                checkpoint_id: active.sheet.checkpoint_id(),
            });
        }

        let starting = active.log.is_empty();
        let index = if starting { 0 } else { active.cursor };
        let reference = active.sheet.get(index)?.clone();
        let speed = f64::from(reference.instructed_speed);

        let snapshot = if starting {
            if active.cursor != 0 {
                debug!(cursor = active.cursor, "Leg not started yet, recording the start instead");
            }
            self.engine.arm_race_clock(reference.expected_centiseconds()).await?;
            let state = self.engine.set_instructed_speed(speed).await?;
            let snapshot = corrector::start_of_leg(index, &reference, &state);
            active.log.push(snapshot);
            self.engine.start().await?;
            info!(
                checkpoint = active.sheet.checkpoint_id(),
                start = %reference.time,
                speed = reference.instructed_speed,
                "Leg started"
            );
            snapshot
        } else {
            let state = self.engine.state().await?;
            let snapshot =
                corrector::compare(index, &reference, &state, clock_correction_centiseconds)?;
            active.log.push(snapshot);
            self.engine.set_instructed_speed(speed).await?;
            snapshot
        };

        if index + 1 < active.sheet.len() {
            active.cursor = index + 1;
        }
        Ok(snapshot)
    }

    /// Remove the last snapshot and return the cursor to its reference.
    ///
    /// The start-of-leg snapshot is never removed.
    pub async fn undo_last_checkpoint(&mut self) -> Result<RecordedSnapshot> {
        let active = self.active.as_mut().ok_or(PaceError::NoActiveCheckpoint)?;
        let removed = active.log.undo()?;
        active.cursor = removed.reference_index;

        if let Some(last) = active.log.last() {
            let reference = active.sheet.get(last.reference_index)?;
            self.engine
                .set_instructed_speed(f64::from(reference.instructed_speed))
                .await?;
        }

        debug!(cursor = active.cursor, remaining = active.log.len(), "Checkpoint undone");
        Ok(removed)
    }

    /// Move the cursor without recording.
    pub fn set_cursor(&mut self, index: usize) -> Result<()> {
        let active = self.active.as_mut().ok_or(PaceError::NoActiveCheckpoint)?;
        active.sheet.get(index)?;
        active.cursor = index;
        Ok(())
    }

    pub fn cursor(&self) -> Result<usize> {
        Ok(self.active()?.cursor)
    }

    pub fn route_sheet(&self) -> Result<&RouteSheet> {
        Ok(&self.active()?.sheet)
    }

    pub fn snapshot_log(&self) -> Result<&SnapshotLog> {
        Ok(&self.active()?.log)
    }

    pub fn snapshots(&self) -> &[RecordedSnapshot] {
        self.active.as_ref().map_or(&[], |active| active.log.entries())
    }

    pub fn checkpoint_id(&self) -> Option<i64> {
        self.active.as_ref().map(|active| active.sheet.checkpoint_id())
    }

    /// Set the calibration factor to the most recent recommendation.
    ///
    /// Returns `Ok(None)` when no snapshot has produced one yet.
    pub async fn apply_recommended_factor(&self) -> Result<Option<CalibrationState>> {
        let Some(factor) = self.active()?.log.latest_recommended_factor() else {
            return Ok(None);
        };
        info!(factor, "Applying recommended calibration factor");
        self.engine.set_calibration_factor(factor).await.map(Some)
    }

    /// Dashboard projection of the latest published state, classified with
    /// the configured on-pace tolerance.
    pub fn view(&self) -> Result<PaceView> {
        let active = self.active()?;
        Ok(PaceView::project(
            &active.sheet,
            active.cursor,
            active.log.entries(),
            &self.engine.latest(),
            self.config.on_pace_tolerance_seconds,
        ))
    }

    pub fn odometer_tick(&self) -> OdometerTick {
        self.odometer_tick
    }

    /// Persist a new tick distance.
    pub async fn set_odometer_tick(&mut self, tick: OdometerTick) -> Result<()> {
        self.prefs.set_preference(ODOMETER_TICK_KEY, tick.as_str()).await?;
        debug!(%tick, "Odometer tick changed");
        self.odometer_tick = tick;
        Ok(())
    }

    /// Nudge the odometer by `steps` clicks of the configured tick distance.
    pub async fn tick_odometer(&self, steps: i32) -> Result<CalibrationState> {
        self.engine
            .adjust_odometer(f64::from(steps) * self.odometer_tick.meters())
            .await
    }

    /// Start-of-leg time of the checkpoint that follows the active one.
    pub async fn next_checkpoint_start(&self) -> Result<Option<NextCheckpoint>> {
        let current = self.active()?.sheet.checkpoint_id();
        let Some(checkpoint_id) = self.source.next_checkpoint_id(current).await? else {
            return Ok(None);
        };

        let sheet = self.fetch_sheet(checkpoint_id).await?;
        Ok(sheet.start().map(|start| NextCheckpoint {
            checkpoint_id,
            start: start.time,
        }))
    }

    /// Load the following checkpoint.
    ///
    /// Fully resets the engine unless `carry_calibration_across_checkpoints`
    /// is set, in which case the factor survives a soft reset and the
    /// odometer is zeroed. Returns `Ok(None)` on the last checkpoint.
    pub async fn enter_next_checkpoint(&mut self) -> Result<Option<&RouteSheet>> {
        let current = self.active()?.sheet.checkpoint_id();
        let Some(checkpoint_id) = self.source.next_checkpoint_id(current).await? else {
            debug!(checkpoint = current, "No checkpoint after the active one");
            return Ok(None);
        };

        let sheet = self.fetch_sheet(checkpoint_id).await?;
        if self.config.carry_calibration_across_checkpoints {
            self.engine.soft_reset().await?;
            self.engine.reset_odometer().await?;
        } else {
            self.engine.full_reset().await?;
        }
        Ok(Some(self.activate(sheet)))
    }

    /// Integrator handle for the calibration operations.
    pub fn engine(&self) -> &PaceEngine {
        &self.engine
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

impl std::fmt::Debug for PaceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaceSession")
            .field("checkpoint_id", &self.checkpoint_id())
            .field("cursor", &self.active.as_ref().map(|active| active.cursor))
            .field("snapshots", &self.snapshots().len())
            .field("odometer_tick", &self.odometer_tick)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projector::PaceStatus;
    use crate::sources::{MemoryPreferences, MemoryRouteSheets};
    use crate::types::EventKind;
    use crate::test_utils::{DASHBOARD_CHECKPOINT_ID, dashboard_references, reference};
    use std::time::Duration;

    async fn sheets() -> Arc<MemoryRouteSheets> {
        let sheets = Arc::new(MemoryRouteSheets::new());
        sheets.insert_checkpoint(1, DASHBOARD_CHECKPOINT_ID, dashboard_references()).await;
        sheets
            .insert_checkpoint(
                1,
                9,
                vec![
                    reference(0, 3_240_000, EventKind::StartOfLeg, 70),
                    reference(1, 3_250_000, EventKind::Reference, 70),
                ],
            )
            .await;
        sheets.insert_checkpoint(1, 10, Vec::new()).await;
        sheets
    }

    async fn session_with(config: SessionConfig) -> PaceSession {
        let _ = tracing_subscriber::fmt::try_init();
        PaceSession::open(
            sheets().await,
            Arc::new(MemoryPreferences::new()),
            DASHBOARD_CHECKPOINT_ID,
            config,
        )
        .await
        .unwrap()
    }

    async fn session() -> PaceSession {
        session_with(SessionConfig::default()).await
    }

    #[tokio::test(start_paused = true)]
    async fn start_sequence_arms_and_runs() {
        let mut session = session().await;

        let snapshot = session.record_checkpoint(0).await.unwrap();
        assert_eq!(snapshot.reference_index, 0);
        assert_eq!(snapshot.diff_centiseconds, 0);
        assert_eq!(snapshot.recommended_factor, None);
        assert_eq!(snapshot.expected_centiseconds, 3_060_000);

        let state = session.engine().state().await.unwrap();
        assert!(state.is_running);
        assert_eq!(state.race_clock_centiseconds, 3_060_000);
        assert_eq!(state.current_speed_kmh, 82.0);
        assert_eq!(session.cursor().unwrap(), 1);
        assert_eq!(session.snapshots().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn late_arrival_compares_against_reference() {
        let mut session = session().await;
        session.record_checkpoint(0).await.unwrap();

        // 08:30:00:00 -> 08:31:46:55 is 106.55 s; arrive 4 s late
        tokio::time::advance(Duration::from_millis(110_550)).await;
        let snapshot = session.record_checkpoint(0).await.unwrap();

        assert_eq!(snapshot.reference_index, 1);
        assert_eq!(snapshot.diff_centiseconds, -400);
        assert!((snapshot.diff_meters - (-91.111_111)).abs() < 1e-5);
        assert_eq!(session.cursor().unwrap(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn clock_correction_shifts_recorded_time() {
        let mut session = session().await;
        session.record_checkpoint(0).await.unwrap();
        tokio::time::advance(Duration::from_millis(106_550)).await;

        let snapshot = session.record_checkpoint(-250).await.unwrap();
        assert_eq!(snapshot.diff_centiseconds, 250);
        assert!(snapshot.diff_meters > 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn recording_recommends_factor_from_odometer() {
        let mut session = session().await;
        session.record_checkpoint(0).await.unwrap();
        tokio::time::advance(Duration::from_secs(100)).await;
        session.engine().record_odometer_reading(2000.0).await.unwrap();

        let snapshot = session.record_checkpoint(0).await.unwrap();
        let raw = snapshot.raw_meters_at_recording;
        assert!((raw - 82.0 / 3.6 * 100.0).abs() < 1e-6);
        assert_eq!(snapshot.recommended_factor, Some(raw / 2000.0 * 1000.0));

        let applied = session.apply_recommended_factor().await.unwrap().unwrap();
        assert_eq!(applied.calibration_factor, raw / 2000.0 * 1000.0);
    }

    #[tokio::test(start_paused = true)]
    async fn undo_restores_cursor_then_refuses() {
        let mut session = session().await;
        session.record_checkpoint(0).await.unwrap();
        tokio::time::advance(Duration::from_secs(90)).await;
        session.record_checkpoint(0).await.unwrap();
        assert_eq!(session.cursor().unwrap(), 2);

        let removed = session.undo_last_checkpoint().await.unwrap();
        assert_eq!(removed.reference_index, 1);
        assert_eq!(session.cursor().unwrap(), 1);
        assert_eq!(session.snapshots().len(), 1);

        let err = session.undo_last_checkpoint().await.unwrap_err();
        assert!(matches!(err, PaceError::CannotUndo { snapshots: 1 }));
        assert_eq!(session.cursor().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn speed_follows_recorded_reference() {
        let mut session = session().await;
        session.record_checkpoint(0).await.unwrap();
        session.set_cursor(5).unwrap();
        session.record_checkpoint(0).await.unwrap();
        assert_eq!(session.engine().latest().current_speed_kmh, 80.0);
        assert_eq!(session.cursor().unwrap(), 6);

        session.record_checkpoint(0).await.unwrap();
        assert_eq!(session.engine().latest().current_speed_kmh, 82.0);
        // last reference keeps the cursor in place
        assert_eq!(session.cursor().unwrap(), 6);

        session.undo_last_checkpoint().await.unwrap();
        assert_eq!(session.engine().latest().current_speed_kmh, 80.0);
    }

    #[tokio::test(start_paused = true)]
    async fn first_recording_always_starts_the_leg() {
        let mut session = session().await;
        session.set_cursor(3).unwrap();

        let start = session.record_checkpoint(0).await.unwrap();
        assert_eq!(start.reference_index, 0);
        assert_eq!(start.diff_centiseconds, 0);
        assert_eq!(start.recommended_factor, None);

        let state = session.engine().state().await.unwrap();
        assert!(state.is_running);
        assert_eq!(state.race_clock_centiseconds, 3_060_000);
        assert_eq!(session.cursor().unwrap(), 1);

        // the next recording compares as usual and can be undone
        tokio::time::advance(Duration::from_secs(100)).await;
        let first = session.record_checkpoint(0).await.unwrap();
        assert_eq!(first.reference_index, 1);
        assert_eq!(session.undo_last_checkpoint().await.unwrap().reference_index, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn extreme_clock_correction_is_rejected() {
        let mut session = session().await;
        session.record_checkpoint(0).await.unwrap();

        for offset in [i64::MAX, i64::MIN, 8_640_001] {
            let err = session.record_checkpoint(offset).await.unwrap_err();
            assert!(matches!(err, PaceError::InvalidClockCorrection { .. }));
        }
        assert_eq!(session.snapshots().len(), 1);
        assert_eq!(session.cursor().unwrap(), 1);

        // engine is still alive and the next recording works
        let snapshot = session.record_checkpoint(-100).await.unwrap();
        assert_eq!(snapshot.reference_index, 1);
        assert!(session.engine().latest().is_running);
    }

    #[tokio::test(start_paused = true)]
    async fn view_uses_configured_tolerance() {
        let config = SessionConfig { on_pace_tolerance_seconds: 10.0, ..SessionConfig::default() };
        let mut session = session_with(config).await;
        session.record_checkpoint(0).await.unwrap();
        tokio::time::advance(Duration::from_secs(100)).await;

        let state = session.engine().state().await.unwrap();
        // 5 s ahead of the ideal car
        session
            .engine()
            .record_odometer_reading(state.corrected_distance_meters + 5.0 * 82.0 / 3.6)
            .await
            .unwrap();

        let view = session.view().unwrap();
        assert_eq!(view.status, PaceStatus::OnPace);
        assert_eq!(view.rows.reference, Some(1));
        assert_eq!(view.rows.snapshot, Some(0));

        session.close_checkpoint();
        assert!(matches!(session.view(), Err(PaceError::NoActiveCheckpoint)));
    }

    #[tokio::test(start_paused = true)]
    async fn cursor_bounds_are_checked() {
        let mut session = session().await;
        let err = session.set_cursor(7).unwrap_err();
        assert!(matches!(err, PaceError::ReferenceIndexOutOfRange { index: 7, len: 7 }));
        assert_eq!(session.cursor().unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn operations_need_a_checkpoint() {
        let mut session = PaceSession::new(
            sheets().await,
            Arc::new(MemoryPreferences::new()),
            SessionConfig::default(),
        )
        .await
        .unwrap();

        assert!(matches!(session.record_checkpoint(0).await, Err(PaceError::NoActiveCheckpoint)));
        assert!(matches!(session.undo_last_checkpoint().await, Err(PaceError::NoActiveCheckpoint)));
        assert!(matches!(session.next_checkpoint_start().await, Err(PaceError::NoActiveCheckpoint)));
        assert!(session.snapshots().is_empty());

        session.load_checkpoint(10).await.unwrap();
        let err = session.record_checkpoint(0).await.unwrap_err();
        assert!(matches!(err, PaceError::EmptyReferenceList { checkpoint_id: 10 }));
    }

    #[tokio::test(start_paused = true)]
    async fn odometer_tick_preference_round_trips() {
        let prefs = Arc::new(MemoryPreferences::new());
        prefs.set_preference(ODOMETER_TICK_KEY, "furlong").await.unwrap();

        let mut session =
            PaceSession::open(sheets().await, prefs.clone(), 8, SessionConfig::default())
                .await
                .unwrap();
        assert_eq!(session.odometer_tick(), OdometerTick::Meters100);

        session.set_odometer_tick(OdometerTick::Meters25).await.unwrap();
        assert_eq!(
            prefs.get_preference(ODOMETER_TICK_KEY).await.unwrap().as_deref(),
            Some("25m")
        );

        assert_eq!(session.tick_odometer(3).await.unwrap().odometer_meters, 75.0);
        assert_eq!(session.tick_odometer(-1).await.unwrap().odometer_meters, 50.0);
        assert_eq!(session.tick_odometer(-9).await.unwrap().odometer_meters, 0.0);

        let reopened = PaceSession::open(sheets().await, prefs, 8, SessionConfig::default())
            .await
            .unwrap();
        assert_eq!(reopened.odometer_tick(), OdometerTick::Meters25);
    }

    #[tokio::test(start_paused = true)]
    async fn next_checkpoint_lookup() {
        let session = session().await;
        let next = session.next_checkpoint_start().await.unwrap().unwrap();
        assert_eq!(next.checkpoint_id, 9);
        assert_eq!(next.start.to_string(), "09:00:00:00");
    }

    #[tokio::test(start_paused = true)]
    async fn entering_next_checkpoint_fully_resets() {
        let mut session = session().await;
        session.engine().set_calibration_factor(1060.0).await.unwrap();
        session.engine().record_odometer_reading(800.0).await.unwrap();
        session.record_checkpoint(0).await.unwrap();

        let sheet = session.enter_next_checkpoint().await.unwrap().unwrap();
        assert_eq!(sheet.checkpoint_id(), 9);
        assert_eq!(session.cursor().unwrap(), 0);
        assert!(session.snapshots().is_empty());
        assert_eq!(session.engine().latest(), CalibrationState::with_factor(1042.0));

        // 10 is empty and last in the race
        session.enter_next_checkpoint().await.unwrap().unwrap();
        assert!(session.enter_next_checkpoint().await.unwrap().is_none());
        assert_eq!(session.checkpoint_id(), Some(10));
    }

    #[tokio::test(start_paused = true)]
    async fn carrying_calibration_keeps_factor() {
        let config = SessionConfig {
            carry_calibration_across_checkpoints: true,
            ..SessionConfig::default()
        };
        let mut session = session_with(config).await;
        session.engine().set_calibration_factor(1060.0).await.unwrap();
        session.engine().record_odometer_reading(800.0).await.unwrap();
        session.record_checkpoint(0).await.unwrap();

        session.enter_next_checkpoint().await.unwrap().unwrap();
        let state = session.engine().latest();
        assert_eq!(state.calibration_factor, 1060.0);
        assert_eq!(state.odometer_meters, 0.0);
        assert_eq!(state.race_clock_centiseconds, 0);
        assert!(!state.is_running);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_checkpoint_fails_to_open() {
        let result = PaceSession::open(
            sheets().await,
            Arc::new(MemoryPreferences::new()),
            404,
            SessionConfig::default(),
        )
        .await;
        assert!(matches!(result, Err(PaceError::Source { .. })));
    }
}
