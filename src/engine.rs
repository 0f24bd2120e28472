//! Tick integrator: the single task that owns calibration state
//!
//! [`PaceEngine::spawn`] starts one task holding the authoritative
//! [`Calibration`]. Operations arrive on an ordered channel and ticks come from
//! a `tokio` interval; both are handled by the same `select!` loop, so no
//! operation can observe a half-applied step. Elapsed time is always measured
//! on the monotonic `tokio` clock.
//!
//! Before applying an operation the task integrates up to "now", so a speed
//! change never alters distance already covered at the old speed and every
//! returned state is current. A copy of the state is published on a watch
//! channel after every operation and after every tick that changed it.

use futures::{Stream, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Instant, MissedTickBehavior, interval};
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, trace, warn};

use crate::calibration::Calibration;
use crate::config::SessionConfig;
use crate::stream::SampleExt;
use crate::types::{CalibrationState, PublishRate};
use crate::{PaceError, Result};

/// Pending operations before callers wait on the channel.
const COMMAND_BUFFER: usize = 64;

/// Operations accepted by the integrator task.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Command {
    Start,
    Stop,
    Toggle,
    SetInstructedSpeed(f64),
    SetCalibrationFactor(f64),
    AdjustCalibrationFactor(f64),
    RecordOdometerReading(f64),
    AdjustOdometer(f64),
    ResetOdometer,
    SoftReset,
    FullReset,
    ArmRaceClock(i64),
    GetState,
}

struct Request {
    command: Command,
    reply: oneshot::Sender<Result<CalibrationState>>,
}

/// Handle to a running tick integrator.
///
/// Cheap to clone. The task stops on [`PaceEngine::shutdown`] or when the last
/// handle is dropped.
#[derive(Clone)]
pub struct PaceEngine {
    commands: mpsc::Sender<Request>,
    states: watch::Receiver<CalibrationState>,
    cancel: CancellationToken,
    tick_hz: f64,
    _guard: Arc<DropGuard>,
}

impl PaceEngine {
    /// Spawn the integrator task on the current `tokio` runtime.
    ///
    /// Fails with [`PaceError::Config`] when called outside a runtime.
    pub fn spawn(config: &SessionConfig) -> Result<Self> {
        config.validate()?;
        let runtime = Handle::try_current()
            .map_err(|e| PaceError::config("runtime", format!("pace engine needs a tokio runtime: {e}")))?;
        let calibration = Calibration::new(config.default_calibration_factor)?;

        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (state_tx, state_rx) = watch::channel(calibration.state());
        let cancel = CancellationToken::new();

        let tick = config.tick_interval();
        let cancel_task = cancel.clone();
        runtime.spawn(async move {
            Self::integrator_task(calibration, tick, command_rx, state_tx, cancel_task).await;
        });

        info!(
            factor = config.default_calibration_factor,
            tick_ms = config.tick_interval_ms,
            "Pace engine started"
        );

        Ok(Self {
            commands: command_tx,
            states: state_rx,
            cancel: cancel.clone(),
            tick_hz: config.tick_hz(),
            _guard: Arc::new(cancel.drop_guard()),
        })
    }

    async fn integrator_task(
        mut calibration: Calibration,
        tick: Duration,
        mut commands: mpsc::Receiver<Request>,
        states: watch::Sender<CalibrationState>,
        cancel: CancellationToken,
    ) {
        let mut ticker = interval(tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_step = Instant::now();
        let mut tick_count = 0u64;

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    debug!("Pace engine cancelled");
                    break;
                }

                request = commands.recv() => {
                    let Some(Request { command, reply }) = request else {
                        debug!("All engine handles dropped");
                        break;
                    };

                    Self::integrate(&mut calibration, &mut last_step);
                    let result = Self::apply(&mut calibration, command);
                    let state = calibration.state();
                    states.send_replace(state);

                    if let Err(e) = &result {
                        warn!(?command, "Rejected engine operation: {}", e);
                    } else {
                        debug!(?command, running = state.is_running, "Applied engine operation");
                    }

                    // Caller may have given up waiting; the state is published either way
                    let _ = reply.send(result.map(|_| state));
                }

                _ = ticker.tick() => {
                    tick_count += 1;
                    Self::integrate(&mut calibration, &mut last_step);
                    let state = calibration.state();
                    states.send_if_modified(|published| {
                        if *published == state {
                            false
                        } else {
                            *published = state;
                            true
                        }
                    });
                    trace!(tick_count, "Engine tick");
                }
            }
        }

        info!("Pace engine stopped after {} ticks", tick_count);
    }

    fn integrate(calibration: &mut Calibration, last_step: &mut Instant) {
        let now = Instant::now();
        calibration.advance(now.saturating_duration_since(*last_step));
        *last_step = now;
    }

    fn apply(calibration: &mut Calibration, command: Command) -> Result<()> {
        match command {
            Command::Start => calibration.start(),
            Command::Stop => calibration.stop(),
            Command::Toggle => {
                calibration.toggle();
            }
            Command::SetInstructedSpeed(kmh) => calibration.set_instructed_speed(kmh),
            Command::SetCalibrationFactor(factor) => {
                calibration.set_calibration_factor(factor)?;
            }
            Command::AdjustCalibrationFactor(delta) => {
                calibration.adjust_calibration_factor(delta)?;
            }
            Command::RecordOdometerReading(meters) => calibration.record_odometer_reading(meters),
            Command::AdjustOdometer(delta) => {
                calibration.adjust_odometer(delta);
            }
            Command::ResetOdometer => calibration.reset_odometer(),
            Command::SoftReset => calibration.soft_reset(),
            Command::FullReset => calibration.full_reset(),
            Command::ArmRaceClock(centiseconds) => calibration.arm_race_clock(centiseconds),
            Command::GetState => {}
        }
        Ok(())
    }

    async fn request(&self, command: Command) -> Result<CalibrationState> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Request { command, reply })
            .await
            .map_err(|_| PaceError::EngineStopped)?;
        response.await.map_err(|_| PaceError::EngineStopped)?
    }

    /// Resume integration from the current values.
    pub async fn start(&self) -> Result<CalibrationState> {
        self.request(Command::Start).await
    }

    /// Freeze values at the last computed point.
    pub async fn stop(&self) -> Result<CalibrationState> {
        self.request(Command::Stop).await
    }

    pub async fn toggle(&self) -> Result<CalibrationState> {
        self.request(Command::Toggle).await
    }

    /// Takes effect on the next integration step. Negative speeds clamp to 0.
    pub async fn set_instructed_speed(&self, kmh: f64) -> Result<CalibrationState> {
        self.request(Command::SetInstructedSpeed(kmh)).await
    }

    /// Fails with [`PaceError::InvalidCalibration`] unless `factor > 0`.
    pub async fn set_calibration_factor(&self, factor: f64) -> Result<CalibrationState> {
        self.request(Command::SetCalibrationFactor(factor)).await
    }

    /// Fails with [`PaceError::InvalidCalibration`] if the result is not positive.
    pub async fn adjust_calibration_factor(&self, delta: f64) -> Result<CalibrationState> {
        self.request(Command::AdjustCalibrationFactor(delta)).await
    }

    pub async fn record_odometer_reading(&self, meters: f64) -> Result<CalibrationState> {
        self.request(Command::RecordOdometerReading(meters)).await
    }

    /// Manual wheel-tick nudge, floored at zero.
    pub async fn adjust_odometer(&self, delta: f64) -> Result<CalibrationState> {
        self.request(Command::AdjustOdometer(delta)).await
    }

    pub async fn reset_odometer(&self) -> Result<CalibrationState> {
        self.request(Command::ResetOdometer).await
    }

    pub async fn soft_reset(&self) -> Result<CalibrationState> {
        self.request(Command::SoftReset).await
    }

    pub async fn full_reset(&self) -> Result<CalibrationState> {
        self.request(Command::FullReset).await
    }

    /// Set the race clock without starting or stopping integration.
    pub async fn arm_race_clock(&self, start_centiseconds: i64) -> Result<CalibrationState> {
        self.request(Command::ArmRaceClock(start_centiseconds)).await
    }

    /// Integrate up to now and return the state.
    pub async fn state(&self) -> Result<CalibrationState> {
        self.request(Command::GetState).await
    }

    /// Last published state, without waiting on the task.
    pub fn latest(&self) -> CalibrationState {
        *self.states.borrow()
    }

    /// Published states, starting with the current one.
    pub fn subscribe(&self, rate: PublishRate) -> impl Stream<Item = CalibrationState> + 'static {
        let states = WatchStream::new(self.states.clone());
        match rate.sample_interval(self.tick_hz) {
            None => states.boxed(),
            Some(period) => states.sample(period).boxed(),
        }
    }

    /// Integrator ticks per second.
    pub fn tick_hz(&self) -> f64 {
        self.tick_hz
    }

    /// Stop the integrator. Later operations fail with [`PaceError::EngineStopped`].
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> PaceEngine {
        PaceEngine::spawn(&SessionConfig::default()).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn spawn_outside_runtime_is_an_error() {
        let err = PaceEngine::spawn(&SessionConfig::default()).err().unwrap();
        assert!(matches!(err, PaceError::Config { ref context, .. } if context == "runtime"));
    }

    #[tokio::test(start_paused = true)]
    async fn saturated_clock_keeps_engine_alive() {
        let engine = engine();
        engine.set_instructed_speed(72.0).await.unwrap();
        engine.arm_race_clock(i64::MAX).await.unwrap();
        engine.start().await.unwrap();
        tokio::time::advance(Duration::from_secs(5)).await;

        let state = engine.state().await.unwrap();
        assert_eq!(state.race_clock_centiseconds, i64::MAX);
        assert!(close(state.raw_distance_meters, 100.0));
    }

    #[tokio::test(start_paused = true)]
    async fn integrates_while_running() {
        let _ = tracing_subscriber::fmt::try_init();
        let engine = engine();

        engine.set_instructed_speed(72.0).await.unwrap();
        engine.start().await.unwrap();
        tokio::time::advance(Duration::from_secs(10)).await;

        let state = engine.state().await.unwrap();
        assert!(state.is_running);
        assert!(close(state.raw_distance_meters, 200.0), "raw = {}", state.raw_distance_meters);
        assert_eq!(state.race_clock_centiseconds, 1000);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_freezes_values() {
        let engine = engine();
        engine.set_instructed_speed(36.0).await.unwrap();
        engine.start().await.unwrap();
        tokio::time::advance(Duration::from_secs(2)).await;
        let stopped = engine.stop().await.unwrap();

        tokio::time::advance(Duration::from_secs(5)).await;
        let later = engine.state().await.unwrap();
        assert_eq!(stopped.raw_distance_meters, later.raw_distance_meters);
        assert_eq!(later.race_clock_centiseconds, 200);

        // resumes from frozen values, no implicit reset
        engine.start().await.unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
        let resumed = engine.state().await.unwrap();
        assert!(close(resumed.raw_distance_meters, 30.0));
        assert_eq!(resumed.race_clock_centiseconds, 300);
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_factor_leaves_state_unchanged() {
        let engine = engine();
        let before = engine.state().await.unwrap();

        let err = engine.set_calibration_factor(-3.0).await.unwrap_err();
        assert!(matches!(err, PaceError::InvalidCalibration { .. }));
        let err = engine.adjust_calibration_factor(-1042.0).await.unwrap_err();
        assert!(matches!(err, PaceError::InvalidCalibration { .. }));

        assert_eq!(engine.state().await.unwrap(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn arm_keeps_integrator_stopped() {
        let engine = engine();
        let state = engine.arm_race_clock(3_060_000).await.unwrap();
        assert!(!state.is_running);
        assert_eq!(state.race_clock_centiseconds, 3_060_000);

        tokio::time::advance(Duration::from_secs(3)).await;
        assert_eq!(engine.state().await.unwrap().race_clock_centiseconds, 3_060_000);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_reports_new_flag() {
        let engine = engine();
        assert!(engine.toggle().await.unwrap().is_running);
        assert!(!engine.toggle().await.unwrap().is_running);
    }

    #[tokio::test(start_paused = true)]
    async fn resets_follow_documented_defaults() {
        let engine = engine();
        engine.set_instructed_speed(82.0).await.unwrap();
        engine.set_calibration_factor(1051.75).await.unwrap();
        engine.record_odometer_reading(500.0).await.unwrap();
        engine.start().await.unwrap();
        tokio::time::advance(Duration::from_secs(20)).await;

        let soft = engine.soft_reset().await.unwrap();
        assert_eq!(soft.calibration_factor, 1051.75);
        assert_eq!(soft.odometer_meters, 500.0);
        assert_eq!(soft.raw_distance_meters, 0.0);
        assert!(!soft.is_running);

        let full = engine.full_reset().await.unwrap();
        assert_eq!(full, CalibrationState::with_factor(1042.0));
    }

    #[tokio::test(start_paused = true)]
    async fn odometer_operations() {
        let engine = engine();
        assert_eq!(engine.adjust_odometer(100.0).await.unwrap().odometer_meters, 100.0);
        assert_eq!(engine.adjust_odometer(-25.0).await.unwrap().odometer_meters, 75.0);
        assert_eq!(engine.adjust_odometer(-500.0).await.unwrap().odometer_meters, 0.0);
        assert_eq!(engine.record_odometer_reading(1234.0).await.unwrap().odometer_meters, 1234.0);
        assert_eq!(engine.reset_odometer().await.unwrap().odometer_meters, 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_published_states() {
        let engine = engine();
        let mut states = Box::pin(engine.subscribe(PublishRate::Native));

        let initial = states.next().await.unwrap();
        assert!(!initial.is_running);

        engine.set_instructed_speed(90.0).await.unwrap();
        engine.start().await.unwrap();

        let mut saw_distance = false;
        for _ in 0..20 {
            let state = states.next().await.unwrap();
            if state.raw_distance_meters > 0.0 {
                saw_distance = true;
                break;
            }
        }
        assert!(saw_distance);
        assert!(engine.latest().is_running);
    }

    #[tokio::test(start_paused = true)]
    async fn sampled_subscription_is_rate_limited() {
        let engine = engine();
        engine.set_instructed_speed(90.0).await.unwrap();
        engine.start().await.unwrap();

        let mut states = Box::pin(engine.subscribe(PublishRate::Max(2)));
        let first = states.next().await.unwrap();
        let second = states.next().await.unwrap();
        let gap = second.race_clock_centiseconds - first.race_clock_centiseconds;
        assert!(gap >= 40, "expected samples about 500 ms apart, got {} cs", gap);
    }

    #[tokio::test(start_paused = true)]
    async fn operations_fail_after_shutdown() {
        let engine = engine();
        engine.shutdown();
        assert!(engine.is_shut_down());
        tokio::task::yield_now().await;

        assert!(matches!(engine.start().await, Err(PaceError::EngineStopped)));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_are_serialized() {
        let engine = engine();
        let mut handles = Vec::new();
        for _ in 0..50 {
            let engine = engine.clone();
            handles.push(tokio::spawn(async move { engine.adjust_odometer(10.0).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(engine.state().await.unwrap().odometer_meters, 500.0);
    }
}
