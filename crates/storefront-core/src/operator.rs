//! Run control shared between the tick loop and whoever drives the run.
//!
//! The controller (a Ctrl-C handler, a test, an embedding host) flips a
//! [`RunControl`] published through a `tokio::sync::watch` channel; the
//! loop reads it before every tick and parks on it while paused. Pacing is
//! an atomic so it can be retuned mid-run, and the wall-clock and tick
//! bounds are fixed at construction.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

use crate::config::SimulationBoundsConfig;

/// Reason why the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationEndReason {
    /// The session reached game over.
    GameOver,
    /// Reached the configured `max_ticks` limit.
    MaxTicksReached,
    /// Reached the configured `max_real_time_seconds` limit.
    MaxRealTimeReached,
    /// An operator issued a stop command.
    OperatorStop,
}

/// What the operator wants the loop to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunControl {
    /// Keep ticking.
    Running,
    /// Hold before the next tick.
    Paused,
    /// Finish cleanly before the next tick. Final.
    Stopping,
}

/// Shared operator control state.
#[derive(Debug)]
pub struct OperatorState {
    control: watch::Sender<RunControl>,
    tick_interval_ms: AtomicU64,
    bounds: SimulationBoundsConfig,
    started_at: DateTime<Utc>,
    end_reason: OnceLock<SimulationEndReason>,
}

impl OperatorState {
    /// Create a running operator state with the given pacing and bounds.
    pub fn new(tick_interval_ms: u64, bounds: &SimulationBoundsConfig) -> Self {
        let (control, _) = watch::channel(RunControl::Running);
        Self {
            control,
            tick_interval_ms: AtomicU64::new(tick_interval_ms),
            bounds: bounds.clone(),
            started_at: Utc::now(),
            end_reason: OnceLock::new(),
        }
    }

    /// Current control value.
    pub fn control(&self) -> RunControl {
        *self.control.borrow()
    }

    /// Whether the loop is held before its next tick.
    pub fn is_paused(&self) -> bool {
        self.control() == RunControl::Paused
    }

    /// Whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.control() == RunControl::Stopping
    }

    /// Hold the loop. Ignored once stopping.
    pub fn pause(&self) {
        let changed = self.control.send_if_modified(|c| {
            if *c == RunControl::Running {
                *c = RunControl::Paused;
                true
            } else {
                false
            }
        });
        if changed {
            debug!("Run paused");
        }
    }

    /// Release a held loop. Ignored unless paused.
    pub fn resume(&self) {
        let changed = self.control.send_if_modified(|c| {
            if *c == RunControl::Paused {
                *c = RunControl::Running;
                true
            } else {
                false
            }
        });
        if changed {
            debug!("Run resumed");
        }
    }

    /// Ask the loop to stop. Wakes a paused loop.
    pub fn request_stop(&self) {
        let _ = self.control.send_replace(RunControl::Stopping);
        debug!("Run stop requested");
    }

    /// Park until the loop is no longer paused.
    ///
    /// Returns at once unless paused.
    pub async fn wait_while_paused(&self) {
        let mut rx = self.control.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|c| *c != RunControl::Paused).await;
    }

    /// Record why the run ended. Only the first reason is kept.
    pub fn set_end_reason(&self, reason: SimulationEndReason) {
        let _ = self.end_reason.set(reason);
    }

    /// Why the run ended, if it has.
    pub fn end_reason(&self) -> Option<SimulationEndReason> {
        self.end_reason.get().copied()
    }

    /// Wall-clock milliseconds slept between ticks.
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.load(Ordering::Relaxed)
    }

    /// Change the pacing (0 = flat out) and return the previous value.
    pub fn set_tick_interval_ms(&self, ms: u64) -> u64 {
        self.tick_interval_ms.swap(ms, Ordering::Relaxed)
    }

    /// Whether `current_tick` has hit `max_ticks` (never when 0).
    pub const fn tick_limit_reached(&self, current_tick: u64) -> bool {
        self.bounds.max_ticks != 0 && current_tick >= self.bounds.max_ticks
    }

    /// Whether the wall-clock budget is spent (never when 0).
    pub fn time_limit_reached(&self) -> bool {
        self.bounds.max_real_time_seconds != 0
            && self.elapsed_seconds() >= self.bounds.max_real_time_seconds
    }

    /// When this state was created.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Whole wall-clock seconds since creation; 0 if the clock went back.
    pub fn elapsed_seconds(&self) -> u64 {
        Utc::now()
            .signed_duration_since(self.started_at)
            .to_std()
            .map_or(0, |d| d.as_secs())
    }

    /// Configured tick bound (0 = unlimited).
    pub const fn max_ticks(&self) -> u64 {
        self.bounds.max_ticks
    }

    /// Configured wall-clock bound in seconds (0 = unlimited).
    pub const fn max_real_time_seconds(&self) -> u64 {
        self.bounds.max_real_time_seconds
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn unbounded() -> OperatorState {
        OperatorState::new(0, &SimulationBoundsConfig::default())
    }

    #[test]
    fn starts_running() {
        let state = unbounded();
        assert_eq!(state.control(), RunControl::Running);
        assert!(!state.is_paused());
        assert!(!state.is_stop_requested());
    }

    #[test]
    fn pause_resume_and_stop() {
        let state = unbounded();
        state.pause();
        assert!(state.is_paused());
        state.resume();
        assert_eq!(state.control(), RunControl::Running);

        state.request_stop();
        // Stopping is final.
        state.pause();
        state.resume();
        assert_eq!(state.control(), RunControl::Stopping);
    }

    #[test]
    fn pacing_swaps() {
        let state = OperatorState::new(100, &SimulationBoundsConfig::default());
        assert_eq!(state.set_tick_interval_ms(0), 100);
        assert_eq!(state.tick_interval_ms(), 0);
    }

    #[test]
    fn bounds() {
        let state = unbounded();
        assert!(!state.tick_limit_reached(u64::MAX));
        assert!(!state.time_limit_reached());

        let bounded = OperatorState::new(
            0,
            &SimulationBoundsConfig {
                max_ticks: 100,
                max_real_time_seconds: 0,
            },
        );
        assert!(!bounded.tick_limit_reached(99));
        assert!(bounded.tick_limit_reached(100));
    }

    #[test]
    fn first_end_reason_wins() {
        let state = unbounded();
        assert_eq!(state.end_reason(), None);
        state.set_end_reason(SimulationEndReason::GameOver);
        state.set_end_reason(SimulationEndReason::OperatorStop);
        assert_eq!(state.end_reason(), Some(SimulationEndReason::GameOver));
    }

    #[tokio::test]
    async fn resume_releases_a_waiter() {
        let state = Arc::new(unbounded());
        state.pause();

        let waiter = {
            let state = Arc::clone(&state);
            tokio::spawn(async move { state.wait_while_paused().await })
        };
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        state.resume();
        tokio::time::timeout(std::time::Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn not_paused_returns_at_once() {
        let state = unbounded();
        tokio::time::timeout(std::time::Duration::from_millis(100), state.wait_while_paused())
            .await
            .unwrap();
    }
}
