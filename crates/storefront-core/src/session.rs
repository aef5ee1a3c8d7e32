//! Session counters, phases and the spawn timer.
//!
//! [`SessionController`] is pure bookkeeping: it never creates agents
//! itself. The tick orchestrator asks it whether a spawn is due, reports
//! terminal agent events back to it, and polls the game-over check once
//! per tick after the agents have been stepped.
//!
//! # Invariants
//!
//! - `spawned` is non-decreasing and never exceeds `total_to_spawn`.
//! - `active_count` equals the number of live agents registered through
//!   [`SessionController::try_spawn`].
//! - The phase becomes [`SessionPhase::GameOver`] only when
//!   `spawned == total_to_spawn && active_count == 0`, and stays there until
//!   [`SessionController::reset`].

use serde::{Deserialize, Serialize};
use storefront_types::SessionPhase;
use tracing::{debug, info};

use crate::config::SessionConfig;

/// Errors raised by session bookkeeping.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// An agent was reported gone while no agent was active.
    #[error("active agent count underflow while handling {event}")]
    ActiveUnderflow {
        /// The event that tried to decrement the counter.
        event: &'static str,
    },

    /// A counter or the score would overflow.
    #[error("session counter overflow: {context}")]
    Overflow {
        /// What was being incremented.
        context: &'static str,
    },
}

/// Repeating timer driving spawns: fires after an initial delay, then on a
/// fixed interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnTimer {
    initial_delay_ms: u64,
    interval_ms: u64,
    next_due_ms: Option<u64>,
}

impl SpawnTimer {
    /// Create a disarmed timer.
    pub const fn new(initial_delay_ms: u64, interval_ms: u64) -> Self {
        Self {
            initial_delay_ms,
            interval_ms,
            next_due_ms: None,
        }
    }

    /// Arm the timer so that it first fires `initial_delay_ms` after `now_ms`.
    pub const fn arm(&mut self, now_ms: u64) {
        self.next_due_ms = Some(now_ms.saturating_add(self.initial_delay_ms));
    }

    /// Cancel any pending firing.
    pub const fn disarm(&mut self) {
        self.next_due_ms = None;
    }

    /// Whether the timer is armed.
    pub const fn is_armed(&self) -> bool {
        self.next_due_ms.is_some()
    }

    /// Time of the next firing, if armed.
    pub const fn next_due_ms(&self) -> Option<u64> {
        self.next_due_ms
    }

    /// Fire at most once if due, scheduling the next firing.
    pub const fn poll(&mut self, now_ms: u64) -> bool {
        match self.next_due_ms {
            Some(due) if now_ms >= due => {
                self.next_due_ms = Some(due.saturating_add(self.interval_ms));
                true
            }
            _ => false,
        }
    }
}

/// Snapshot of the session counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Current score.
    pub score: i64,
    /// Spawn budget.
    pub total_to_spawn: u32,
    /// Customers spawned so far.
    pub spawned: u32,
    /// Customers currently in the store.
    pub active_count: u32,
    /// Thieves caught by the player.
    pub caught_count: u32,
    /// Thieves that left with loot.
    pub escaped_count: u32,
    /// Current phase.
    pub phase: SessionPhase,
}

/// Spawn budget, score and tallies for one play session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionController {
    score: i64,
    total_to_spawn: u32,
    spawned: u32,
    active_count: u32,
    caught_count: u32,
    escaped_count: u32,
    phase: SessionPhase,
    timer: SpawnTimer,
}

impl SessionController {
    /// Create a session sitting in the menu.
    pub const fn new(config: &SessionConfig) -> Self {
        Self {
            score: 0,
            total_to_spawn: config.total_to_spawn,
            spawned: 0,
            active_count: 0,
            caught_count: 0,
            escaped_count: 0,
            phase: SessionPhase::Menu,
            timer: SpawnTimer::new(config.spawn_initial_delay_ms, config.spawn_interval_ms),
        }
    }

    /// Current score.
    pub const fn score(&self) -> i64 {
        self.score
    }

    /// Spawn budget for the session.
    pub const fn total_to_spawn(&self) -> u32 {
        self.total_to_spawn
    }

    /// Customers spawned so far.
    pub const fn spawned(&self) -> u32 {
        self.spawned
    }

    /// Customers currently in the store.
    pub const fn active_count(&self) -> u32 {
        self.active_count
    }

    /// Thieves caught by the player.
    pub const fn caught_count(&self) -> u32 {
        self.caught_count
    }

    /// Thieves that left with loot.
    pub const fn escaped_count(&self) -> u32 {
        self.escaped_count
    }

    /// Current lifecycle phase.
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Whether the session has ended.
    pub const fn is_game_over(&self) -> bool {
        matches!(self.phase, SessionPhase::GameOver)
    }

    /// The spawn timer.
    pub const fn timer(&self) -> &SpawnTimer {
        &self.timer
    }

    /// Snapshot of every counter.
    pub const fn stats(&self) -> SessionStats {
        SessionStats {
            score: self.score,
            total_to_spawn: self.total_to_spawn,
            spawned: self.spawned,
            active_count: self.active_count,
            caught_count: self.caught_count,
            escaped_count: self.escaped_count,
            phase: self.phase,
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Leave the menu and arm the spawn timer.
    ///
    /// Returns `false` (and does nothing) unless the session is in the menu.
    pub fn on_play_start(&mut self, now_ms: u64) -> bool {
        if self.phase != SessionPhase::Menu {
            return false;
        }
        self.phase = SessionPhase::Playing;
        self.timer.arm(now_ms);
        info!(
            total_to_spawn = self.total_to_spawn,
            first_spawn_ms = self.timer.next_due_ms(),
            "Play started"
        );
        true
    }

    /// Go back to the menu, cancelling the pending spawn timer.
    ///
    /// Agents already in the store are unaffected. A finished session stays
    /// over.
    pub fn on_return_to_menu(&mut self) {
        self.timer.disarm();
        if self.phase == SessionPhase::Playing {
            self.phase = SessionPhase::Menu;
            info!(spawned = self.spawned, "Returned to menu");
        }
    }

    /// Clear every counter and return to the menu.
    pub fn reset(&mut self) {
        self.score = 0;
        self.spawned = 0;
        self.active_count = 0;
        self.caught_count = 0;
        self.escaped_count = 0;
        self.phase = SessionPhase::Menu;
        self.timer.disarm();
        info!("Session reset");
    }

    // -----------------------------------------------------------------------
    // Spawning
    // -----------------------------------------------------------------------

    /// Whether the spawn timer fired for `now_ms`.
    ///
    /// Only fires while playing.
    pub fn spawn_due(&mut self, now_ms: u64) -> bool {
        self.phase == SessionPhase::Playing && self.timer.poll(now_ms)
    }

    /// Whether the spawn budget has room for another customer.
    pub const fn can_spawn(&self) -> bool {
        !self.is_game_over() && self.spawned < self.total_to_spawn
    }

    /// Register one spawned customer.
    ///
    /// Returns `false` without touching the counters once the budget is
    /// spent. Registering the last customer of the budget disarms the
    /// spawn timer.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Overflow`] if the active count overflows.
    pub fn try_spawn(&mut self) -> Result<bool, SessionError> {
        if !self.can_spawn() {
            return Ok(false);
        }
        let spawned = self
            .spawned
            .checked_add(1)
            .ok_or(SessionError::Overflow { context: "spawned" })?;
        let active = self
            .active_count
            .checked_add(1)
            .ok_or(SessionError::Overflow {
                context: "active_count",
            })?;
        self.spawned = spawned;
        self.active_count = active;
        if self.spawned >= self.total_to_spawn {
            self.timer.disarm();
        }
        debug!(
            spawned = self.spawned,
            active = self.active_count,
            "Customer spawned"
        );
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Terminal events
    // -----------------------------------------------------------------------

    /// A customer walked out of the store.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ActiveUnderflow`] if no agent was active.
    pub fn on_agent_exited(&mut self, stolen: bool) -> Result<(), SessionError> {
        self.active_count = self
            .active_count
            .checked_sub(1)
            .ok_or(SessionError::ActiveUnderflow { event: "exit" })?;
        if stolen {
            self.escaped_count = self
                .escaped_count
                .checked_add(1)
                .ok_or(SessionError::Overflow {
                    context: "escaped_count",
                })?;
        }
        Ok(())
    }

    /// The player caught a thief.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ActiveUnderflow`] if no agent was active.
    pub fn on_agent_caught(&mut self) -> Result<(), SessionError> {
        self.active_count = self
            .active_count
            .checked_sub(1)
            .ok_or(SessionError::ActiveUnderflow { event: "catch" })?;
        self.caught_count = self
            .caught_count
            .checked_add(1)
            .ok_or(SessionError::Overflow {
                context: "caught_count",
            })?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Score
    // -----------------------------------------------------------------------

    /// Add `delta` to the score. Does not clamp; callers guard penalties.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Overflow`] if the score overflows.
    pub fn update_score(&mut self, delta: i64) -> Result<i64, SessionError> {
        self.score = self
            .score
            .checked_add(delta)
            .ok_or(SessionError::Overflow { context: "score" })?;
        Ok(self.score)
    }

    /// Deduct up to `points` without taking the score below zero.
    ///
    /// Skipped entirely when the score is already zero. Returns the points
    /// actually deducted.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Overflow`] if the deduction overflows.
    pub fn apply_penalty(&mut self, points: i64) -> Result<i64, SessionError> {
        if self.score <= 0 || points <= 0 {
            return Ok(0);
        }
        let deducted = points.min(self.score);
        let delta = deducted
            .checked_neg()
            .ok_or(SessionError::Overflow { context: "penalty" })?;
        let _ = self.update_score(delta)?;
        Ok(deducted)
    }

    // -----------------------------------------------------------------------
    // Game over
    // -----------------------------------------------------------------------

    /// End the session once the budget is spent and the store is empty.
    ///
    /// Returns `true` only on the call that ends the session.
    pub fn check_game_over(&mut self) -> bool {
        if self.is_game_over() {
            return false;
        }
        if self.spawned == self.total_to_spawn && self.active_count == 0 {
            self.phase = SessionPhase::GameOver;
            self.timer.disarm();
            info!(
                score = self.score,
                caught = self.caught_count,
                escaped = self.escaped_count,
                "Game over"
            );
            return true;
        }
        false
    }
}
