//! Session clock for the Storefront simulation.
//!
//! The clock is the single source of simulated time. Every tick advances
//! it by a fixed number of milliseconds; dwell timers, the spawn timer and
//! the interaction cooldown all read `elapsed_ms` from here. Wall-clock
//! pacing is the runner's concern and never leaks into the simulation.

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter or elapsed time would overflow.
    #[error("session clock overflow: cannot advance beyond u64::MAX")]
    Overflow,

    /// Invalid clock configuration (e.g. zero tick duration).
    #[error("invalid clock configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Simulated time for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClock {
    /// Number of completed ticks.
    tick: u64,

    /// Simulated milliseconds since the session started.
    elapsed_ms: u64,

    /// Simulated milliseconds covered by one tick.
    tick_duration_ms: u64,
}

impl SessionClock {
    /// Create a clock at time zero.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `tick_duration_ms` is 0.
    pub fn new(tick_duration_ms: u64) -> Result<Self, ClockError> {
        if tick_duration_ms == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "tick_duration_ms must be at least 1".to_owned(),
            });
        }
        Ok(Self {
            tick: 0,
            elapsed_ms: 0,
            tick_duration_ms,
        })
    }

    /// Advance the clock by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::Overflow`] if either counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        let tick = self.tick.checked_add(1).ok_or(ClockError::Overflow)?;
        let elapsed_ms = self
            .elapsed_ms
            .checked_add(self.tick_duration_ms)
            .ok_or(ClockError::Overflow)?;
        self.tick = tick;
        self.elapsed_ms = elapsed_ms;
        Ok(tick)
    }

    /// Return the clock to time zero.
    pub const fn reset(&mut self) {
        self.tick = 0;
        self.elapsed_ms = 0;
    }

    /// Number of completed ticks.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated milliseconds since the session started.
    pub const fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Simulated milliseconds per tick.
    pub const fn tick_duration_ms(&self) -> u64 {
        self.tick_duration_ms
    }
}
