//! Tunable parameters for NPC customers and child followers.
//!
//! The [`AgentConfig`] struct bundles every per-agent tunable. The engine
//! loads it from the `agents` key of `storefront-config.yaml`; missing
//! keys fall back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Configuration for NPC and follower behaviour.
///
/// Durations are integer milliseconds of simulated time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// How long an NPC stands still after reaching a neutral waypoint or
    /// failing a steal roll (default: 5000).
    pub idle_dwell_ms: u64,

    /// Lower bound of the dwell after a successful theft (default: 10000).
    pub steal_dwell_min_ms: u64,

    /// Upper bound (inclusive) of the dwell after a successful theft
    /// (default: 15000).
    pub steal_dwell_max_ms: u64,

    /// Slowest walking speed drawn at spawn, in units per second (default: 2.0).
    pub min_speed: f64,

    /// Fastest walking speed drawn at spawn, in units per second (default: 3.0).
    pub max_speed: f64,

    /// Lowest per-shelf steal probability drawn at spawn (default: 0.05).
    pub min_steal_chance: f64,

    /// Highest per-shelf steal probability drawn at spawn (default: 0.10).
    pub max_steal_chance: f64,

    /// Speed multiplier applied once, on the first successful theft
    /// (default: 1.5).
    pub speed_boost: f64,

    /// Points the session gains or loses because of this NPC (default: 1).
    pub score_value: i64,

    /// Distance beyond which a child starts following (default: 3.0).
    pub follow_distance: f64,

    /// Distance at or under which a following child stops (default: 2.0).
    pub stop_distance: f64,

    /// Child walking speed in units per second (default: 3.5).
    pub follower_speed: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            idle_dwell_ms: 5000,
            steal_dwell_min_ms: 10_000,
            steal_dwell_max_ms: 15_000,
            min_speed: 2.0,
            max_speed: 3.0,
            min_steal_chance: 0.05,
            max_steal_chance: 0.10,
            speed_boost: 1.5,
            score_value: 1,
            follow_distance: 3.0,
            stop_distance: 2.0,
            follower_speed: 3.5,
        }
    }
}

impl AgentConfig {
    /// Check that every range is ordered and every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidConfig`] naming the first problem found.
    pub fn validate(&self) -> Result<(), AgentError> {
        if self.steal_dwell_min_ms > self.steal_dwell_max_ms {
            return Err(invalid(format!(
                "steal_dwell_min_ms ({}) exceeds steal_dwell_max_ms ({})",
                self.steal_dwell_min_ms, self.steal_dwell_max_ms
            )));
        }
        if !self.min_speed.is_finite() || self.min_speed <= 0.0 {
            return Err(invalid(format!("min_speed must be positive, got {}", self.min_speed)));
        }
        if !self.max_speed.is_finite() || self.min_speed > self.max_speed {
            return Err(invalid(format!(
                "speed range {}..={} is empty",
                self.min_speed, self.max_speed
            )));
        }
        let chance_ok = |c: f64| (0.0..=1.0).contains(&c);
        if !chance_ok(self.min_steal_chance)
            || !chance_ok(self.max_steal_chance)
            || self.min_steal_chance > self.max_steal_chance
        {
            return Err(invalid(format!(
                "steal chance range {}..={} must be ordered within [0, 1]",
                self.min_steal_chance, self.max_steal_chance
            )));
        }
        if !self.speed_boost.is_finite() || self.speed_boost < 1.0 {
            return Err(invalid(format!(
                "speed_boost must be at least 1.0, got {}",
                self.speed_boost
            )));
        }
        if self.score_value < 0 {
            return Err(invalid(format!(
                "score_value must not be negative, got {}",
                self.score_value
            )));
        }
        if !self.stop_distance.is_finite()
            || self.stop_distance < 0.0
            || !self.follow_distance.is_finite()
            || self.stop_distance > self.follow_distance
        {
            return Err(invalid(format!(
                "stop_distance ({}) must be non-negative and not exceed follow_distance ({})",
                self.stop_distance, self.follow_distance
            )));
        }
        if !self.follower_speed.is_finite() || self.follower_speed <= 0.0 {
            return Err(invalid(format!(
                "follower_speed must be positive, got {}",
                self.follower_speed
            )));
        }
        Ok(())
    }
}

fn invalid(reason: String) -> AgentError {
    AgentError::InvalidConfig { reason }
}
