//! The child follower state machine.
//!
//! A [`ChildFollower`] trails one NPC with distance hysteresis: it starts
//! following once the gap grows past `follow_distance` and stops once it
//! closes to `stop_distance`. A follower whose NPC has gone reports
//! [`FollowerStep::TargetLost`] and is expected to be removed.

use storefront_types::{AgentId, FollowerId, FollowerState, Point};
use storefront_world::NavigationPort;
use tracing::trace;

use crate::config::AgentConfig;

/// Outcome of one follower step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowerStep {
    /// The follower is still tracking its NPC.
    Tracking(FollowerState),
    /// The NPC no longer exists; the follower should be removed.
    TargetLost,
}

/// A child attached to one NPC.
#[derive(Debug)]
pub struct ChildFollower {
    id: FollowerId,
    target: AgentId,
    state: FollowerState,
    follow_distance: f64,
    stop_distance: f64,
    navigator: Box<dyn NavigationPort>,
}

impl ChildFollower {
    /// Create an idle follower bound to `target`.
    pub fn new(target: AgentId, mut navigator: Box<dyn NavigationPort>, config: &AgentConfig) -> Self {
        navigator.set_speed(config.follower_speed);
        Self {
            id: FollowerId::new(),
            target,
            state: FollowerState::Idle,
            follow_distance: config.follow_distance,
            stop_distance: config.stop_distance,
            navigator,
        }
    }

    /// Unique identifier of this follower.
    pub const fn id(&self) -> FollowerId {
        self.id
    }

    /// The NPC this follower trails.
    pub const fn target(&self) -> AgentId {
        self.target
    }

    /// Current state.
    pub const fn state(&self) -> FollowerState {
        self.state
    }

    /// Current position as reported by the navigator.
    pub fn position(&self) -> Point {
        self.navigator.position()
    }

    /// Decide whether to follow, then move for `dt_ms`.
    ///
    /// `target_position` is the NPC's current position, or `None` once the
    /// NPC has been removed.
    pub fn step(&mut self, dt_ms: u64, target_position: Option<Point>) -> FollowerStep {
        let Some(target_position) = target_position else {
            trace!(follower_id = %self.id, agent_id = %self.target, "Follower lost its target");
            return FollowerStep::TargetLost;
        };

        let distance = self.navigator.position().distance(target_position);
        match self.state {
            FollowerState::Idle => {
                if distance > self.follow_distance {
                    self.state = FollowerState::Follow;
                    self.navigator.set_destination(target_position);
                }
            }
            FollowerState::Follow => {
                if distance <= self.stop_distance {
                    self.state = FollowerState::Idle;
                    self.navigator.set_destination(self.navigator.position());
                } else {
                    self.navigator.set_destination(target_position);
                }
            }
        }

        // Followers ignore trigger zones.
        let _ = self.navigator.advance(dt_ms);
        FollowerStep::Tracking(self.state)
    }
}
