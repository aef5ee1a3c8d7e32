//! The player's interact action.
//!
//! [`InteractionGate`] resolves one interact request against an optional
//! target. A thief is caught and scores; an honest customer costs points
//! (never below zero). Every accepted request, including one without a
//! target, starts a cooldown during which further requests are ignored.

use serde::{Deserialize, Serialize};
use storefront_types::AgentId;
use tracing::debug;

use crate::session::{SessionController, SessionError};

/// What the gate needs to know about the agent being interacted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionTarget {
    /// The agent.
    pub agent: AgentId,
    /// Whether it carries stolen goods.
    pub stolen: bool,
    /// Points it is worth.
    pub score_value: i64,
}

/// Result of one interact request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum InteractionOutcome {
    /// The request arrived during the cooldown and was ignored.
    CoolingDown,
    /// Nobody was in reach.
    NoTarget,
    /// A thief was caught. The caller must remove the agent.
    Caught {
        /// The thief.
        agent: AgentId,
        /// Points awarded.
        points: i64,
    },
    /// An honest customer was accused.
    FalseAccusation {
        /// The customer.
        agent: AgentId,
        /// Points actually deducted (0 when the score was already 0).
        penalty: i64,
    },
}

/// Cooldown-guarded interaction resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionGate {
    cooldown_ms: u64,
    blocked_until_ms: Option<u64>,
}

impl InteractionGate {
    /// Create a gate with the given cooldown.
    pub const fn new(cooldown_ms: u64) -> Self {
        Self {
            cooldown_ms,
            blocked_until_ms: None,
        }
    }

    /// Lockout applied after each accepted request.
    pub const fn cooldown_ms(&self) -> u64 {
        self.cooldown_ms
    }

    /// Whether a request at `now_ms` would be ignored.
    pub const fn is_cooling_down(&self, now_ms: u64) -> bool {
        match self.blocked_until_ms {
            Some(until) => now_ms <= until,
            None => false,
        }
    }

    /// Forget any running cooldown.
    pub const fn reset(&mut self) {
        self.blocked_until_ms = None;
    }

    /// Resolve an interact request at `now_ms` and apply its score effects.
    ///
    /// # Errors
    ///
    /// Propagates [`SessionError`] from the score and tally updates.
    pub fn interact(
        &mut self,
        now_ms: u64,
        target: Option<InteractionTarget>,
        session: &mut SessionController,
    ) -> Result<InteractionOutcome, SessionError> {
        if self.is_cooling_down(now_ms) {
            return Ok(InteractionOutcome::CoolingDown);
        }
        self.blocked_until_ms = Some(now_ms.saturating_add(self.cooldown_ms));

        let Some(target) = target else {
            return Ok(InteractionOutcome::NoTarget);
        };

        if target.stolen {
            let _ = session.update_score(target.score_value)?;
            session.on_agent_caught()?;
            debug!(agent_id = %target.agent, score = session.score(), "Thief caught");
            Ok(InteractionOutcome::Caught {
                agent: target.agent,
                points: target.score_value,
            })
        } else {
            let penalty = session.apply_penalty(target.score_value)?;
            debug!(agent_id = %target.agent, penalty, score = session.score(), "False accusation");
            Ok(InteractionOutcome::FalseAccusation {
                agent: target.agent,
                penalty,
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;

    fn playing_session() -> SessionController {
        let mut session = SessionController::new(&SessionConfig::default());
        let _ = session.on_play_start(0);
        let _ = session.try_spawn().unwrap();
        session
    }

    fn target(stolen: bool) -> InteractionTarget {
        InteractionTarget {
            agent: AgentId::new(),
            stolen,
            score_value: 1,
        }
    }

    #[test]
    fn catching_a_thief_scores() {
        let mut gate = InteractionGate::new(1000);
        let mut session = playing_session();
        let thief = target(true);

        let outcome = gate.interact(0, Some(thief), &mut session).unwrap();
        assert_eq!(
            outcome,
            InteractionOutcome::Caught {
                agent: thief.agent,
                points: 1
            }
        );
        assert_eq!(session.score(), 1);
        assert_eq!(session.caught_count(), 1);
        assert_eq!(session.active_count(), 0);
    }

    #[test]
    fn false_accusation_at_zero_is_waived() {
        let mut gate = InteractionGate::new(1000);
        let mut session = playing_session();

        let outcome = gate.interact(0, Some(target(false)), &mut session).unwrap();
        assert!(matches!(
            outcome,
            InteractionOutcome::FalseAccusation { penalty: 0, .. }
        ));
        assert_eq!(session.score(), 0);
        assert_eq!(session.active_count(), 1);
    }

    #[test]
    fn false_accusation_deducts_when_score_allows() {
        let mut gate = InteractionGate::new(1000);
        let mut session = playing_session();
        let _ = session.update_score(3).unwrap();

        let outcome = gate.interact(0, Some(target(false)), &mut session).unwrap();
        assert!(matches!(
            outcome,
            InteractionOutcome::FalseAccusation { penalty: 1, .. }
        ));
        assert_eq!(session.score(), 2);
    }

    #[test]
    fn second_request_one_cooldown_later_is_ignored() {
        let mut gate = InteractionGate::new(1000);
        let mut session = playing_session();
        let _ = session.try_spawn().unwrap();

        let first = gate.interact(0, Some(target(true)), &mut session).unwrap();
        assert!(matches!(first, InteractionOutcome::Caught { .. }));

        let second = gate.interact(1000, Some(target(true)), &mut session).unwrap();
        assert_eq!(second, InteractionOutcome::CoolingDown);
        assert_eq!(session.score(), 1);

        let third = gate.interact(1001, Some(target(true)), &mut session).unwrap();
        assert!(matches!(third, InteractionOutcome::Caught { .. }));
        assert_eq!(session.score(), 2);
    }

    #[test]
    fn empty_request_still_starts_cooldown() {
        let mut gate = InteractionGate::new(500);
        let mut session = playing_session();

        assert_eq!(
            gate.interact(0, None, &mut session).unwrap(),
            InteractionOutcome::NoTarget
        );
        assert!(gate.is_cooling_down(500));
        assert!(!gate.is_cooling_down(501));

        gate.reset();
        assert!(!gate.is_cooling_down(0));
    }
}
