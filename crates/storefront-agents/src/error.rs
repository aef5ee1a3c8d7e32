//! Error types for the storefront-agents crate.
//!
//! Steal attempts that find an empty shelf or an unknown area are not
//! errors: they surface as [`StealBlock`](crate::events::StealBlock)
//! events and leave the agent untouched. Only configuration mistakes and
//! broken shared state propagate as [`AgentError`].

use storefront_world::WorldError;

/// Errors that can occur during agent operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The agent configuration is inconsistent (e.g. `min_speed > max_speed`).
    #[error("invalid agent config: {reason}")]
    InvalidConfig {
        /// Description of what is wrong.
        reason: String,
    },

    /// A world operation failed in a way that cannot be treated as a no-op.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// An arithmetic overflow occurred while advancing agent state.
    #[error("arithmetic overflow in agent step: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },
}
