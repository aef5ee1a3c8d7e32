//! Events emitted by agent steps.
//!
//! An agent step never talks to the session, the UI or the alert surface
//! directly. It returns a list of [`AgentEvent`]s and the tick
//! orchestrator routes them.

use serde::{Deserialize, Serialize};
use storefront_types::{AgentId, AreaId, ItemId};

/// Why a steal attempt took nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StealBlock {
    /// The shelf was already emptied.
    Empty,
    /// The area counter does not name a shelf.
    InvalidArea,
}

/// Something an NPC did during one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentEvent {
    /// The NPC set off towards a route waypoint.
    StartedWalking {
        /// The walking NPC.
        agent: AgentId,
        /// Route index of the new target.
        target: usize,
    },
    /// The NPC arrived at the waypoint it was walking to.
    ReachedWaypoint {
        /// The arriving NPC.
        agent: AgentId,
        /// Route index that was reached.
        index: usize,
    },
    /// The NPC stepped up to a shelf and its area counter advanced.
    EnteredArea {
        /// The NPC at the shelf.
        agent: AgentId,
        /// The new value of its area counter.
        area: AreaId,
    },
    /// The NPC took an item from a shelf.
    Stole {
        /// The thief.
        agent: AgentId,
        /// Shelf the item came from.
        area: AreaId,
        /// The item taken.
        item: ItemId,
        /// How long the NPC lingers at the shelf afterwards.
        dwell_ms: u64,
    },
    /// The NPC won its steal roll but could not take anything.
    StealBlocked {
        /// The would-be thief.
        agent: AgentId,
        /// Area the attempt was made against.
        area: AreaId,
        /// What stopped it.
        reason: StealBlock,
    },
    /// The NPC sped up after its first theft.
    SpeedBoosted {
        /// The NPC.
        agent: AgentId,
        /// Its new speed.
        speed: f64,
    },
    /// The NPC skipped the checkout because it carries loot.
    SkippedCheckout {
        /// The NPC.
        agent: AgentId,
    },
    /// The NPC reached the exit and has terminated.
    Exited {
        /// The departing NPC.
        agent: AgentId,
        /// Whether it left carrying stolen goods.
        stolen: bool,
    },
}
