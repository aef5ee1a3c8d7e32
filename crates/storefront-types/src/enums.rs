//! Enumeration types for the Storefront simulation.
//!
//! State tags for the two per-entity state machines, waypoint tags, the
//! session phase, and the zone signals a navigation host delivers.

use serde::{Deserialize, Serialize};

use crate::ids::WaypointId;

// ---------------------------------------------------------------------------
// Areas and waypoint tags
// ---------------------------------------------------------------------------

/// Number of a shelf area inside the store.
///
/// The default store has four areas numbered 1 through 4. Area 0 never
/// names a shelf; it is the value of an NPC's area counter before it has
/// reached any shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AreaId(pub u32);

impl AreaId {
    /// Return the raw area number.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for AreaId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "area-{}", self.0)
    }
}

/// Tag attached to every waypoint on a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaypointTag {
    /// A pass-through marker (corridor, queue, exit). Reaching it makes the
    /// NPC idle for a while.
    Neutral,
    /// A marker in front of a shelf area. Reaching it triggers a steal
    /// attempt.
    Shelf(AreaId),
}

impl WaypointTag {
    /// Whether this tag marks a shelf.
    pub const fn is_shelf(self) -> bool {
        matches!(self, Self::Shelf(_))
    }
}

// ---------------------------------------------------------------------------
// State machines
// ---------------------------------------------------------------------------

/// Observable state of an NPC customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NpcState {
    /// Standing still, waiting out the idle dwell.
    Idle,
    /// Walking towards the current route waypoint.
    Walking,
    /// At a shelf: either rolling a steal attempt or waiting out the
    /// post-theft dwell.
    Stolen,
    /// Left the store or was caught. Absorbing.
    Terminated,
}

/// Observable state of a child follower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FollowerState {
    /// Close enough to its NPC; not moving.
    Idle,
    /// Too far from its NPC; walking towards it.
    Follow,
}

/// Lifecycle phase of a play session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Main menu is shown; the spawn timer is disarmed.
    #[default]
    Menu,
    /// Play is in progress; the spawn timer is armed.
    Playing,
    /// The spawn budget is spent and the store is empty. Absorbing until
    /// restart.
    GameOver,
}

// ---------------------------------------------------------------------------
// Zone signals
// ---------------------------------------------------------------------------

/// Trigger-zone transition reported by a navigation host.
///
/// Zones are identified by the waypoint that owns them, so an NPC can tell
/// whether the zone it just entered is the one it is walking to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneSignal {
    /// The entity moved into the zone around the given waypoint.
    Entered(WaypointId),
    /// The entity moved out of the zone around the given waypoint.
    Exited(WaypointId),
}
