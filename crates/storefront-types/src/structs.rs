//! Plain data records shared across the workspace.

use serde::{Deserialize, Serialize};

use crate::enums::WaypointTag;
use crate::geometry::Point;
use crate::ids::WaypointId;

/// A named marker on the store floor with a trigger zone around it.
///
/// The waypoint's `id` doubles as the identity of its trigger zone: zone
/// signals carry it, and an NPC only counts itself as arrived when the
/// signalled id matches its current target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Identity of the waypoint and its zone.
    pub id: WaypointId,
    /// Human-readable name (e.g. `"checkout"`).
    pub name: String,
    /// Centre of the trigger zone.
    pub position: Point,
    /// Whether this is a shelf or a pass-through marker.
    pub tag: WaypointTag,
}

impl Waypoint {
    /// Create a waypoint with a fresh identifier.
    pub fn new(name: impl Into<String>, position: Point, tag: WaypointTag) -> Self {
        Self {
            id: WaypointId::new(),
            name: name.into(),
            position,
            tag,
        }
    }

    /// Create a neutral waypoint.
    pub fn neutral(name: impl Into<String>, position: Point) -> Self {
        Self::new(name, position, WaypointTag::Neutral)
    }
}
