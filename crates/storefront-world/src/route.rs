//! The ordered list of waypoints an NPC walks through the store.
//!
//! A [`Route`] is validated once at construction: it always holds at least
//! one waypoint, and the last waypoint is the exit. Agents share a route
//! through an `Arc` and keep their own progress index into it.

use storefront_types::Waypoint;

use crate::error::WorldError;

/// A validated, non-empty sequence of waypoints ending at the exit.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    waypoints: Vec<Waypoint>,
}

impl Route {
    /// Build a route from its waypoints.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EmptyRoute`] if `waypoints` is empty.
    pub fn new(waypoints: Vec<Waypoint>) -> Result<Self, WorldError> {
        if waypoints.is_empty() {
            return Err(WorldError::EmptyRoute);
        }
        Ok(Self { waypoints })
    }

    /// Number of waypoints (always at least 1).
    pub const fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always `false`; routes are non-empty by construction.
    pub const fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Index of the exit waypoint.
    pub const fn exit_index(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    /// Index of the checkpoint that NPCs carrying loot walk straight past.
    ///
    /// This is the second-to-last waypoint. Routes with fewer than two
    /// waypoints have no such checkpoint.
    pub const fn skip_index(&self) -> Option<usize> {
        self.waypoints.len().checked_sub(2)
    }

    /// Waypoint at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    /// The exit waypoint.
    pub fn exit(&self) -> Option<&Waypoint> {
        self.waypoints.last()
    }

    /// All waypoints in walking order.
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }
}
