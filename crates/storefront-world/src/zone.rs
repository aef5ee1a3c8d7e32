//! Trigger zones around waypoints.
//!
//! Every waypoint owns a circular trigger zone. [`ZoneMap`] answers "which
//! zones contain this point", and [`ZoneTracker`] turns successive answers
//! into [`ZoneSignal::Entered`] / [`ZoneSignal::Exited`] transitions, the
//! same signals a game engine's trigger callbacks would produce.

use std::collections::BTreeSet;

use storefront_types::{Point, Waypoint, WaypointId, ZoneSignal};

use crate::error::WorldError;

/// Circular trigger zones keyed by waypoint identity.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneMap {
    zones: Vec<(WaypointId, Point)>,
    radius: f64,
}

impl ZoneMap {
    /// Build zones of the given radius around each waypoint.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidLayout`] if `radius` is not a positive
    /// finite number.
    pub fn new<'a>(
        waypoints: impl IntoIterator<Item = &'a Waypoint>,
        radius: f64,
    ) -> Result<Self, WorldError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(WorldError::InvalidLayout {
                reason: format!("zone radius must be positive, got {radius}"),
            });
        }
        let zones = waypoints.into_iter().map(|w| (w.id, w.position)).collect();
        Ok(Self { zones, radius })
    }

    /// Trigger radius shared by all zones.
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Zones whose area contains `point` (boundary inclusive).
    pub fn zones_at(&self, point: Point) -> BTreeSet<WaypointId> {
        self.zones
            .iter()
            .filter(|(_, centre)| centre.distance(point) <= self.radius)
            .map(|(id, _)| *id)
            .collect()
    }
}

/// Remembers which zones an entity is inside and reports changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneTracker {
    inside: BTreeSet<WaypointId>,
}

impl ZoneTracker {
    /// Create a tracker that starts outside every zone.
    pub const fn new() -> Self {
        Self {
            inside: BTreeSet::new(),
        }
    }

    /// Replace the current occupancy with `now` and return the transitions.
    ///
    /// Exits are reported before entries.
    pub fn update(&mut self, now: BTreeSet<WaypointId>) -> Vec<ZoneSignal> {
        let mut signals: Vec<ZoneSignal> = self
            .inside
            .difference(&now)
            .map(|id| ZoneSignal::Exited(*id))
            .collect();
        signals.extend(now.difference(&self.inside).map(|id| ZoneSignal::Entered(*id)));
        self.inside = now;
        signals
    }

    /// Zones the entity is currently inside.
    pub const fn inside(&self) -> &BTreeSet<WaypointId> {
        &self.inside
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn two_zones() -> (ZoneMap, Waypoint, Waypoint) {
        let a = Waypoint::neutral("a", Point::new(0.0, 0.0));
        let b = Waypoint::neutral("b", Point::new(10.0, 0.0));
        let map = ZoneMap::new([&a, &b], 1.0).unwrap();
        (map, a, b)
    }

    #[test]
    fn zones_at_is_boundary_inclusive() {
        let (map, a, _) = two_zones();
        assert!(map.zones_at(Point::new(1.0, 0.0)).contains(&a.id));
        assert!(map.zones_at(Point::new(1.5, 0.0)).is_empty());
    }

    #[test]
    fn tracker_reports_enter_then_exit() {
        let (map, a, b) = two_zones();
        let mut tracker = ZoneTracker::new();

        let signals = tracker.update(map.zones_at(Point::new(0.0, 0.0)));
        assert_eq!(signals, vec![ZoneSignal::Entered(a.id)]);

        // Staying inside produces nothing.
        assert!(tracker.update(map.zones_at(Point::new(0.5, 0.0))).is_empty());

        let signals = tracker.update(map.zones_at(Point::new(10.0, 0.0)));
        assert_eq!(signals, vec![ZoneSignal::Exited(a.id), ZoneSignal::Entered(b.id)]);
        assert!(tracker.inside().contains(&b.id));
    }

    #[test]
    fn non_positive_radius_is_rejected() {
        let a = Waypoint::neutral("a", Point::default());
        assert!(ZoneMap::new([&a], 0.0).is_err());
        assert!(ZoneMap::new([&a], f64::NAN).is_err());
    }
}
