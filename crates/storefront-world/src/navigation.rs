//! The navigation port through which entities move around the store.
//!
//! Path-following belongs to the host (a game engine's navigation mesh, a
//! robot, a test harness). The simulation only ever talks to it through
//! [`NavigationPort`]: set a destination, set a speed, advance by one
//! tick, and read back the zone transitions that happened while moving.
//!
//! Two headless implementations ship with the crate:
//!
//! - [`KinematicNavigator`] walks in a straight line at its speed.
//! - [`TeleportNavigator`] lands on its destination on the next advance,
//!   which makes long simulations and tests fast.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use storefront_types::{Point, ZoneSignal, millis_to_seconds};

use crate::zone::{ZoneMap, ZoneTracker};

/// Distance under which a navigator counts as having arrived.
const ARRIVAL_TOLERANCE: f64 = 1e-6;

/// Movement interface exposed by the host for one entity.
pub trait NavigationPort: core::fmt::Debug + Send {
    /// Start moving towards `point`, replacing any previous destination.
    fn set_destination(&mut self, point: Point);

    /// Set the movement speed in world units per second.
    fn set_speed(&mut self, speed: f64);

    /// Whether the entity stands on its destination (or has none).
    fn has_arrived(&self) -> bool;

    /// Current position of the entity.
    fn position(&self) -> Point;

    /// Move for `dt_ms` milliseconds and return the zone transitions that
    /// happened during the move.
    fn advance(&mut self, dt_ms: u64) -> Vec<ZoneSignal>;
}

/// Which headless navigator to build for new entities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationMode {
    /// Straight-line movement at the entity's speed.
    #[default]
    Kinematic,
    /// Jump straight to the destination on the next tick.
    Teleport,
}

impl NavigationMode {
    /// Build a navigator of this kind standing at `start`.
    pub fn build(self, start: Point, zones: Arc<ZoneMap>) -> Box<dyn NavigationPort> {
        match self {
            Self::Kinematic => Box::new(KinematicNavigator::new(start, zones)),
            Self::Teleport => Box::new(TeleportNavigator::new(start, zones)),
        }
    }
}

/// Straight-line navigator moving at a fixed speed.
#[derive(Debug, Clone)]
pub struct KinematicNavigator {
    position: Point,
    destination: Option<Point>,
    speed: f64,
    zones: Arc<ZoneMap>,
    tracker: ZoneTracker,
}

impl KinematicNavigator {
    /// Create a stationary navigator at `start` with speed 0.
    pub fn new(start: Point, zones: Arc<ZoneMap>) -> Self {
        let mut tracker = ZoneTracker::new();
        // Zones the entity spawns inside are not reported as entries.
        let _ = tracker.update(zones.zones_at(start));
        Self {
            position: start,
            destination: None,
            speed: 0.0,
            zones,
            tracker,
        }
    }

    /// Current speed in world units per second.
    pub const fn speed(&self) -> f64 {
        self.speed
    }
}

impl NavigationPort for KinematicNavigator {
    fn set_destination(&mut self, point: Point) {
        self.destination = Some(point);
    }

    fn set_speed(&mut self, speed: f64) {
        self.speed = speed.max(0.0);
    }

    fn has_arrived(&self) -> bool {
        self.destination
            .is_none_or(|d| d.distance(self.position) <= ARRIVAL_TOLERANCE)
    }

    fn position(&self) -> Point {
        self.position
    }

    fn advance(&mut self, dt_ms: u64) -> Vec<ZoneSignal> {
        if let Some(destination) = self.destination {
            let max_step = self.speed * millis_to_seconds(dt_ms);
            self.position = self.position.step_towards(destination, max_step);
        }
        self.tracker.update(self.zones.zones_at(self.position))
    }
}

/// Navigator that reaches any destination on the next advance.
#[derive(Debug, Clone)]
pub struct TeleportNavigator {
    position: Point,
    destination: Option<Point>,
    zones: Arc<ZoneMap>,
    tracker: ZoneTracker,
}

impl TeleportNavigator {
    /// Create a navigator standing at `start`.
    pub fn new(start: Point, zones: Arc<ZoneMap>) -> Self {
        let mut tracker = ZoneTracker::new();
        let _ = tracker.update(zones.zones_at(start));
        Self {
            position: start,
            destination: None,
            zones,
            tracker,
        }
    }
}

impl NavigationPort for TeleportNavigator {
    fn set_destination(&mut self, point: Point) {
        self.destination = Some(point);
    }

    fn set_speed(&mut self, _speed: f64) {}

    fn has_arrived(&self) -> bool {
        self.destination
            .is_none_or(|d| d.distance(self.position) <= ARRIVAL_TOLERANCE)
    }

    fn position(&self) -> Point {
        self.position
    }

    fn advance(&mut self, _dt_ms: u64) -> Vec<ZoneSignal> {
        if let Some(destination) = self.destination {
            self.position = destination;
        }
        self.tracker.update(self.zones.zones_at(self.position))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use storefront_types::Waypoint;

    use super::*;

    fn zones_with(waypoints: &[Waypoint]) -> Arc<ZoneMap> {
        Arc::new(ZoneMap::new(waypoints, 0.5).unwrap())
    }

    #[test]
    fn kinematic_moves_at_speed() {
        let target = Waypoint::neutral("far", Point::new(10.0, 0.0));
        let mut nav = KinematicNavigator::new(Point::default(), zones_with(&[target.clone()]));
        nav.set_speed(2.0);
        nav.set_destination(target.position);

        assert!(nav.advance(1000).is_empty());
        assert!((nav.position().x - 2.0).abs() < 1e-9);
        assert!(!nav.has_arrived());

        // 4 more seconds at 2 u/s reaches x = 10 and enters the zone.
        let mut signals = Vec::new();
        for _ in 0..4 {
            signals.extend(nav.advance(1000));
        }
        assert!(nav.has_arrived());
        assert_eq!(signals, vec![ZoneSignal::Entered(target.id)]);
    }

    #[test]
    fn kinematic_reports_zones_passed_on_the_way() {
        let middle = Waypoint::neutral("middle", Point::new(5.0, 0.0));
        let end = Waypoint::neutral("end", Point::new(10.0, 0.0));
        let mut nav =
            KinematicNavigator::new(Point::default(), zones_with(&[middle.clone(), end.clone()]));
        nav.set_speed(5.0);
        nav.set_destination(end.position);

        assert_eq!(nav.advance(1000), vec![ZoneSignal::Entered(middle.id)]);
        assert_eq!(
            nav.advance(1000),
            vec![ZoneSignal::Exited(middle.id), ZoneSignal::Entered(end.id)]
        );
    }

    #[test]
    fn stationary_navigator_has_arrived() {
        let nav = KinematicNavigator::new(Point::default(), zones_with(&[]));
        assert!(nav.has_arrived());
        assert!(nav.speed().abs() < f64::EPSILON);
    }

    #[test]
    fn teleport_lands_on_destination() {
        let a = Waypoint::neutral("a", Point::new(3.0, 3.0));
        let b = Waypoint::neutral("b", Point::new(-3.0, 3.0));
        let mut nav = TeleportNavigator::new(Point::default(), zones_with(&[a.clone(), b.clone()]));

        nav.set_destination(a.position);
        assert_eq!(nav.advance(16), vec![ZoneSignal::Entered(a.id)]);
        assert!(nav.has_arrived());

        nav.set_destination(b.position);
        assert!(!nav.has_arrived());
        assert_eq!(
            nav.advance(16),
            vec![ZoneSignal::Exited(a.id), ZoneSignal::Entered(b.id)]
        );
    }

    #[test]
    fn mode_builds_matching_navigator() {
        let zones = zones_with(&[]);
        let mut nav = NavigationMode::Teleport.build(Point::default(), Arc::clone(&zones));
        nav.set_destination(Point::new(1.0, 1.0));
        let _ = nav.advance(1);
        assert_eq!(nav.position(), Point::new(1.0, 1.0));

        let kinematic = NavigationMode::Kinematic.build(Point::new(2.0, 0.0), zones);
        assert_eq!(kinematic.position(), Point::new(2.0, 0.0));
    }
}
