//! Planar geometry on the store floor.
//!
//! The store is flat, so positions are two-dimensional: `x` runs along the
//! storefront and `z` runs into the store.

use serde::{Deserialize, Serialize};

/// A position on the store floor, in world units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate along the storefront.
    pub x: f64,
    /// Depth coordinate into the store.
    pub z: f64,
}

impl Point {
    /// Create a point from its coordinates.
    pub const fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.z - self.z)
    }

    /// Move towards `target` by at most `max_step` units.
    ///
    /// Lands exactly on `target` when it is within reach. A non-positive
    /// step leaves the point where it is.
    pub fn step_towards(self, target: Self, max_step: f64) -> Self {
        let remaining = self.distance(target);
        if remaining <= max_step {
            return target;
        }
        if max_step <= 0.0 {
            return self;
        }
        let ratio = max_step / remaining;
        Self {
            x: (target.x - self.x).mul_add(ratio, self.x),
            z: (target.z - self.z).mul_add(ratio, self.z),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn distance_is_euclidean() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < EPSILON);
    }

    #[test]
    fn step_lands_on_target_when_close() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        assert_eq!(a.step_towards(b, 2.0), b);
    }

    #[test]
    fn step_moves_partially() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        let moved = a.step_towards(b, 2.5);
        assert!((moved.x - 2.5).abs() < EPSILON);
        assert!(moved.z.abs() < EPSILON);
    }

    #[test]
    fn zero_step_stays_put() {
        let a = Point::new(1.0, 1.0);
        let b = Point::new(5.0, 5.0);
        assert_eq!(a.step_towards(b, 0.0), a);
    }
}
