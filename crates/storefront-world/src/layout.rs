//! Store blueprint and the default store.
//!
//! A [`StoreLayout`] is the immutable description a session is built from:
//! the customer route, the spawn point, the trigger radius and how many
//! items each shelf is stocked with. Restarting a session rebuilds the
//! live state (route, zones, inventories) from the same layout.
//!
//! The default store has 11 waypoints:
//!
//! | # | name | tag |
//! |---|------|-----|
//! | 0 | entrance | neutral |
//! | 1 | aisle-produce | shelf 1 |
//! | 2 | cross-west | neutral |
//! | 3 | aisle-snacks | shelf 2 |
//! | 4 | cross-north | neutral |
//! | 5 | aisle-drinks | shelf 3 |
//! | 6 | cross-east | neutral |
//! | 7 | aisle-electronics | shelf 4 |
//! | 8 | checkout-queue | neutral |
//! | 9 | checkout | neutral |
//! | 10 | exit | neutral |
//!
//! Waypoint 9 (the checkout) is the second-to-last stop, which customers
//! carrying stolen goods walk straight past.

use storefront_types::{AreaId, Point, Waypoint, WaypointTag};
use tracing::debug;

use crate::error::WorldError;
use crate::inventory::StoreInventories;
use crate::route::Route;
use crate::zone::ZoneMap;

/// Default trigger radius around each waypoint.
pub const DEFAULT_ZONE_RADIUS: f64 = 0.75;

/// Default number of items stocked on each shelf.
pub const DEFAULT_ITEMS_PER_SHELF: usize = 10;

/// Immutable description of a store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreLayout {
    /// Waypoints in walking order; the last one is the exit.
    pub waypoints: Vec<Waypoint>,
    /// Where new customers and their children appear.
    pub spawn_point: Point,
    /// Trigger radius shared by every waypoint zone.
    pub zone_radius: f64,
    /// Items each of the four shelves starts with.
    pub items_per_shelf: usize,
}

impl StoreLayout {
    /// Build the customer route.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EmptyRoute`] if the layout has no waypoints.
    pub fn route(&self) -> Result<Route, WorldError> {
        Route::new(self.waypoints.clone())
    }

    /// Build the trigger zones.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidLayout`] if the zone radius is invalid.
    pub fn zone_map(&self) -> Result<ZoneMap, WorldError> {
        ZoneMap::new(&self.waypoints, self.zone_radius)
    }

    /// Stock a fresh set of shelves.
    pub fn stock(&self) -> StoreInventories {
        debug!(items_per_shelf = self.items_per_shelf, "Stocking shelves");
        StoreInventories::stocked(self.items_per_shelf)
    }

    /// Number of shelf-tagged waypoints on the route.
    pub fn shelf_stops(&self) -> usize {
        self.waypoints.iter().filter(|w| w.tag.is_shelf()).count()
    }
}

/// Create the default 11-waypoint store.
///
/// # Errors
///
/// Returns [`WorldError::InvalidLayout`] if `zone_radius` is not positive.
pub fn create_default_store(
    items_per_shelf: usize,
    zone_radius: f64,
) -> Result<StoreLayout, WorldError> {
    let shelf = |name: &str, x: f64, z: f64, area: u32| {
        Waypoint::new(name, Point::new(x, z), WaypointTag::Shelf(AreaId(area)))
    };

    let waypoints = vec![
        Waypoint::neutral("entrance", Point::new(0.0, 0.0)),
        shelf("aisle-produce", -6.0, 3.0, 1),
        Waypoint::neutral("cross-west", Point::new(-6.0, 8.0)),
        shelf("aisle-snacks", -2.0, 12.0, 2),
        Waypoint::neutral("cross-north", Point::new(2.0, 12.0)),
        shelf("aisle-drinks", 6.0, 8.0, 3),
        Waypoint::neutral("cross-east", Point::new(6.0, 4.0)),
        shelf("aisle-electronics", 4.0, 1.5, 4),
        Waypoint::neutral("checkout-queue", Point::new(2.5, -1.0)),
        Waypoint::neutral("checkout", Point::new(1.0, -3.0)),
        Waypoint::neutral("exit", Point::new(-1.5, -5.0)),
    ];

    let layout = StoreLayout {
        waypoints,
        spawn_point: Point::new(0.0, -2.0),
        zone_radius,
        items_per_shelf,
    };

    // Validate the radius up front so callers fail at start-up.
    let _ = layout.zone_map()?;
    Ok(layout)
}
