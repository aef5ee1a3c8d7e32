//! Store layout, shelf inventories, routes and navigation for the
//! Storefront simulation.
//!
//! This crate models the physical store: the route customers walk, the
//! trigger zones around each waypoint, the shared shelf inventories, and
//! the navigation port through which a host moves entities around.
//!
//! # Modules
//!
//! - [`error`] -- Error types for world operations.
//! - [`inventory`] -- [`ShelfInventory`] (mutex-guarded item set) and the
//!   four-area [`StoreInventories`] registry.
//! - [`layout`] -- [`StoreLayout`] blueprint and the default 11-waypoint store.
//! - [`navigation`] -- [`NavigationPort`] trait with kinematic and teleport
//!   implementations.
//! - [`route`] -- Validated, non-empty waypoint [`Route`].
//! - [`zone`] -- Trigger-zone geometry and enter/exit tracking.
//!
//! [`NavigationPort`]: navigation::NavigationPort
//! [`Route`]: route::Route
//! [`ShelfInventory`]: inventory::ShelfInventory
//! [`StoreInventories`]: inventory::StoreInventories
//! [`StoreLayout`]: layout::StoreLayout

pub mod error;
pub mod inventory;
pub mod layout;
pub mod navigation;
pub mod route;
pub mod zone;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use inventory::{SHELF_AREA_COUNT, ShelfInventory, StoreInventories};
pub use layout::{
    DEFAULT_ITEMS_PER_SHELF, DEFAULT_ZONE_RADIUS, StoreLayout, create_default_store,
};
pub use navigation::{KinematicNavigator, NavigationMode, NavigationPort, TeleportNavigator};
pub use route::Route;
pub use zone::{ZoneMap, ZoneTracker};
