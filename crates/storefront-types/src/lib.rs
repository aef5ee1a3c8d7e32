//! Shared type definitions for the Storefront simulation.
//!
//! This crate is the single source of truth for the small vocabulary every
//! other crate in the workspace speaks: identifiers, state tags, waypoint
//! markers and planar geometry.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for agents, followers, items and waypoints
//! - [`enums`] -- State tags, waypoint tags, session phases and zone signals
//! - [`geometry`] -- Planar [`Point`] with distance and step-towards helpers
//! - [`structs`] -- [`Waypoint`] and other plain data records
//! - [`time`] -- Millisecond simulation time helpers
//!
//! [`Point`]: geometry::Point
//! [`Waypoint`]: structs::Waypoint

pub mod enums;
pub mod geometry;
pub mod ids;
pub mod structs;
pub mod time;

// Re-export all public types at crate root for convenience.
pub use enums::{AreaId, FollowerState, NpcState, SessionPhase, WaypointTag, ZoneSignal};
pub use geometry::Point;
pub use ids::{AgentId, FollowerId, ItemId, WaypointId};
pub use structs::Waypoint;
pub use time::millis_to_seconds;
