//! Error types for the `storefront-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type.

use storefront_types::AreaId;

/// Errors that can occur during world operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A route was constructed without any waypoints.
    #[error("route must contain at least one waypoint")]
    EmptyRoute,

    /// The shelf inventory has no items left to take.
    #[error("shelf inventory for {area} is empty")]
    Empty {
        /// The exhausted area.
        area: AreaId,
    },

    /// An area number does not name one of the store's shelf areas.
    #[error("{area} is not a shelf area (valid: 1..={max})")]
    InvalidArea {
        /// The requested area.
        area: AreaId,
        /// Highest valid area number.
        max: u32,
    },

    /// A thread panicked while holding an inventory lock.
    #[error("inventory lock for {area} is poisoned")]
    LockPoisoned {
        /// The area whose lock is poisoned.
        area: AreaId,
    },

    /// A layout parameter is out of range.
    #[error("invalid store layout: {reason}")]
    InvalidLayout {
        /// Description of what is wrong with the layout.
        reason: String,
    },
}
