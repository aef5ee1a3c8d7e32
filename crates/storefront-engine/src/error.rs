//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode of engine startup and the run
//! itself, so `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: storefront_core::config::ConfigError,
    },

    /// Store layout construction failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: storefront_world::WorldError,
    },

    /// Building the simulation or producing its report failed.
    #[error("simulation error: {source}")]
    Simulation {
        /// The underlying tick error.
        #[from]
        source: storefront_core::TickError,
    },

    /// Simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: storefront_core::runner::RunnerError,
    },

    /// The end-of-session report could not be serialized.
    #[error("report error: {source}")]
    Report {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}
