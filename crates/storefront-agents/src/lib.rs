//! NPC customer and child follower state machines for the Storefront
//! simulation.
//!
//! This crate contains the per-entity logic layer: everything that decides
//! what a single customer or child does next, without owning the session
//! counters or talking to the UI. The tick orchestrator in
//! `storefront-core` steps these machines and routes the [`AgentEvent`]s
//! they emit.
//!
//! # Modules
//!
//! - [`config`] -- Tunable dwell times, speed and steal-chance ranges ([`AgentConfig`])
//! - [`error`] -- Error types for agent operations ([`AgentError`])
//! - [`events`] -- Outward-facing events emitted by a step ([`AgentEvent`])
//! - [`follower`] -- [`ChildFollower`] idle/follow machine
//! - [`npc`] -- [`NpcAgent`] idle/walking/stolen machine

pub mod config;
pub mod error;
pub mod events;
pub mod follower;
pub mod npc;

// Re-export primary types at crate root for convenience.
pub use config::AgentConfig;
pub use error::AgentError;
pub use events::{AgentEvent, StealBlock};
pub use follower::{ChildFollower, FollowerStep};
pub use npc::NpcAgent;
