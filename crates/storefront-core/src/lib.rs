//! Session clock, tick cycle, and orchestration for the Storefront simulation.
//!
//! This crate owns the loop that turns NPC state machines, shelves and the
//! player's interact action into a playable session.
//!
//! # Modules
//!
//! - [`clock`] -- Session clock with tick counter and simulated milliseconds.
//! - [`config`] -- Configuration loading from `storefront-config.yaml` into
//!   strongly-typed structs.
//! - [`gate`] -- [`InteractionGate`]: cooldown-guarded catch / false
//!   accusation resolution.
//! - [`operator`] -- Pause, resume, stop and pacing controls for a run.
//! - [`ports`] -- [`UiSink`], [`AlertSink`] and [`NavigatorFactory`] host seams.
//! - [`runner`] -- Async run loop with operator controls.
//! - [`session`] -- [`SessionController`]: spawn budget, score, tallies and
//!   game over.
//! - [`tick`] -- The per-tick [`Simulation`] engine.
//!
//! [`AlertSink`]: ports::AlertSink
//! [`InteractionGate`]: gate::InteractionGate
//! [`NavigatorFactory`]: ports::NavigatorFactory
//! [`SessionController`]: session::SessionController
//! [`Simulation`]: tick::Simulation
//! [`UiSink`]: ports::UiSink

pub mod clock;
pub mod config;
pub mod gate;
pub mod operator;
pub mod ports;
pub mod runner;
pub mod session;
pub mod tick;

pub use config::SimulationConfig;
pub use gate::{InteractionGate, InteractionOutcome, InteractionTarget};
pub use operator::{OperatorState, RunControl, SimulationEndReason};
pub use ports::{AlertSink, HeadlessNavigatorFactory, NavigatorFactory, NoOpAlerts, NoOpUi, UiSink};
pub use runner::{NoOpCallback, SimulationResult, TickCallback, run_simulation};
pub use session::{SessionController, SessionStats, SpawnTimer};
pub use tick::{SessionReport, Simulation, SimulationPorts, TickError, TickSummary};
