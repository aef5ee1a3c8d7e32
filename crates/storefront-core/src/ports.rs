//! Host-facing seams of the simulation.
//!
//! The simulation never renders anything or moves anything itself. It
//! pushes display updates through a [`UiSink`], thief markers through an
//! [`AlertSink`], and obtains one [`NavigationPort`] per spawned entity from
//! a [`NavigatorFactory`]. All three are injected at construction.

use std::sync::Arc;

use storefront_types::{AgentId, Point};
use storefront_world::{NavigationMode, NavigationPort, ZoneMap};

/// Score and tally display.
pub trait UiSink: Send {
    /// Show the current score.
    fn display_score(&mut self, score: i64);

    /// Show the number of thieves caught.
    fn display_caught(&mut self, caught: u32);

    /// Show the number of thieves that escaped.
    fn display_escaped(&mut self, escaped: u32);

    /// Show a transient message for `duration_seconds`.
    fn show_popup(&mut self, text: &str, duration_seconds: u64);
}

/// Per-thief alert marker.
pub trait AlertSink: Send {
    /// The agent just stole something; show its marker.
    fn start_stealing(&mut self, agent: AgentId);

    /// The agent left the store; hide its marker.
    fn leave_store(&mut self, agent: AgentId);

    /// The player caught the agent.
    fn caught_by_player(&mut self, agent: AgentId);
}

/// Builds the navigation handle for each newly spawned entity.
pub trait NavigatorFactory: Send {
    /// Create a navigator for an entity standing at `start`.
    fn create(&self, start: Point) -> Box<dyn NavigationPort>;
}

/// Factory for the built-in headless navigators.
#[derive(Debug, Clone)]
pub struct HeadlessNavigatorFactory {
    mode: NavigationMode,
    zones: Arc<ZoneMap>,
}

impl HeadlessNavigatorFactory {
    /// Create a factory producing `mode` navigators over `zones`.
    pub const fn new(mode: NavigationMode, zones: Arc<ZoneMap>) -> Self {
        Self { mode, zones }
    }

    /// The navigator kind produced.
    pub const fn mode(&self) -> NavigationMode {
        self.mode
    }
}

impl NavigatorFactory for HeadlessNavigatorFactory {
    fn create(&self, start: Point) -> Box<dyn NavigationPort> {
        self.mode.build(start, Arc::clone(&self.zones))
    }
}

/// UI sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpUi;

impl UiSink for NoOpUi {
    fn display_score(&mut self, _score: i64) {}
    fn display_caught(&mut self, _caught: u32) {}
    fn display_escaped(&mut self, _escaped: u32) {}
    fn show_popup(&mut self, _text: &str, _duration_seconds: u64) {}
}

/// Alert sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpAlerts;

impl AlertSink for NoOpAlerts {
    fn start_stealing(&mut self, _agent: AgentId) {}
    fn leave_store(&mut self, _agent: AgentId) {}
    fn caught_by_player(&mut self, _agent: AgentId) {}
}
