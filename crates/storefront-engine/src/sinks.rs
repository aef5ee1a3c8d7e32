//! UI and alert sinks that write to the tracing log.
//!
//! A headless run has no screen. These sinks turn every display update and
//! thief marker into a structured log line instead. Tallies are only
//! logged when they change.

use std::collections::BTreeSet;

use storefront_core::{AlertSink, UiSink};
use storefront_types::AgentId;
use tracing::{debug, info};

/// UI sink logging score and tallies.
#[derive(Debug, Default)]
pub struct TracingUi {
    score: i64,
    caught: u32,
    escaped: u32,
}

impl TracingUi {
    /// Create a sink showing zeros.
    pub const fn new() -> Self {
        Self {
            score: 0,
            caught: 0,
            escaped: 0,
        }
    }
}

impl UiSink for TracingUi {
    fn display_score(&mut self, score: i64) {
        if score != self.score {
            info!(score, previous = self.score, "Score");
        }
        self.score = score;
    }

    fn display_caught(&mut self, caught: u32) {
        if caught != self.caught {
            info!(caught, "Thieves caught");
        }
        self.caught = caught;
    }

    fn display_escaped(&mut self, escaped: u32) {
        if escaped != self.escaped {
            info!(escaped, "Thieves escaped");
        }
        self.escaped = escaped;
    }

    fn show_popup(&mut self, text: &str, duration_seconds: u64) {
        info!(text, duration_seconds, "Popup");
    }
}

/// Alert sink logging thief markers and tracking which are visible.
#[derive(Debug, Default)]
pub struct TracingAlerts {
    visible: BTreeSet<AgentId>,
}

impl TracingAlerts {
    /// Create a sink with no markers shown.
    pub const fn new() -> Self {
        Self {
            visible: BTreeSet::new(),
        }
    }

    /// Agents whose marker is currently shown.
    #[cfg(test)]
    pub const fn visible(&self) -> &BTreeSet<AgentId> {
        &self.visible
    }
}

impl AlertSink for TracingAlerts {
    fn start_stealing(&mut self, agent: AgentId) {
        if self.visible.insert(agent) {
            info!(agent_id = %agent, "Alert shown");
        }
    }

    fn leave_store(&mut self, agent: AgentId) {
        if self.visible.remove(&agent) {
            info!(agent_id = %agent, "Alert cleared: thief left");
        } else {
            debug!(agent_id = %agent, "Customer left");
        }
    }

    fn caught_by_player(&mut self, agent: AgentId) {
        let _ = self.visible.remove(&agent);
        info!(agent_id = %agent, "Alert cleared: thief caught");
    }
}
