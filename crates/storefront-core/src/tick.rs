//! Tick cycle: the per-tick loop that drives the Storefront simulation.
//!
//! Each tick runs these steps in order:
//!
//! 1. **Clock** -- advance simulated time by `tick_duration_ms`.
//! 2. **Agents** -- every live NPC, in id order, moves, receives its zone
//!    signals and steps its state machine.
//! 3. **Routing** -- the events the agents emitted reach the session, the
//!    UI sink and the alert sink; terminated agents are removed.
//! 4. **Followers** -- every child steps against its NPC's position and is
//!    removed if that NPC is gone.
//! 5. **Spawn** -- if the spawn timer fired and the budget allows, a new
//!    customer (and its child) appears at the spawn point.
//! 6. **Game over** -- the session checks whether it has ended.
//!
//! Spawn and game-over therefore observe same-tick terminations. Player
//! interactions arrive between ticks through [`Simulation::interact`].

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use storefront_agents::{
    AgentConfig, AgentError, AgentEvent, ChildFollower, FollowerStep, NpcAgent, StealBlock,
};
use storefront_types::{AgentId, AreaId, FollowerId, Point};
use storefront_world::{Route, StoreInventories, StoreLayout, WorldError};
use tracing::{debug, info, warn};

use crate::clock::{ClockError, SessionClock};
use crate::config::SimulationConfig;
use crate::gate::{InteractionGate, InteractionOutcome, InteractionTarget};
use crate::ports::{AlertSink, HeadlessNavigatorFactory, NavigatorFactory, UiSink};
use crate::session::{SessionController, SessionError, SessionStats};

/// Text of the popup shown when a thief gets away.
pub const THIEF_ESCAPED_POPUP: &str = "Thief escaped!";

/// Errors that can occur while building or ticking the simulation.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// An agent step failed.
    #[error("agent error for {agent_id}: {source}")]
    Agent {
        /// The agent that caused the error.
        agent_id: AgentId,
        /// The underlying agent error.
        source: AgentError,
    },

    /// A new customer could not be created.
    #[error("spawn error: {source}")]
    Spawn {
        /// The underlying agent error.
        source: AgentError,
    },

    /// Session bookkeeping failed.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: SessionError,
    },

    /// A world operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Simulated time at the end of the tick.
    pub now_ms: u64,
    /// Customers in the store at the end of the tick.
    pub agents_active: u32,
    /// Children in the store at the end of the tick.
    pub followers_active: u32,
    /// Customer spawned this tick, if any.
    pub spawned: Option<AgentId>,
    /// Items stolen this tick.
    pub steals: u32,
    /// Customers that left this tick.
    pub exits: u32,
    /// Of those, how many carried loot.
    pub escapes: u32,
    /// Whether the session ended on this tick.
    pub game_over: bool,
}

/// Running totals kept for the end-of-session report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTotals {
    /// Items taken from shelves.
    pub items_stolen: u32,
    /// Steal rolls that found an empty shelf.
    pub empty_shelf_attempts: u32,
    /// Honest customers that reached the exit.
    pub honest_exits: u32,
    /// Interactions with an honest customer.
    pub false_accusations: u32,
    /// Points lost to escapes and false accusations.
    pub points_lost: i64,
}

/// Remaining stock on one shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfReport {
    /// The shelf area.
    pub area: AreaId,
    /// Items it was stocked with.
    pub stocked: usize,
    /// Items still on it.
    pub remaining: usize,
}

/// End-of-session report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Store name.
    pub store: String,
    /// Seed the session ran with.
    pub seed: u64,
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
    /// Ticks executed.
    pub ticks: u64,
    /// Simulated milliseconds elapsed.
    pub elapsed_ms: u64,
    /// Session counters.
    pub session: SessionStats,
    /// Running totals.
    pub totals: SessionTotals,
    /// Per-shelf stock.
    pub shelves: Vec<ShelfReport>,
}

/// Host collaborators injected into the simulation.
pub struct SimulationPorts {
    /// Produces one navigator per spawned entity.
    pub navigators: Box<dyn NavigatorFactory>,
    /// Score and tally display.
    pub ui: Box<dyn UiSink>,
    /// Per-thief alert markers.
    pub alerts: Box<dyn AlertSink>,
}

/// The whole store: session, agents, followers and shelves.
pub struct Simulation {
    name: String,
    seed: u64,
    layout: StoreLayout,
    route: Arc<Route>,
    inventories: StoreInventories,
    agent_config: Arc<AgentConfig>,
    spawn_followers: bool,
    popup_seconds: u64,
    clock: SessionClock,
    session: SessionController,
    gate: InteractionGate,
    agents: BTreeMap<AgentId, NpcAgent>,
    followers: BTreeMap<FollowerId, ChildFollower>,
    totals: SessionTotals,
    rng: StdRng,
    ports: SimulationPorts,
}

impl core::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Simulation")
            .field("name", &self.name)
            .field("tick", &self.clock.tick())
            .field("session", &self.session)
            .field("agents", &self.agents.len())
            .field("followers", &self.followers.len())
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Build a simulation in the menu phase.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::World`] if the layout has no waypoints,
    /// [`TickError::Clock`] if the tick duration is 0, or
    /// [`TickError::Spawn`] if the agent configuration is invalid.
    pub fn new(
        config: &SimulationConfig,
        layout: StoreLayout,
        ports: SimulationPorts,
    ) -> Result<Self, TickError> {
        config
            .agents
            .validate()
            .map_err(|source| TickError::Spawn { source })?;
        let route = Arc::new(layout.route()?);
        let inventories = layout.stock();
        let clock = SessionClock::new(config.world.tick_duration_ms)?;

        info!(
            store = %config.world.name,
            seed = config.world.seed,
            waypoints = route.len(),
            shelves = layout.shelf_stops(),
            "Simulation built"
        );

        Ok(Self {
            name: config.world.name.clone(),
            seed: config.world.seed,
            layout,
            route,
            inventories,
            agent_config: Arc::new(config.agents.clone()),
            spawn_followers: config.session.spawn_followers,
            popup_seconds: config.session.popup_seconds,
            clock,
            session: SessionController::new(&config.session),
            gate: InteractionGate::new(config.session.interaction_cooldown_ms),
            agents: BTreeMap::new(),
            followers: BTreeMap::new(),
            totals: SessionTotals::default(),
            rng: StdRng::seed_from_u64(config.world.seed),
            ports,
        })
    }

    /// Build a simulation with the built-in headless navigator named by
    /// `config.store.navigation`.
    ///
    /// # Errors
    ///
    /// See [`Simulation::new`]; also fails if the zone radius is invalid.
    pub fn headless(
        config: &SimulationConfig,
        layout: StoreLayout,
        ui: Box<dyn UiSink>,
        alerts: Box<dyn AlertSink>,
    ) -> Result<Self, TickError> {
        let zones = Arc::new(layout.zone_map()?);
        let navigators = Box::new(HeadlessNavigatorFactory::new(config.store.navigation, zones));
        Self::new(
            config,
            layout,
            SimulationPorts {
                navigators,
                ui,
                alerts,
            },
        )
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The session controller.
    pub const fn session(&self) -> &SessionController {
        &self.session
    }

    /// The session clock.
    pub const fn clock(&self) -> &SessionClock {
        &self.clock
    }

    /// The store layout this session was built from.
    pub const fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    /// The shelf inventories.
    pub const fn inventories(&self) -> &StoreInventories {
        &self.inventories
    }

    /// Running totals.
    pub const fn totals(&self) -> &SessionTotals {
        &self.totals
    }

    /// Live customers in id order.
    pub fn agents(&self) -> impl Iterator<Item = &NpcAgent> {
        self.agents.values()
    }

    /// Look up one live customer.
    pub fn agent(&self, id: AgentId) -> Option<&NpcAgent> {
        self.agents.get(&id)
    }

    /// Live children.
    pub fn followers(&self) -> impl Iterator<Item = &ChildFollower> {
        self.followers.values()
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Start play: arm the spawn timer and push the initial display.
    pub fn start_play(&mut self) -> bool {
        let started = self.session.on_play_start(self.clock.elapsed_ms());
        if started {
            self.refresh_display();
        }
        started
    }

    /// Go back to the menu. Agents already inside keep walking.
    pub fn return_to_menu(&mut self) {
        self.session.on_return_to_menu();
    }

    /// Clear the store and start over from the menu with full shelves.
    pub fn restart(&mut self) {
        self.agents.clear();
        self.followers.clear();
        self.session.reset();
        self.gate.reset();
        self.clock.reset();
        self.inventories = self.layout.stock();
        self.totals = SessionTotals::default();
        self.rng = StdRng::seed_from_u64(self.seed);
        self.refresh_display();
        info!(store = %self.name, "Simulation restarted");
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Run one tick.
    ///
    /// # Errors
    ///
    /// Returns a [`TickError`] if the clock overflows, a shelf lock is
    /// poisoned, or session bookkeeping fails. When an agent fails, the
    /// events of every other agent are routed and terminated agents are
    /// removed before the first agent error is returned.
    pub fn tick(&mut self) -> Result<TickSummary, TickError> {
        let tick = self.clock.advance()?;
        let now_ms = self.clock.elapsed_ms();
        let dt_ms = self.clock.tick_duration_ms();
        let mut summary = TickSummary {
            tick,
            now_ms,
            ..TickSummary::default()
        };

        // Agents. A failing agent does not hold back the others.
        let mut events = Vec::new();
        let mut failure = None;
        for (id, agent) in &mut self.agents {
            match agent.tick(dt_ms, &self.inventories, &mut self.rng) {
                Ok(emitted) => events.extend(emitted),
                Err(source) => {
                    warn!(agent_id = %id, error = %source, "Agent step failed");
                    if failure.is_none() {
                        failure = Some(TickError::Agent {
                            agent_id: *id,
                            source,
                        });
                    }
                }
            }
        }

        // Routing, failure or not.
        for event in events {
            self.route_event(event, &mut summary)?;
        }
        self.agents.retain(|_, agent| !agent.is_terminated());
        if let Some(error) = failure {
            return Err(error);
        }

        // Followers
        let mut lost = Vec::new();
        for (id, follower) in &mut self.followers {
            let target = self.agents.get(&follower.target()).map(NpcAgent::position);
            if follower.step(dt_ms, target) == FollowerStep::TargetLost {
                lost.push(*id);
            }
        }
        for id in lost {
            let _ = self.followers.remove(&id);
            debug!(follower_id = %id, "Follower removed");
        }

        // Spawn
        if self.session.spawn_due(now_ms) {
            summary.spawned = self.spawn_customer()?;
        }

        // Game over
        if self.session.check_game_over() {
            summary.game_over = true;
            self.refresh_display();
        }

        summary.agents_active = count(self.agents.len());
        summary.followers_active = count(self.followers.len());
        Ok(summary)
    }

    fn route_event(&mut self, event: AgentEvent, summary: &mut TickSummary) -> Result<(), TickError> {
        match event {
            AgentEvent::Stole { agent, .. } => {
                summary.steals = summary.steals.saturating_add(1);
                self.totals.items_stolen = self.totals.items_stolen.saturating_add(1);
                self.ports.alerts.start_stealing(agent);
            }
            AgentEvent::StealBlocked { reason, .. } => {
                if reason == StealBlock::Empty {
                    self.totals.empty_shelf_attempts = self.totals.empty_shelf_attempts.saturating_add(1);
                }
            }
            AgentEvent::Exited { agent, stolen } => {
                let score_value = self.agents.get(&agent).map_or(0, NpcAgent::score_value);
                self.session.on_agent_exited(stolen)?;
                self.ports.alerts.leave_store(agent);
                summary.exits = summary.exits.saturating_add(1);
                if stolen {
                    summary.escapes = summary.escapes.saturating_add(1);
                    let lost = self.session.apply_penalty(score_value)?;
                    self.totals.points_lost = self.totals.points_lost.saturating_add(lost);
                    self.ports.ui.show_popup(THIEF_ESCAPED_POPUP, self.popup_seconds);
                    info!(agent_id = %agent, penalty = lost, escaped = self.session.escaped_count(), "Thief escaped");
                    self.refresh_display();
                } else {
                    self.totals.honest_exits = self.totals.honest_exits.saturating_add(1);
                }
            }
            AgentEvent::StartedWalking { .. }
            | AgentEvent::ReachedWaypoint { .. }
            | AgentEvent::EnteredArea { .. }
            | AgentEvent::SpeedBoosted { .. }
            | AgentEvent::SkippedCheckout { .. } => {}
        }
        Ok(())
    }

    fn spawn_customer(&mut self) -> Result<Option<AgentId>, TickError> {
        if !self.session.try_spawn()? {
            return Ok(None);
        }
        let spawn_point = self.layout.spawn_point;
        let agent = NpcAgent::spawn(
            Arc::clone(&self.route),
            self.ports.navigators.create(spawn_point),
            Arc::clone(&self.agent_config),
            &mut self.rng,
        )
        .map_err(|source| TickError::Spawn { source })?;
        let id = agent.id();
        let _ = self.agents.insert(id, agent);

        if self.spawn_followers {
            let child = ChildFollower::new(
                id,
                self.ports.navigators.create(spawn_point),
                &self.agent_config,
            );
            let _ = self.followers.insert(child.id(), child);
        }

        info!(
            agent_id = %id,
            spawned = self.session.spawned(),
            total = self.session.total_to_spawn(),
            "Customer entered the store"
        );
        Ok(Some(id))
    }

    // -----------------------------------------------------------------------
    // Interaction
    // -----------------------------------------------------------------------

    /// Resolve a player interact request against `target`.
    ///
    /// A caught thief is removed at once, cancelling any pending dwell.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Session`] if the score or tallies overflow.
    pub fn interact(&mut self, target: Option<AgentId>) -> Result<InteractionOutcome, TickError> {
        let target = target.and_then(|id| self.agents.get(&id)).map(|agent| InteractionTarget {
            agent: agent.id(),
            stolen: agent.stolen(),
            score_value: agent.score_value(),
        });
        let outcome = self
            .gate
            .interact(self.clock.elapsed_ms(), target, &mut self.session)?;

        match outcome {
            InteractionOutcome::Caught { agent, points } => {
                let _ = self.agents.remove(&agent);
                self.ports.alerts.caught_by_player(agent);
                info!(agent_id = %agent, points, caught = self.session.caught_count(), "Thief caught");
                self.refresh_display();
            }
            InteractionOutcome::FalseAccusation { agent, penalty } => {
                self.totals.false_accusations = self.totals.false_accusations.saturating_add(1);
                self.totals.points_lost = self.totals.points_lost.saturating_add(penalty);
                info!(agent_id = %agent, penalty, "Honest customer accused");
                if penalty > 0 {
                    self.ports.ui.display_score(self.session.score());
                }
            }
            InteractionOutcome::CoolingDown | InteractionOutcome::NoTarget => {}
        }
        Ok(outcome)
    }

    /// The live customer nearest to `point` within `reach`, if any.
    ///
    /// Ties go to the lowest id.
    pub fn nearest_agent(&self, point: Point, reach: f64) -> Option<AgentId> {
        let mut best: Option<(AgentId, f64)> = None;
        for agent in self.agents.values() {
            let distance = agent.position().distance(point);
            if distance > reach {
                continue;
            }
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((agent.id(), distance));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Interact with the customer nearest to `point` within `reach`.
    ///
    /// # Errors
    ///
    /// See [`Simulation::interact`].
    pub fn interact_nearest(&mut self, point: Point, reach: f64) -> Result<InteractionOutcome, TickError> {
        let target = self.nearest_agent(point, reach);
        self.interact(target)
    }

    // -----------------------------------------------------------------------
    // Reporting
    // -----------------------------------------------------------------------

    /// Produce the end-of-session report.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::World`] if a shelf lock is poisoned.
    pub fn report(&self) -> Result<SessionReport, TickError> {
        let mut shelves = Vec::new();
        for shelf in self.inventories.shelves() {
            shelves.push(ShelfReport {
                area: shelf.area(),
                stocked: shelf.initial_len(),
                remaining: shelf.len()?,
            });
        }
        Ok(SessionReport {
            store: self.name.clone(),
            seed: self.seed,
            generated_at: Utc::now(),
            ticks: self.clock.tick(),
            elapsed_ms: self.clock.elapsed_ms(),
            session: self.session.stats(),
            totals: self.totals,
            shelves,
        })
    }

    fn refresh_display(&mut self) {
        self.ports.ui.display_score(self.session.score());
        self.ports.ui.display_caught(self.session.caught_count());
        self.ports.ui.display_escaped(self.session.escaped_count());
    }
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}
