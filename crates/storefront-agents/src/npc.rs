//! The NPC customer state machine.
//!
//! An [`NpcAgent`] walks its route one waypoint at a time. What happens on
//! arrival depends on the tag of the waypoint just reached:
//!
//! - **Neutral**: stand still for the idle dwell, then walk on.
//! - **Shelf**: advance the area counter and roll a steal attempt. On a
//!   successful theft the NPC pockets an item, speeds up (once), lingers for
//!   a random dwell and walks on. Otherwise it idles like at a neutral stop.
//! - **Exit**: terminate.
//!
//! A fresh agent idles at its spawn point for one idle dwell before it
//! sets off for the first waypoint.
//!
//! Timers are counted in simulated milliseconds and are decremented by the
//! host's tick; dropping an agent cancels every pending dwell with it.
//!
//! Arrival is driven by zone signals. The agent keeps the set of trigger
//! zones it occupies and counts as arrived only while it stands in the zone
//! of its current target. Zones of other waypoints are ignored.

use std::collections::BTreeSet;
use std::sync::Arc;

use rand::Rng;
use storefront_types::{AgentId, AreaId, ItemId, NpcState, Point, Waypoint, WaypointId, ZoneSignal};
use storefront_world::{NavigationPort, Route, StoreInventories, WorldError};
use tracing::{debug, trace, warn};

use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::events::{AgentEvent, StealBlock};

/// Internal phase, carrying the timer that belongs to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle { elapsed_ms: u64 },
    Walking,
    Stolen { remaining_ms: u64 },
    Terminated,
}

/// One customer touring the store.
#[derive(Debug)]
pub struct NpcAgent {
    id: AgentId,
    route: Arc<Route>,
    current_index: usize,
    phase: Phase,
    stolen: bool,
    speed: f64,
    initial_speed: f64,
    steal_chance: f64,
    current_area: u32,
    occupied: BTreeSet<WaypointId>,
    loot: Vec<ItemId>,
    navigator: Box<dyn NavigationPort>,
    config: Arc<AgentConfig>,
}

impl NpcAgent {
    /// Spawn a customer at the start of `route`.
    ///
    /// Draws the speed and steal chance from the configured ranges. The
    /// agent starts idle at its spawn point and only heads for the first
    /// waypoint once the idle dwell has run out.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidConfig`] if `config` fails validation.
    pub fn spawn<R: Rng + ?Sized>(
        route: Arc<Route>,
        mut navigator: Box<dyn NavigationPort>,
        config: Arc<AgentConfig>,
        rng: &mut R,
    ) -> Result<Self, AgentError> {
        config.validate()?;
        let speed = rng.random_range(config.min_speed..=config.max_speed);
        let steal_chance = rng.random_range(config.min_steal_chance..=config.max_steal_chance);
        navigator.set_speed(speed);

        let agent = Self {
            id: AgentId::new(),
            route,
            current_index: 0,
            phase: Phase::Idle { elapsed_ms: 0 },
            stolen: false,
            speed,
            initial_speed: speed,
            steal_chance,
            current_area: 0,
            occupied: BTreeSet::new(),
            loot: Vec::new(),
            navigator,
            config,
        };
        debug!(agent_id = %agent.id, speed, steal_chance, "NPC spawned");
        Ok(agent)
    }

    /// Unique identifier of this agent.
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Observable state tag.
    pub const fn state(&self) -> NpcState {
        match self.phase {
            Phase::Idle { .. } => NpcState::Idle,
            Phase::Walking => NpcState::Walking,
            Phase::Stolen { .. } => NpcState::Stolen,
            Phase::Terminated => NpcState::Terminated,
        }
    }

    /// Whether the agent has terminated.
    pub const fn is_terminated(&self) -> bool {
        matches!(self.phase, Phase::Terminated)
    }

    /// Whether the agent has ever taken an item. Never reverts.
    pub const fn stolen(&self) -> bool {
        self.stolen
    }

    /// Index of the route waypoint currently targeted.
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    /// The waypoint currently targeted.
    pub fn target(&self) -> Option<&Waypoint> {
        self.route.get(self.current_index)
    }

    /// Number of shelves visited so far.
    pub const fn current_area(&self) -> u32 {
        self.current_area
    }

    /// Current walking speed.
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Walking speed drawn at spawn.
    pub const fn initial_speed(&self) -> f64 {
        self.initial_speed
    }

    /// Per-shelf steal probability drawn at spawn.
    pub const fn steal_chance(&self) -> f64 {
        self.steal_chance
    }

    /// Points this agent is worth to the session.
    pub fn score_value(&self) -> i64 {
        self.config.score_value
    }

    /// Items this agent has taken.
    pub fn loot(&self) -> &[ItemId] {
        &self.loot
    }

    /// Current position as reported by the navigator.
    pub fn position(&self) -> Point {
        self.navigator.position()
    }

    /// Time left before the current dwell ends, if the agent is dwelling.
    pub fn dwell_remaining_ms(&self) -> Option<u64> {
        match self.phase {
            Phase::Idle { elapsed_ms } => Some(self.config.idle_dwell_ms.saturating_sub(elapsed_ms)),
            Phase::Stolen { remaining_ms } => Some(remaining_ms),
            Phase::Walking | Phase::Terminated => None,
        }
    }

    /// Record a zone transition delivered by the navigation host.
    pub fn on_zone_signal(&mut self, signal: ZoneSignal) {
        match signal {
            ZoneSignal::Entered(zone) => {
                let _ = self.occupied.insert(zone);
            }
            ZoneSignal::Exited(zone) => {
                let _ = self.occupied.remove(&zone);
            }
        }
    }

    /// Move for `dt_ms`, apply the resulting zone signals, then step the
    /// state machine.
    ///
    /// # Errors
    ///
    /// See [`NpcAgent::step`].
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        dt_ms: u64,
        inventories: &StoreInventories,
        rng: &mut R,
    ) -> Result<Vec<AgentEvent>, AgentError> {
        if self.is_terminated() {
            return Ok(Vec::new());
        }
        for signal in self.navigator.advance(dt_ms) {
            self.on_zone_signal(signal);
        }
        self.step(dt_ms, inventories, rng)
    }

    /// Advance the state machine by `dt_ms` without moving.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::World`] if a shelf lock is poisoned, or
    /// [`AgentError::ArithmeticOverflow`] if the route index overflows.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        dt_ms: u64,
        inventories: &StoreInventories,
        rng: &mut R,
    ) -> Result<Vec<AgentEvent>, AgentError> {
        let mut events = Vec::new();
        match self.phase {
            Phase::Idle { elapsed_ms } => {
                let elapsed_ms = elapsed_ms.saturating_add(dt_ms);
                if elapsed_ms >= self.config.idle_dwell_ms {
                    self.start_walking(&mut events);
                } else {
                    self.phase = Phase::Idle { elapsed_ms };
                }
            }
            Phase::Walking => {
                if self.at_target() {
                    self.arrive(inventories, rng, &mut events)?;
                }
            }
            Phase::Stolen { remaining_ms } => {
                let remaining_ms = remaining_ms.saturating_sub(dt_ms);
                if remaining_ms == 0 {
                    self.start_walking(&mut events);
                } else {
                    self.phase = Phase::Stolen { remaining_ms };
                }
            }
            Phase::Terminated => {}
        }
        Ok(events)
    }

    fn at_target(&self) -> bool {
        self.target().is_some_and(|w| self.occupied.contains(&w.id))
    }

    fn start_walking(&mut self, events: &mut Vec<AgentEvent>) {
        if let Some(position) = self.target().map(|w| w.position) {
            self.navigator.set_destination(position);
        }
        self.phase = Phase::Walking;
        trace!(agent_id = %self.id, target = self.current_index, "Walking");
        events.push(AgentEvent::StartedWalking {
            agent: self.id,
            target: self.current_index,
        });
    }

    fn arrive<R: Rng + ?Sized>(
        &mut self,
        inventories: &StoreInventories,
        rng: &mut R,
        events: &mut Vec<AgentEvent>,
    ) -> Result<(), AgentError> {
        let reached = self.current_index;
        events.push(AgentEvent::ReachedWaypoint {
            agent: self.id,
            index: reached,
        });

        if reached >= self.route.exit_index() {
            self.phase = Phase::Terminated;
            debug!(agent_id = %self.id, stolen = self.stolen, "NPC left the store");
            events.push(AgentEvent::Exited {
                agent: self.id,
                stolen: self.stolen,
            });
            return Ok(());
        }

        let is_shelf = self.route.get(reached).is_some_and(|w| w.tag.is_shelf());

        let mut next = reached.checked_add(1).ok_or_else(|| overflow("route index"))?;
        if self.stolen && self.route.skip_index() == Some(next) {
            next = next.checked_add(1).ok_or_else(|| overflow("route index"))?;
            events.push(AgentEvent::SkippedCheckout { agent: self.id });
        }
        self.current_index = next;

        if is_shelf {
            self.current_area = self.current_area.checked_add(1).ok_or_else(|| overflow("area counter"))?;
            events.push(AgentEvent::EnteredArea {
                agent: self.id,
                area: AreaId(self.current_area),
            });
            self.attempt_steal(inventories, rng, events)?;
        } else {
            self.phase = Phase::Idle { elapsed_ms: 0 };
        }
        Ok(())
    }

    fn attempt_steal<R: Rng + ?Sized>(
        &mut self,
        inventories: &StoreInventories,
        rng: &mut R,
        events: &mut Vec<AgentEvent>,
    ) -> Result<(), AgentError> {
        self.phase = Phase::Idle { elapsed_ms: 0 };
        let roll: f64 = rng.random();
        if roll >= self.steal_chance {
            return Ok(());
        }

        let area = AreaId(self.current_area);
        let item = match inventories.take_from(area, rng) {
            Ok(item) => item,
            Err(WorldError::Empty { .. }) => {
                debug!(agent_id = %self.id, %area, "Shelf empty, nothing to steal");
                events.push(AgentEvent::StealBlocked {
                    agent: self.id,
                    area,
                    reason: StealBlock::Empty,
                });
                return Ok(());
            }
            Err(WorldError::InvalidArea { .. }) => {
                warn!(agent_id = %self.id, %area, "Area counter names no shelf");
                events.push(AgentEvent::StealBlocked {
                    agent: self.id,
                    area,
                    reason: StealBlock::InvalidArea,
                });
                return Ok(());
            }
            Err(other) => return Err(other.into()),
        };

        if self.speed <= self.initial_speed {
            self.speed *= self.config.speed_boost;
            self.navigator.set_speed(self.speed);
            events.push(AgentEvent::SpeedBoosted {
                agent: self.id,
                speed: self.speed,
            });
        }
        self.stolen = true;
        self.loot.push(item);

        let dwell_ms = rng.random_range(self.config.steal_dwell_min_ms..=self.config.steal_dwell_max_ms);
        self.phase = Phase::Stolen { remaining_ms: dwell_ms };
        debug!(agent_id = %self.id, %area, %item, dwell_ms, "NPC stole an item");
        events.push(AgentEvent::Stole {
            agent: self.id,
            area,
            item,
            dwell_ms,
        });
        Ok(())
    }
}

fn overflow(context: &str) -> AgentError {
    AgentError::ArithmeticOverflow {
        context: context.to_owned(),
    }
}
