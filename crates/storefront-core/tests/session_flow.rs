//! End-to-end session tests for `storefront-core`.
//!
//! Every test builds a small store by hand, runs it with teleporting
//! navigators so customers reach each waypoint on the next tick, and
//! records what the simulation pushed to its UI and alert sinks.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::missing_panics_doc,
    clippy::indexing_slicing
)]

use std::sync::{Arc, Mutex};

use storefront_core::config::SimulationConfig;
use storefront_core::tick::THIEF_ESCAPED_POPUP;
use storefront_core::{AlertSink, InteractionOutcome, Simulation, TickError, TickSummary, UiSink};
use storefront_types::{AgentId, AreaId, Point, SessionPhase, Waypoint, WaypointTag};
use storefront_world::{NavigationMode, StoreLayout, create_default_store};

// =============================================================================
// Recording sinks
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum UiCall {
    Score(i64),
    Caught(u32),
    Escaped(u32),
    Popup(String, u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AlertCall {
    Stealing(AgentId),
    Left(AgentId),
    Caught(AgentId),
}

#[derive(Clone, Default)]
struct RecordingUi(Arc<Mutex<Vec<UiCall>>>);

impl UiSink for RecordingUi {
    fn display_score(&mut self, score: i64) {
        self.0.lock().unwrap().push(UiCall::Score(score));
    }
    fn display_caught(&mut self, caught: u32) {
        self.0.lock().unwrap().push(UiCall::Caught(caught));
    }
    fn display_escaped(&mut self, escaped: u32) {
        self.0.lock().unwrap().push(UiCall::Escaped(escaped));
    }
    fn show_popup(&mut self, text: &str, duration_seconds: u64) {
        self.0
            .lock()
            .unwrap()
            .push(UiCall::Popup(text.to_owned(), duration_seconds));
    }
}

#[derive(Clone, Default)]
struct RecordingAlerts(Arc<Mutex<Vec<AlertCall>>>);

impl AlertSink for RecordingAlerts {
    fn start_stealing(&mut self, agent: AgentId) {
        self.0.lock().unwrap().push(AlertCall::Stealing(agent));
    }
    fn leave_store(&mut self, agent: AgentId) {
        self.0.lock().unwrap().push(AlertCall::Left(agent));
    }
    fn caught_by_player(&mut self, agent: AgentId) {
        self.0.lock().unwrap().push(AlertCall::Caught(agent));
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Entrance, one shelf, exit. The spawn point lies outside every zone.
fn three_stop_store(items_per_shelf: usize) -> StoreLayout {
    StoreLayout {
        waypoints: vec![
            Waypoint::neutral("entrance", Point::new(0.0, 0.0)),
            Waypoint::new("shelf", Point::new(5.0, 0.0), WaypointTag::Shelf(AreaId(1))),
            Waypoint::neutral("exit", Point::new(10.0, 0.0)),
        ],
        spawn_point: Point::new(0.0, -5.0),
        zone_radius: 0.5,
        items_per_shelf,
    }
}

fn config(total_to_spawn: u32, steal_chance: f64) -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.session.total_to_spawn = total_to_spawn;
    config.session.spawn_initial_delay_ms = 100;
    config.session.spawn_interval_ms = 100;
    config.session.interaction_cooldown_ms = 1000;
    config.agents.idle_dwell_ms = 100;
    config.agents.steal_dwell_min_ms = 100;
    config.agents.steal_dwell_max_ms = 100;
    config.agents.min_steal_chance = steal_chance;
    config.agents.max_steal_chance = steal_chance;
    config.store.navigation = NavigationMode::Teleport;
    config
}

struct Harness {
    sim: Simulation,
    ui: RecordingUi,
    alerts: RecordingAlerts,
}

fn harness(config: &SimulationConfig, layout: StoreLayout) -> Harness {
    let ui = RecordingUi::default();
    let alerts = RecordingAlerts::default();
    let mut sim =
        Simulation::headless(config, layout, Box::new(ui.clone()), Box::new(alerts.clone())).unwrap();
    assert!(sim.start_play());
    Harness { sim, ui, alerts }
}

/// Tick until the session ends, returning every summary.
fn run_to_game_over(sim: &mut Simulation) -> Vec<TickSummary> {
    let mut summaries = Vec::new();
    for _ in 0..1000 {
        let summary = sim.tick().unwrap();
        let over = summary.game_over;
        summaries.push(summary);
        if over {
            return summaries;
        }
    }
    panic!("session did not end within 1000 ticks");
}

fn first_spawned(summaries: &[TickSummary]) -> AgentId {
    summaries.iter().find_map(|s| s.spawned).unwrap()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn thief_escapes_with_one_item() {
    let mut h = harness(&config(1, 1.0), three_stop_store(10));

    let summaries = run_to_game_over(&mut h.sim);
    let thief = first_spawned(&summaries);

    let session = h.sim.session();
    assert_eq!(session.escaped_count(), 1);
    assert_eq!(session.caught_count(), 0);
    assert_eq!(session.active_count(), 0);
    // Score was 0, so the escape penalty is waived.
    assert_eq!(session.score(), 0);
    assert_eq!(session.phase(), SessionPhase::GameOver);

    let remaining = h.sim.inventories().remaining().unwrap();
    assert_eq!(remaining.get(&AreaId(1)), Some(&9));
    assert_eq!(remaining.get(&AreaId(2)), Some(&10));
    assert_eq!(h.sim.totals().items_stolen, 1);

    let alerts = h.alerts.0.lock().unwrap().clone();
    assert_eq!(alerts, vec![AlertCall::Stealing(thief), AlertCall::Left(thief)]);

    let ui = h.ui.0.lock().unwrap().clone();
    assert!(ui.contains(&UiCall::Popup(THIEF_ESCAPED_POPUP.to_owned(), 3)));
    assert!(ui.contains(&UiCall::Escaped(1)));
}

#[test]
fn honest_customer_leaves_shelves_untouched() {
    let mut h = harness(&config(1, 0.0), three_stop_store(10));

    let _ = run_to_game_over(&mut h.sim);

    let session = h.sim.session();
    assert_eq!(session.escaped_count(), 0);
    assert_eq!(session.spawned(), 1);
    assert_eq!(h.sim.totals().honest_exits, 1);
    assert_eq!(h.sim.inventories().total_remaining().unwrap(), 40);

    let alerts = h.alerts.0.lock().unwrap().clone();
    assert_eq!(alerts.len(), 1);
    assert!(matches!(alerts[0], AlertCall::Left(_)));
    let ui = h.ui.0.lock().unwrap().clone();
    assert!(!ui.iter().any(|c| matches!(c, UiCall::Popup(..))));
}

#[test]
fn game_over_is_reported_exactly_once() {
    let mut h = harness(&config(1, 0.0), three_stop_store(10));

    let summaries = run_to_game_over(&mut h.sim);
    assert_eq!(summaries.iter().filter(|s| s.game_over).count(), 1);

    for _ in 0..20 {
        let summary = h.sim.tick().unwrap();
        assert!(!summary.game_over);
        assert!(summary.spawned.is_none());
    }
    assert!(h.sim.session().is_game_over());
    assert!(!h.sim.start_play());
}

#[test]
fn empty_shelf_lets_the_customer_walk_out_honest() {
    let mut h = harness(&config(1, 1.0), three_stop_store(0));

    let _ = run_to_game_over(&mut h.sim);

    assert_eq!(h.sim.session().escaped_count(), 0);
    assert_eq!(h.sim.totals().empty_shelf_attempts, 1);
    assert_eq!(h.sim.totals().honest_exits, 1);
    assert!(!h.alerts.0.lock().unwrap().iter().any(|c| matches!(c, AlertCall::Stealing(_))));
}

#[test]
fn spawns_follow_the_timer_until_the_budget_is_spent() {
    let mut cfg = config(3, 0.0);
    cfg.agents.idle_dwell_ms = 60_000;
    let mut h = harness(&cfg, three_stop_store(10));

    let spawned: Vec<bool> = (0..6).map(|_| h.sim.tick().unwrap().spawned.is_some()).collect();
    assert_eq!(spawned, vec![true, true, true, false, false, false]);
    assert_eq!(h.sim.session().spawned(), 3);
    assert_eq!(h.sim.session().active_count(), 3);
    assert_eq!(h.sim.agents().count(), 3);
    assert_eq!(h.sim.followers().count(), 3);
    assert!(!h.sim.session().timer().is_armed());
}

#[test]
fn returning_to_menu_stops_spawning_but_not_walking() {
    let mut cfg = config(3, 0.0);
    cfg.session.spawn_interval_ms = 1000;
    let mut h = harness(&cfg, three_stop_store(10));

    let first = h.sim.tick().unwrap();
    let agent = first.spawned.unwrap();
    h.sim.return_to_menu();
    assert_eq!(h.sim.session().phase(), SessionPhase::Menu);

    let before = h.sim.agent(agent).unwrap().current_index();
    for _ in 0..30 {
        assert!(h.sim.tick().unwrap().spawned.is_none());
    }
    // The customer kept walking and left.
    assert!(h.sim.agent(agent).is_none_or(|a| a.current_index() > before));
    assert_eq!(h.sim.session().spawned(), 1);
}

#[test]
fn catching_a_thief_removes_it_and_scores() {
    let mut cfg = config(1, 1.0);
    cfg.agents.steal_dwell_min_ms = 60_000;
    cfg.agents.steal_dwell_max_ms = 60_000;
    let mut h = harness(&cfg, three_stop_store(10));

    let mut thief = None;
    for _ in 0..50 {
        let _ = h.sim.tick().unwrap();
        thief = h.sim.agents().find(|a| a.stolen()).map(|a| a.id());
        if thief.is_some() {
            break;
        }
    }
    let thief = thief.unwrap();
    assert_eq!(h.sim.followers().count(), 1);

    let outcome = h.sim.interact(Some(thief)).unwrap();
    assert_eq!(outcome, InteractionOutcome::Caught { agent: thief, points: 1 });
    assert!(h.sim.agent(thief).is_none());
    assert_eq!(h.sim.session().score(), 1);
    assert_eq!(h.sim.session().caught_count(), 1);
    assert!(h.alerts.0.lock().unwrap().contains(&AlertCall::Caught(thief)));
    let ui = h.ui.0.lock().unwrap().clone();
    assert!(ui.contains(&UiCall::Score(1)));
    assert!(ui.contains(&UiCall::Caught(1)));

    // The next tick drops the orphaned child and ends the session.
    let summary = h.sim.tick().unwrap();
    assert_eq!(summary.followers_active, 0);
    assert!(summary.game_over);
    // A caught thief never counts as an escape.
    assert_eq!(h.sim.session().escaped_count(), 0);
}

#[test]
fn interaction_cooldown_ignores_requests_within_the_window() {
    let mut cfg = config(1, 0.0);
    cfg.agents.idle_dwell_ms = 60_000;
    let mut h = harness(&cfg, three_stop_store(10));

    let agent = h.sim.tick().unwrap().spawned.unwrap();
    let _ = h.sim.tick().unwrap();

    let first = h.sim.interact(Some(agent)).unwrap();
    assert!(matches!(first, InteractionOutcome::FalseAccusation { penalty: 0, .. }));
    assert_eq!(h.sim.totals().false_accusations, 1);

    // Same instant: ignored.
    assert_eq!(h.sim.interact(Some(agent)).unwrap(), InteractionOutcome::CoolingDown);

    // Exactly one cooldown later: still ignored.
    for _ in 0..10 {
        let _ = h.sim.tick().unwrap();
    }
    assert_eq!(h.sim.interact(Some(agent)).unwrap(), InteractionOutcome::CoolingDown);
    assert_eq!(h.sim.totals().false_accusations, 1);

    // One tick past the cooldown: accepted again.
    let _ = h.sim.tick().unwrap();
    let again = h.sim.interact(Some(agent)).unwrap();
    assert!(matches!(again, InteractionOutcome::FalseAccusation { .. }));
    assert_eq!(h.sim.totals().false_accusations, 2);
    // The score never goes below zero.
    assert_eq!(h.sim.session().score(), 0);
    // Honest customers stay in the store when accused.
    assert!(h.sim.agent(agent).is_some());
}

#[test]
fn nearest_agent_respects_reach() {
    let mut cfg = config(1, 0.0);
    cfg.agents.idle_dwell_ms = 60_000;
    let mut h = harness(&cfg, three_stop_store(10));

    let agent = h.sim.tick().unwrap().spawned.unwrap();
    // Still idling at the spawn point (0, -5).
    let _ = h.sim.tick().unwrap();

    assert_eq!(h.sim.nearest_agent(Point::new(1.0, -5.0), 2.0), Some(agent));
    assert_eq!(h.sim.nearest_agent(Point::new(10.0, 0.0), 2.0), None);
    assert_eq!(
        h.sim.interact_nearest(Point::new(10.0, 0.0), 2.0).unwrap(),
        InteractionOutcome::NoTarget
    );
}

#[test]
fn restart_restocks_and_returns_to_menu() {
    let mut h = harness(&config(1, 1.0), three_stop_store(10));
    let _ = run_to_game_over(&mut h.sim);
    assert_eq!(h.sim.inventories().total_remaining().unwrap(), 39);

    h.sim.restart();
    assert_eq!(h.sim.session().phase(), SessionPhase::Menu);
    assert_eq!(h.sim.session().spawned(), 0);
    assert_eq!(h.sim.clock().tick(), 0);
    assert_eq!(h.sim.inventories().total_remaining().unwrap(), 40);
    assert_eq!(h.sim.totals().items_stolen, 0);

    assert!(h.sim.start_play());
    let summaries = run_to_game_over(&mut h.sim);
    assert_eq!(summaries.iter().filter(|s| s.game_over).count(), 1);
    assert_eq!(h.sim.session().escaped_count(), 1);
}

#[test]
fn report_lists_every_shelf() {
    let mut h = harness(&config(1, 1.0), three_stop_store(10));
    let _ = run_to_game_over(&mut h.sim);

    let report = h.sim.report().unwrap();
    assert_eq!(report.shelves.len(), 4);
    assert_eq!(report.session.escaped_count, 1);
    assert_eq!(report.totals.items_stolen, 1);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["store"], "Corner Store");
}

#[test]
fn thieves_never_queue_at_the_default_checkout() {
    let mut cfg = config(3, 1.0);
    cfg.session.spawn_followers = false;
    let layout = create_default_store(10, 0.75).unwrap();
    let checkout = layout.route().unwrap().skip_index().unwrap();
    assert_eq!(checkout, 9);
    let mut h = harness(&cfg, layout);

    let mut thieves_seen = 0_usize;
    for _ in 0..1000 {
        let summary = h.sim.tick().unwrap();
        for agent in h.sim.agents().filter(|a| a.stolen()) {
            assert_ne!(agent.current_index(), checkout, "thief {} headed for the checkout", agent.id());
            thieves_seen = thieves_seen.saturating_add(1);
        }
        if summary.game_over {
            break;
        }
    }
    assert!(thieves_seen > 0);
    assert_eq!(h.sim.session().escaped_count(), 3);
}

struct PanickingRng;

impl rand::RngCore for PanickingRng {
    fn next_u32(&mut self) -> u32 {
        panic!("rng used while holding the shelf lock")
    }
    fn next_u64(&mut self) -> u64 {
        panic!("rng used while holding the shelf lock")
    }
    fn fill_bytes(&mut self, _dst: &mut [u8]) {
        panic!("rng used while holding the shelf lock")
    }
}

/// Poison the lock of shelf 1 by panicking while it is held.
fn poison_first_shelf(sim: &Simulation) {
    let shelf = sim.inventories().resolve(AreaId(1)).unwrap();
    std::thread::scope(|scope| {
        let taken = scope.spawn(|| shelf.take_random(&mut PanickingRng)).join();
        assert!(taken.is_err());
    });
    assert!(shelf.len().is_err());
}

#[test]
fn agent_failure_still_routes_same_tick_exits() {
    // Two thieves two ticks apart: the first leaves on the same tick the
    // second reaches the poisoned shelf.
    let mut cfg = config(2, 1.0);
    cfg.session.spawn_interval_ms = 200;
    let mut h = harness(&cfg, three_stop_store(10));

    let mut spawned = Vec::new();
    let mut poisoned = false;
    let mut failure = None;
    for _ in 0..50 {
        match h.sim.tick() {
            Ok(summary) => {
                spawned.extend(summary.spawned);
                if summary.steals > 0 && !poisoned {
                    poison_first_shelf(&h.sim);
                    poisoned = true;
                }
            }
            Err(e) => {
                failure = Some(e);
                break;
            }
        }
    }

    let failure = failure.unwrap();
    assert_eq!(spawned.len(), 2);
    let (first, second) = (spawned[0], spawned[1]);
    assert!(matches!(failure, TickError::Agent { agent_id, .. } if agent_id == second));

    // The first thief's exit was routed before the error surfaced.
    assert_eq!(h.sim.session().escaped_count(), 1);
    assert_eq!(h.sim.session().active_count(), 1);
    assert!(h.sim.agent(first).is_none());
    assert!(h.sim.agent(second).is_some());
    assert!(h.alerts.0.lock().unwrap().contains(&AlertCall::Left(first)));
}
