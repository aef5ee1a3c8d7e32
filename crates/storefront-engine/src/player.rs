//! Automated player driven from the tick callback.
//!
//! The bot stands at its post. Each tick it looks for the customer nearest
//! to it within reach; if that customer carries stolen goods, the bot
//! notices with probability `notice_chance` and presses interact.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use storefront_agents::NpcAgent;
use storefront_core::config::PlayerConfig;
use storefront_core::runner::TickCallback;
use storefront_core::{InteractionOutcome, Simulation, TickSummary};
use storefront_types::Point;
use tracing::{debug, warn};

/// Tick callback playing the store owner.
#[derive(Debug)]
pub struct PlayerBot {
    post: Point,
    reach: f64,
    notice_chance: f64,
    rng: StdRng,
    catches: u32,
}

impl PlayerBot {
    /// Create a bot from the player configuration.
    pub fn new(config: &PlayerConfig, seed: u64) -> Self {
        Self {
            post: config.post,
            reach: config.reach,
            notice_chance: config.notice_chance,
            rng: StdRng::seed_from_u64(seed),
            catches: 0,
        }
    }

    /// Thieves this bot has caught.
    pub const fn catches(&self) -> u32 {
        self.catches
    }
}

impl TickCallback for PlayerBot {
    fn on_tick(&mut self, summary: &TickSummary, simulation: &mut Simulation) {
        if summary.game_over {
            return;
        }
        let Some(id) = simulation.nearest_agent(self.post, self.reach) else {
            return;
        };
        if !simulation.agent(id).is_some_and(NpcAgent::stolen) {
            return;
        }
        if self.rng.random::<f64>() >= self.notice_chance {
            return;
        }

        match simulation.interact(Some(id)) {
            Ok(InteractionOutcome::Caught { agent, points }) => {
                self.catches = self.catches.saturating_add(1);
                debug!(tick = summary.tick, agent_id = %agent, points, "Player caught a thief");
            }
            Ok(outcome) => debug!(tick = summary.tick, ?outcome, "Player interaction"),
            Err(e) => warn!(tick = summary.tick, error = %e, "Player interaction failed"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use storefront_core::config::SimulationConfig;
    use storefront_core::{NoOpAlerts, NoOpUi};
    use storefront_types::{AreaId, Waypoint, WaypointTag};
    use storefront_world::{NavigationMode, StoreLayout};

    use super::*;

    /// Every waypoint sits within reach of the post at the origin.
    fn small_store() -> StoreLayout {
        StoreLayout {
            waypoints: vec![
                Waypoint::neutral("entrance", Point::new(0.0, 1.0)),
                Waypoint::new("shelf", Point::new(1.0, 0.0), WaypointTag::Shelf(AreaId(1))),
                Waypoint::neutral("exit", Point::new(0.0, -1.0)),
            ],
            spawn_point: Point::new(-1.0, 0.0),
            zone_radius: 0.25,
            items_per_shelf: 5,
        }
    }

    fn run(player: &PlayerConfig, steal_chance: f64) -> (Simulation, PlayerBot) {
        let mut config = SimulationConfig::default();
        config.session.total_to_spawn = 1;
        config.session.spawn_initial_delay_ms = 100;
        config.agents.idle_dwell_ms = 100;
        config.agents.steal_dwell_min_ms = 500;
        config.agents.steal_dwell_max_ms = 500;
        config.agents.min_steal_chance = steal_chance;
        config.agents.max_steal_chance = steal_chance;
        config.store.navigation = NavigationMode::Teleport;

        let mut sim =
            Simulation::headless(&config, small_store(), Box::new(NoOpUi), Box::new(NoOpAlerts)).unwrap();
        assert!(sim.start_play());
        let mut bot = PlayerBot::new(player, 7);
        for _ in 0..200 {
            let summary = sim.tick().unwrap();
            bot.on_tick(&summary, &mut sim);
            if summary.game_over {
                break;
            }
        }
        (sim, bot)
    }

    fn player(notice_chance: f64) -> PlayerConfig {
        PlayerConfig {
            post: Point::new(0.0, 0.0),
            reach: 5.0,
            notice_chance,
        }
    }

    #[test]
    fn attentive_player_catches_the_thief() {
        let (sim, bot) = run(&player(1.0), 1.0);
        assert_eq!(bot.catches(), 1);
        assert_eq!(sim.session().caught_count(), 1);
        assert_eq!(sim.session().escaped_count(), 0);
        assert_eq!(sim.session().score(), 1);
        assert!(sim.session().is_game_over());
    }

    #[test]
    fn distracted_player_lets_the_thief_go() {
        let (sim, bot) = run(&player(0.0), 1.0);
        assert_eq!(bot.catches(), 0);
        assert_eq!(sim.session().escaped_count(), 1);
    }

    #[test]
    fn honest_customers_are_never_accused() {
        let (sim, bot) = run(&player(1.0), 0.0);
        assert_eq!(bot.catches(), 0);
        assert_eq!(sim.totals().false_accusations, 0);
        assert!(sim.session().is_game_over());
    }
}
