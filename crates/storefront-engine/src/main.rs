//! Headless engine binary for the Storefront simulation.
//!
//! Loads configuration, builds the default store, and runs a full play
//! session with an automated player until the session ends or an operator
//! bound is hit. The end-of-session report is printed to stdout as JSON.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `storefront-config.yaml` (or the path given
//!    as the first argument)
//! 2. Initialize structured logging (tracing)
//! 3. Build the default store layout
//! 4. Build the simulation with tracing sinks and start play
//! 5. Create operator state from simulation bounds; Ctrl-C requests a stop
//! 6. Run the simulation loop with the automated player
//! 7. Log the result and print the report

mod error;
mod player;
mod sinks;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use storefront_core::config::{LoggingConfig, SimulationConfig};
use storefront_core::operator::OperatorState;
use storefront_core::{Simulation, runner};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::player::PlayerBot;
use crate::sinks::{TracingAlerts, TracingUi};

/// Default configuration file, relative to the working directory.
const CONFIG_FILE: &str = "storefront-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the simulation itself fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration.
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from);
    let config = load_config(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!("storefront-engine starting");
    info!(
        store = config.world.name,
        seed = config.world.seed,
        tick_duration_ms = config.world.tick_duration_ms,
        tick_interval_ms = config.world.tick_interval_ms,
        total_to_spawn = config.session.total_to_spawn,
        navigation = ?config.store.navigation,
        "Configuration loaded"
    );

    let report = run(&config).await.context("running simulation")?;
    println!("{report}");
    Ok(())
}

/// Build, run and report one session.
async fn run(config: &SimulationConfig) -> Result<String, EngineError> {
    // 3. Build the default store layout.
    let layout =
        storefront_world::create_default_store(config.store.items_per_shelf, config.store.zone_radius)?;
    info!(
        waypoints = layout.waypoints.len(),
        shelves = layout.shelf_stops(),
        items_per_shelf = layout.items_per_shelf,
        "Store layout created"
    );

    // 4. Build the simulation and start play.
    let mut simulation = Simulation::headless(
        config,
        layout,
        Box::new(TracingUi::new()),
        Box::new(TracingAlerts::new()),
    )?;
    if !simulation.start_play() {
        warn!("Session was not in the menu; play not started");
    }

    // 5. Create operator state.
    let operator = Arc::new(OperatorState::new(
        config.world.tick_interval_ms,
        &config.simulation,
    ));
    {
        let operator = Arc::clone(&operator);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Ctrl-C received, stopping");
                operator.request_stop();
            }
        });
    }

    // 6. Run the simulation.
    let mut player = PlayerBot::new(&config.player, config.world.seed.wrapping_add(1));
    let result = runner::run_simulation(&mut simulation, &operator, &mut player).await?;

    // 7. Log results.
    runner::log_simulation_end(&result);
    let report = simulation.report()?;
    info!(
        end_reason = ?result.end_reason,
        score = report.session.score,
        caught = report.session.caught_count,
        escaped = report.session.escaped_count,
        player_catches = player.catches(),
        items_stolen = report.totals.items_stolen,
        "storefront-engine shutdown complete"
    );
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Load the simulation configuration.
///
/// A missing file is not an error; defaults are used instead.
fn load_config(path: &Path) -> Result<SimulationConfig, EngineError> {
    if path.exists() {
        Ok(SimulationConfig::from_file(path)?)
    } else {
        Ok(SimulationConfig::parse("")?)
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}
