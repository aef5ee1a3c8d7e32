//! Async run loop around [`Simulation::tick`].
//!
//! [`run_simulation`] ticks until the session ends or the operator bounds
//! say stop, honouring pause and the runtime-adjustable pacing from
//! [`OperatorState`]. After every tick a [`TickCallback`] gets the summary
//! and mutable access to the simulation, which is where a host injects
//! player input.

use std::sync::Arc;

use tracing::{info, warn};

use crate::operator::{OperatorState, SimulationEndReason};
use crate::tick::{Simulation, TickError, TickSummary};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the run ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
}

/// Callback invoked after each tick completes.
///
/// The callback gets mutable access to the simulation, so hosts can use it
/// to feed player input (interactions, menu transitions) between ticks.
pub trait TickCallback: Send {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, simulation: &mut Simulation);
}

/// A no-op tick callback for testing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _simulation: &mut Simulation) {}
}

/// Run the simulation loop until a termination condition is met.
///
/// Pause, stop and the wall-clock bound are checked before each tick;
/// game over and the tick bound after it.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick execution fails unrecoverably.
pub async fn run_simulation(
    simulation: &mut Simulation,
    operator: &Arc<OperatorState>,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;

    info!(
        max_ticks = operator.max_ticks(),
        max_real_time_seconds = operator.max_real_time_seconds(),
        tick_interval_ms = operator.tick_interval_ms(),
        "Simulation starting"
    );

    let end_reason = loop {
        if operator.is_paused() {
            info!(tick = simulation.clock().tick(), "Simulation paused");
            operator.wait_while_paused().await;
            info!(tick = simulation.clock().tick(), "Simulation resumed");
        }
        if let Some(reason) = before_tick(operator) {
            break reason;
        }

        let summary = simulation.tick()?;
        total_ticks = total_ticks.saturating_add(1);
        callback.on_tick(&summary, simulation);

        let reason = after_tick(operator, &summary);
        last_summary = Some(summary);
        if let Some(reason) = reason {
            break reason;
        }

        match operator.tick_interval_ms() {
            0 => tokio::task::yield_now().await,
            ms => tokio::time::sleep(tokio::time::Duration::from_millis(ms)).await,
        }
    };

    operator.set_end_reason(end_reason);
    Ok(SimulationResult {
        end_reason,
        final_summary: last_summary,
        total_ticks,
    })
}

fn before_tick(operator: &OperatorState) -> Option<SimulationEndReason> {
    if operator.is_stop_requested() {
        info!("Operator stop requested");
        return Some(SimulationEndReason::OperatorStop);
    }
    if operator.time_limit_reached() {
        info!(
            max_seconds = operator.max_real_time_seconds(),
            elapsed = operator.elapsed_seconds(),
            "Real-time limit reached"
        );
        return Some(SimulationEndReason::MaxRealTimeReached);
    }
    None
}

fn after_tick(operator: &OperatorState, summary: &TickSummary) -> Option<SimulationEndReason> {
    if summary.game_over {
        info!(tick = summary.tick, "Session over");
        return Some(SimulationEndReason::GameOver);
    }
    if operator.tick_limit_reached(summary.tick) {
        info!(tick = summary.tick, max_ticks = operator.max_ticks(), "Tick limit reached");
        return Some(SimulationEndReason::MaxTicksReached);
    }
    None
}

/// Log the end of the run.
pub fn log_simulation_end(result: &SimulationResult) {
    match result.final_summary {
        Some(ref last) => info!(
            reason = ?result.end_reason,
            total_ticks = result.total_ticks,
            last_tick = last.tick,
            simulated_ms = last.now_ms,
            agents_left = last.agents_active,
            "Simulation ended"
        ),
        None => warn!(reason = ?result.end_reason, "Simulation ended before its first tick"),
    }
}
