//! Patrol Sim - headless runner for a single patrol agent
//!
//! Loads a scenario (see [`sim_config`]), drives the agent for a fixed number
//! of ticks and logs what it does.
//!
//! ```text
//! patrol-sim [scenario.toml]
//! RUST_LOG=debug PATROL_MODE=ping_pong patrol-sim
//! ```

mod scenario;
mod sim_config;

use scenario::{describe_overlay, Scenario};
use sim_config::{SimConfig, SimError};
use std::path::PathBuf;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), SimError> {
    // First non-flag argument is the scenario path
    let explicit = std::env::args()
        .skip(1)
        .find(|arg| !arg.starts_with("--"))
        .map(PathBuf::from);

    let config = SimConfig::load(explicit.as_deref())?;
    log::info!(
        "Scenario: {} waypoints, {} backend, {} pathing, {} on failure",
        config.waypoints.len(),
        config.sim.backend,
        config.agent.pathing_mode,
        config.agent.failure_response
    );

    let mut scenario = Scenario::build(config)?;
    log::info!(
        "Route covers {} of {} registered waypoints",
        scenario.agent().graph().len(),
        scenario.registry().len()
    );

    let report = scenario.run();
    log::info!(
        "Ran {} ticks: {} arrivals, {} departures, finished: {}, final position {}",
        report.ticks,
        report.arrivals,
        report.departures,
        report.finished,
        report.final_position
    );

    if let Some(overlay) = scenario.overlay() {
        print!("{}", describe_overlay(&overlay));
    }

    Ok(())
}
