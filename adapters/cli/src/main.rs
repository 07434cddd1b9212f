#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Path Defence scenario headlessly.

mod config;
mod simulation;

use std::{path::PathBuf, time::Duration};

use anyhow::{ensure, Result};
use clap::Parser;

use config::Scenario;
use simulation::Simulation;

/// Runs a tower defence scenario and reports how the followers fared.
#[derive(Debug, Parser)]
#[command(name = "path-defence", version)]
struct Args {
    /// TOML scenario file; built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Upper bound on simulated time, in seconds.
    #[arg(short, long, default_value_t = 120.0)]
    duration: f64,

    /// Length of a single simulation frame, in milliseconds.
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
}

/// Entry point for the Path Defence command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    ensure!(args.tick_ms > 0, "--tick-ms must be greater than zero");
    let limit = Duration::try_from_secs_f64(args.duration)
        .map_err(|error| anyhow::anyhow!("invalid --duration {}: {error}", args.duration))?;

    let scenario = match &args.config {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default(),
    };

    let mut simulation = Simulation::new(&scenario)?;
    let dt = Duration::from_millis(args.tick_ms);
    let mut elapsed = Duration::ZERO;
    while elapsed < limit && !simulation.is_settled() {
        simulation.step(dt);
        elapsed += dt;
    }

    if !simulation.is_settled() {
        log::warn!("stopped after {:.1}s with followers still in play", elapsed.as_secs_f32());
    }

    let summary = simulation.summary();
    println!(
        "{} spawned, {} killed, {} escaped; {} shots fired, {} hit; {:.2}s simulated",
        summary.spawned,
        summary.killed,
        summary.escaped,
        summary.shots_fired,
        summary.hits,
        summary.elapsed.as_secs_f32()
    );

    Ok(())
}
