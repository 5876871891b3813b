//! Runs the leader-election controller against the built-in crossing simulation.
//!
//! Usage: `traffic-leader <scenario.json> [controller.json]`

use std::time::Instant;

use anyhow::{Context, Result};
use traffic_leader::crossing::{CrossingAttributes, CrossingSim, Scenario};
use traffic_leader::{ControlLoop, Controller, ControllerConfig};

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let scenario_path = args
        .next()
        .context("usage: traffic-leader <scenario.json> [controller.json]")?;
    let scenario = Scenario::from_path(&scenario_path)
        .with_context(|| format!("loading scenario {scenario_path}"))?;
    let config = match args.next() {
        Some(path) => ControllerConfig::from_path(&path)
            .with_context(|| format!("loading controller config {path}"))?,
        None => ControllerConfig::default(),
    };

    let attribs = CrossingAttributes {
        intersection: config.intersection.clone(),
        centre: config.centre,
        ..Default::default()
    };
    let mut sim = CrossingSim::new(attribs, &scenario);
    sim.check_phases(&config.phases)
        .context("controller phases do not fit the crossing's signal program")?;
    let mut control = ControlLoop::new(Controller::new(config, scenario.route_axes()));

    println!("Simulating {} departures...", scenario.departures.len());
    let start = Instant::now();
    let report = control.run(&mut sim)?;
    println!(
        "Done in {:?}: {} ticks, {} elections, {} phase commands",
        start.elapsed(),
        report.ticks,
        report.elections,
        report.phase_commands,
    );
    Ok(())
}
