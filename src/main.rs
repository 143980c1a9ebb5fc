use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use statecraft::{
    engine::{EngineBuilder, EngineSettings},
    scenario::ScenarioLoader,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Headless national-economy simulator")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/baseline.yaml")]
    scenario: PathBuf,

    /// Override the simulated week count (uses the scenario default when omitted)
    #[arg(long)]
    weeks: Option<u64>,

    /// Override the random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override snapshot interval in weeks (0 disables snapshots)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for state snapshots
    #[arg(long, default_value = "snapshots")]
    snapshot_dir: PathBuf,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;
    let weeks = scenario.weeks(cli.weeks);

    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        seed: cli.seed.unwrap_or(scenario.seed),
        snapshot_interval_weeks: cli
            .snapshot_interval
            .unwrap_or(scenario.snapshot_interval_weeks),
        snapshot_dir: cli.snapshot_dir,
    };

    let mut engine = EngineBuilder::new(settings)
        .with_state(scenario.build_state())
        .with_default_systems()
        .build();

    engine.run_with_hook(weeks, |summary| {
        for event in &summary.events {
            tracing::info!(week = summary.week, kind = %event.kind, "{}", event.message);
        }
    })?;

    let snapshot = engine.economic_state();
    println!(
        "Scenario '{}' completed after {} weeks. GDP growth {:.2}%, unemployment {:.1}%, \
         inflation {:.1}%, confidence {:.0}, cycle phase {}.",
        scenario.name,
        weeks,
        snapshot.metrics.gdp_growth,
        snapshot.metrics.unemployment,
        snapshot.metrics.inflation,
        snapshot.metrics.confidence,
        snapshot.cycle.phase
    );
    Ok(())
}
