use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sim_core::{AdvanceStopReason, LogEvent, Scenario};
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a scenario file and run it for a number of turns
    Run {
        /// Scenario file (.json or .toml)
        #[arg(short, long)]
        scenario: PathBuf,
        #[arg(short, long, default_value_t = 100)]
        turns: u32,
        /// Overrides the seed stored in the scenario
        #[arg(long)]
        seed: Option<u64>,
        /// Number of trailing log entries to print
        #[arg(long, default_value_t = 20)]
        log_tail: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .init();

    let args = Args::parse();
    match args.command {
        Command::Run { scenario, turns, seed, log_tail } => run(&scenario, turns, seed, log_tail),
    }
}

fn run(path: &Path, turns: u32, seed: Option<u64>, log_tail: usize) -> Result<()> {
    let mut scenario = Scenario::load(path)
        .with_context(|| format!("Failed to load scenario: {}", path.display()))?;
    if let Some(seed) = seed {
        scenario.config.seed = seed;
    }
    let mut sim = scenario.build().map_err(|e| anyhow::anyhow!("Invalid scenario: {e:?}"))?;
    tracing::info!(seed = sim.seed(), turns, "running scenario");

    let mut stop_reason = AdvanceStopReason::BudgetExhausted;
    for _ in 0..turns {
        let Some(turn) = sim.step() else {
            stop_reason = AdvanceStopReason::NoSchedulableActors;
            break;
        };
        let pos = sim.world().actors.get(turn.actor).map(|actor| actor.pos);
        println!(
            "tick {:>6}  {:<20} {}  {:?}",
            turn.tick,
            format!("{:?}", turn.kind),
            if turn.acted { "acted " } else { "rested" },
            pos
        );
    }

    let log = sim.log();
    println!("--- last {} log entries ---", log_tail.min(log.len()));
    for event in &log[log.len().saturating_sub(log_tail)..] {
        match event {
            LogEvent::Flavor(text) => println!("{text}"),
            other => println!("{other:?}"),
        }
    }

    println!("Stop reason: {stop_reason:?}");
    println!("Final Tick: {}", sim.current_tick());
    println!("Actors: {}", sim.world().actors.len());
    println!("Snapshot Hash: {:#018x}", sim.snapshot_hash());
    Ok(())
}
