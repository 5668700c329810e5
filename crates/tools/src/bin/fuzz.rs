use anyhow::{Result, bail};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use sim_core::content::ALL_KINDS;
use sim_core::{EntryState, Map, Pos, Sim, SimConfig, TileKind, archetype};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    turns: u32,
    #[arg(long, default_value_t = 24)]
    width: usize,
    #[arg(long, default_value_t = 16)]
    height: usize,
    #[arg(long, default_value_t = 30)]
    actors: usize,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn random_sim(args: &Args, rng: &mut ChaCha8Rng) -> Sim {
    let mut map = Map::new(args.width, args.height);
    for y in 1..args.height.saturating_sub(1) {
        for x in 1..args.width.saturating_sub(1) {
            if rng.next_u64() % 8 == 0 {
                map.set_tile(Pos { y: y as i32, x: x as i32 }, TileKind::Wall);
            }
        }
    }
    let floor: Vec<Pos> = map.floor_cells().collect();
    let mut sim = Sim::new(&SimConfig { seed: args.seed, ..SimConfig::default() }, map);
    if floor.is_empty() {
        return sim;
    }
    for _ in 0..args.actors {
        let pos = choose(rng, &floor);
        if sim.world().is_occupied(pos) {
            continue;
        }
        let kind = choose(rng, &ALL_KINDS);
        if let Err(e) = sim.spawn(kind, pos) {
            tracing::warn!(?kind, ?pos, ?e, "spawn rejected");
        }
    }
    sim
}

fn check_invariants(sim: &Sim, last_tick: u64) -> Result<()> {
    if sim.current_tick() < last_tick {
        bail!("Invariant failed: clock went from {last_tick} back to {}", sim.current_tick());
    }
    let map = &sim.world().map;
    let mut scheduled = 0;
    for actor in sim.world().actors.values() {
        if !map.in_bounds(actor.pos) || map.tile_at(actor.pos) != TileKind::Floor {
            bail!("Invariant failed: {actor:?} is not on a floor cell");
        }
        let state = sim.scheduler().state(actor.id);
        if archetype(actor.kind).schedulable {
            if state == EntryState::Removed {
                bail!("Invariant failed: {actor:?} fell out of the turn queue");
            }
            scheduled += 1;
        } else if state != EntryState::Removed {
            bail!("Invariant failed: passive {actor:?} is scheduled");
        }
    }
    if sim.scheduler().len() != scheduled {
        bail!(
            "Invariant failed: {} queue entries for {scheduled} schedulable actors",
            sim.scheduler().len()
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    println!("Starting fuzz harness on seed {} for max {} turns...", args.seed, args.turns);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut sim = random_sim(&args, &mut rng);
    check_invariants(&sim, 0)?;

    let mut turns = 0;
    let mut last_tick = sim.current_tick();
    while turns < args.turns {
        if sim.step().is_none() {
            println!("No schedulable actors left after {turns} turns");
            break;
        }
        turns += 1;
        check_invariants(&sim, last_tick)?;
        last_tick = sim.current_tick();

        // Occasionally destroy something so transformation paths get exercised too.
        if rng.next_u64() % 50 == 0 {
            let ids: Vec<_> = sim.world().actors.keys().collect();
            if !ids.is_empty() {
                let victim = choose(&mut rng, &ids);
                sim.destroy(victim).map_err(|e| anyhow::anyhow!("destroy failed: {e:?}"))?;
                check_invariants(&sim, last_tick)?;
            }
        }
    }

    println!(
        "Fuzzing completed: {turns} turns, final tick {last_tick}, hash {:#018x}",
        sim.snapshot_hash()
    );
    Ok(())
}
