use sim_core::{ActorKind, Scenario, SimConfig, SpawnSpec, TileKind};

fn arena(seed: u64) -> Scenario {
    let mut map = vec!["##############".to_string()];
    for _ in 0..8 {
        map.push("#............#".to_string());
    }
    map.push("##############".to_string());
    let spawn = |kind, x, y| SpawnSpec { kind, x, y };
    Scenario {
        config: SimConfig { seed, ..SimConfig::default() },
        map,
        spawns: vec![
            spawn(ActorKind::Militia, 2, 2),
            spawn(ActorKind::Militia, 3, 7),
            spawn(ActorKind::Tank, 6, 4),
            spawn(ActorKind::Maw, 9, 3),
            spawn(ActorKind::Tentacle, 10, 6),
            spawn(ActorKind::ReinforcedMaw, 11, 2),
            spawn(ActorKind::Membrane, 8, 4),
            spawn(ActorKind::City, 1, 8),
        ],
    }
}

fn run_trace(seed: u64, turns: u32) -> (Vec<(u64, ActorKind, bool)>, u64) {
    let mut sim = arena(seed).build().expect("arena builds");
    let mut trace = Vec::new();
    for _ in 0..turns {
        let Some(turn) = sim.step() else { break };
        trace.push((turn.tick, turn.kind, turn.acted));
    }
    (trace, sim.snapshot_hash())
}

#[test]
fn identical_seeds_produce_identical_traces_and_hashes() {
    let (trace_a, hash_a) = run_trace(12345, 200);
    let (trace_b, hash_b) = run_trace(12345, 200);
    assert_eq!(trace_a, trace_b);
    assert_eq!(hash_a, hash_b, "identical runs must produce identical hashes");
}

#[test]
fn turn_ticks_never_decrease() {
    let (trace, _) = run_trace(7, 300);
    assert!(trace.windows(2).all(|pair| pair[0].0 <= pair[1].0));
}

#[test]
fn actors_stay_on_floor_inside_the_map() {
    let mut sim = arena(99).build().expect("arena builds");
    for _ in 0..300 {
        if sim.step().is_none() {
            break;
        }
        let map = &sim.world().map;
        for actor in sim.world().actors.values() {
            assert!(map.in_bounds(actor.pos), "{actor:?} left the map");
            assert_eq!(map.tile_at(actor.pos), TileKind::Floor, "{actor:?} is in a wall");
        }
    }
}
