use sim_core::{ActorKind, AdvanceStopReason, EntryState, Map, Pos, Sim, SimConfig};

fn sim_on(map: Map) -> Sim {
    Sim::new(&SimConfig::default(), map)
}

#[test]
fn equal_delays_interleave_in_insertion_order() {
    let mut sim = sim_on(Map::new(12, 12));
    let a = sim.spawn(ActorKind::Maw, Pos { y: 2, x: 2 }).expect("spawn a");
    let b = sim.spawn(ActorKind::Maw, Pos { y: 8, x: 8 }).expect("spawn b");
    sim.set_delay(a, 4).expect("delay a");
    sim.set_delay(b, 4).expect("delay b");

    let turns: Vec<_> = (0..6).filter_map(|_| sim.step()).collect();
    let order: Vec<_> = turns.iter().map(|turn| turn.actor).collect();
    let ticks: Vec<_> = turns.iter().map(|turn| turn.tick).collect();
    assert_eq!(order, vec![a, b, a, b, a, b]);
    assert_eq!(ticks, vec![0, 0, 4, 4, 8, 8]);
}

#[test]
fn faster_archetypes_get_more_turns() {
    let mut sim = sim_on(Map::new(12, 12));
    let tentacle = sim.spawn(ActorKind::Tentacle, Pos { y: 2, x: 2 }).expect("spawn");
    let maw = sim.spawn(ActorKind::Maw, Pos { y: 9, x: 9 }).expect("spawn");

    let turns: Vec<_> = (0..20).filter_map(|_| sim.step()).collect();
    let tentacle_turns = turns.iter().filter(|turn| turn.actor == tentacle).count();
    let maw_turns = turns.iter().filter(|turn| turn.actor == maw).count();
    assert_eq!(tentacle_turns, 16);
    assert_eq!(maw_turns, 4);
}

#[test]
fn captured_actor_loses_its_turns_to_the_replacement() {
    let mut sim = sim_on(Map::new(12, 12));
    let tank = sim.spawn(ActorKind::Tank, Pos { y: 5, x: 5 }).expect("spawn");
    let captured = sim.transform(tank, ActorKind::CapturedTank).expect("transform");

    assert_eq!(sim.scheduler().state(tank), EntryState::Removed);
    let turns: Vec<_> = (0..3).filter_map(|_| sim.step()).collect();
    assert!(turns.iter().all(|turn| turn.actor == captured));
    assert_eq!(turns.iter().map(|turn| turn.tick).collect::<Vec<_>>(), vec![16, 32, 48]);
}

#[test]
fn removed_during_own_turn_is_not_requeued() {
    let mut sim = sim_on(Map::from_ascii(&["#####", "#...#", "#####"]).expect("map"));
    let tank = sim.spawn(ActorKind::Tank, Pos { y: 1, x: 2 }).expect("spawn");
    sim.spawn(ActorKind::Maw, Pos { y: 1, x: 1 }).expect("spawn");
    sim.spawn(ActorKind::Membrane, Pos { y: 1, x: 3 }).expect("spawn");

    let first = sim.step().expect("turn");
    assert_eq!(first.actor, tank);
    assert_eq!(sim.scheduler().state(tank), EntryState::Removed);
    assert!(!sim.world().actors.contains_key(tank));
}

#[test]
fn advance_reports_why_it_stopped() {
    let mut sim = sim_on(Map::new(8, 8));
    let militia = sim.spawn(ActorKind::Militia, Pos { y: 3, x: 3 }).expect("spawn");
    let budget = sim.advance(5);
    assert_eq!(budget.turns, 5);
    assert_eq!(budget.stop_reason, AdvanceStopReason::BudgetExhausted);

    sim.destroy(militia).expect("destroy");
    let drained = sim.advance(5);
    assert_eq!(drained.turns, 0);
    assert_eq!(drained.stop_reason, AdvanceStopReason::NoSchedulableActors);
}
