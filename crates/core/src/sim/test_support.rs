//! Shared fixtures for the `sim` submodule test suites.
//! Map and actor setup lives here so individual tests stay short.

use super::*;
use crate::state::{Actor, Map, World};
use crate::types::TileKind;

pub(crate) fn open_room_fixture() -> (Map, Pos) {
    let map = Map::new(10, 10);
    let origin = Pos { y: 5, x: 5 };
    (map, origin)
}

pub(crate) fn wall_occlusion_fixture() -> (Map, Pos) {
    let mut map = Map::new(11, 11);
    for y in 1..10 {
        for x in 1..10 {
            map.set_tile(Pos { y, x }, TileKind::Wall);
        }
    }
    for x in 1..10 {
        map.set_tile(Pos { y: 5, x }, TileKind::Floor);
    }
    map.set_tile(Pos { y: 5, x: 6 }, TileKind::Wall);
    (map, Pos { y: 5, x: 3 })
}

pub(crate) fn corner_handle_fixture() -> (Map, Pos) {
    let mut map = Map::new(20, 15);
    for y in 1..(map.internal_height - 1) {
        for x in 1..(map.internal_width - 1) {
            map.set_tile(Pos { y: y as i32, x: x as i32 }, TileKind::Wall);
        }
    }
    for y in 3..=7 {
        for x in 2..=6 {
            map.set_tile(Pos { y, x }, TileKind::Floor);
        }
    }
    map.set_tile(Pos { y: 5, x: 7 }, TileKind::Floor);
    map.set_tile(Pos { y: 5, x: 8 }, TileKind::Wall);
    (map, Pos { y: 5, x: 6 })
}

pub(crate) fn open_world(width: usize, height: usize) -> World {
    World::new(Map::new(width, height))
}

/// A one-cell-wide horizontal corridor at y = 1, x in 1..=5.
pub(crate) fn corridor_world() -> World {
    World::new(Map::new(7, 3))
}

pub(crate) fn spawn_at(world: &mut World, kind: ActorKind, pos: Pos) -> EntityId {
    world.place_actor(Actor::from_archetype(kind, pos))
}

pub(crate) fn seeded_sim(seed: u64, map: Map) -> Sim {
    let config = SimConfig { seed, ..SimConfig::default() };
    Sim::new(&config, map)
}

pub(crate) fn sim_from_ascii(rows: &[&str]) -> Sim {
    let map = Map::from_ascii(rows).expect("fixture map parses");
    seeded_sim(7, map)
}
