use std::fs;
use std::io::ErrorKind;

use sim_core::{ActorKind, ConfigError, Pos, Scenario};
use tempfile::tempdir;

const TOML_SCENARIO: &str = r#"
map = [
    '#######',
    '#.....#',
    '#.....#',
    '#######',
]

[config]
seed = 77
log_limit = 16

[[spawns]]
kind = "Militia"
x = 1
y = 1

[[spawns]]
kind = "Maw"
x = 5
y = 2
"#;

#[test]
fn toml_and_json_files_load_to_the_same_scenario() {
    let dir = tempdir().expect("tempdir");
    let toml_path = dir.path().join("arena.toml");
    fs::write(&toml_path, TOML_SCENARIO).expect("write toml");

    let from_toml = Scenario::load(&toml_path).expect("load toml");
    assert_eq!(from_toml.config.seed, 77);
    assert_eq!(from_toml.config.log_limit, 16);
    assert_eq!(from_toml.config.first_turn_delay, 0);

    let json_path = dir.path().join("arena.json");
    fs::write(&json_path, serde_json::to_string_pretty(&from_toml).expect("encode")).expect("write json");
    let from_json = Scenario::load(&json_path).expect("load json");
    assert_eq!(from_toml, from_json);
}

#[test]
fn loaded_scenario_builds_a_running_sim() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("arena.toml");
    fs::write(&path, TOML_SCENARIO).expect("write");

    let mut sim = Scenario::load(&path).expect("load").build().expect("build");
    let militia = sim.world().actors_at(Pos { y: 1, x: 1 }).next().expect("militia").id;
    assert_eq!(sim.world().actors[militia].kind, ActorKind::Militia);

    sim.advance(10);
    assert!(sim.log().len() <= 16);
    assert_ne!(sim.world().actors[militia].pos, Pos { y: 1, x: 1 }, "militia chased the maw");
}

#[test]
fn broken_files_surface_as_invalid_data() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ \"map\": 3 }").expect("write");
    let err = Scenario::load(&path).expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::InvalidData);

    let missing = dir.path().join("missing.toml");
    assert_eq!(Scenario::load(&missing).expect_err("missing").kind(), ErrorKind::NotFound);
}

#[test]
fn ragged_maps_are_rejected_at_build_time() {
    let scenario = Scenario::from_toml_str("map = ['###', '#.', '###']").expect("parse");
    assert_eq!(scenario.build().err(), Some(ConfigError::RaggedRow { row: 1 }));
}
