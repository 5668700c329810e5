//! Run configuration and scenario files.
//! A scenario is an ASCII map plus a spawn list; JSON and TOML encodings are accepted.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::content::archetype;
use crate::sim::Sim;
use crate::state::Map;
use crate::types::{ActorKind, ConfigError, Pos, TileKind};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SimConfig {
    pub seed: u64,
    /// Ticks before a newly spawned actor's first turn.
    pub first_turn_delay: u32,
    /// Oldest log entries are dropped past this length.
    pub log_limit: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { seed: 0, first_turn_delay: 0, log_limit: 512 }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SpawnSpec {
    pub kind: ActorKind,
    pub x: i32,
    pub y: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Scenario {
    #[serde(default)]
    pub config: SimConfig,
    pub map: Vec<String>,
    #[serde(default)]
    pub spawns: Vec<SpawnSpec>,
}

impl Scenario {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reads a scenario file; `.toml` files are parsed as TOML, anything else as JSON.
    pub fn load(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        let is_toml = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let parsed = if is_toml { Self::from_toml_str(&content) } else { Self::from_json_str(&content) };
        parsed.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("{e:?}")))
    }

    /// Validates the map and spawn list, then spawns every actor in list order.
    pub fn build(&self) -> Result<Sim, ConfigError> {
        let map = Map::from_ascii(self.map.as_slice())?;
        for spawn in &self.spawns {
            let pos = Pos { y: spawn.y, x: spawn.x };
            if !map.in_bounds(pos) {
                return Err(ConfigError::SpawnOutOfBounds { kind: spawn.kind, pos });
            }
            if map.tile_at(pos) != TileKind::Floor {
                return Err(ConfigError::SpawnOnWall { kind: spawn.kind, pos });
            }
        }

        let mut sim = Sim::new(&self.config, map);
        for spawn in &self.spawns {
            let pos = Pos { y: spawn.y, x: spawn.x };
            sim.spawn(spawn.kind, pos)
                .map_err(|_| ConfigError::SpawnOutOfBounds { kind: spawn.kind, pos })?;
        }
        tracing::debug!(
            actors = self.spawns.len(),
            scheduled = self.spawns.iter().filter(|s| archetype(s.kind).schedulable).count(),
            "scenario built"
        );
        Ok(sim)
    }
}
