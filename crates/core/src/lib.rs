pub mod config;
pub mod content;
pub mod sim;
pub mod state;
pub mod types;

pub use config::{Scenario, SimConfig, SpawnSpec};
pub use content::{Archetype, archetype};
pub use sim::{EntryState, FieldOfView, Path, Sim, UphillStep};
pub use state::{Actor, Item, Map, World};
pub use types::*;
