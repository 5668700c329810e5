use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct EntityId;
    pub struct ItemId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TileKind {
    Wall,
    Floor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Faction {
    Slime,
    Human,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    Membrane,
    ReinforcedMembrane,
    ForceField,
    NonNewtonianMembrane,
    Maw,
    ReinforcedMaw,
    Tentacle,
    Militia,
    Tank,
    CapturedTank,
    City,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Stayed,
    Moved(Pos),
    Swapped(EntityId),
    Attacked(EntityId),
    Blocked,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogEvent {
    Flavor(String),
    Idle { actor: EntityId },
    Moved { actor: EntityId, from: Pos, to: Pos },
    Swapped { actor: EntityId, occupant: EntityId },
    Attacked { attacker: EntityId, target: EntityId },
    Fled { actor: EntityId, to: Pos },
    Transformed { from: EntityId, into: EntityId, kind: ActorKind },
    Destroyed { actor: EntityId, kind: ActorKind },
    ItemDropped { item: ItemId, pos: Pos },
    ItemCrushed { name: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnReport {
    pub tick: u64,
    pub actor: EntityId,
    pub kind: ActorKind,
    pub acted: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdvanceStopReason {
    BudgetExhausted,
    NoSchedulableActors,
}

#[derive(Clone, Copy, Debug)]
pub struct AdvanceResult {
    pub turns: u32,
    pub stop_reason: AdvanceStopReason,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathError {
    /// No route exists under the current obstruction rules.
    NotFound,
    /// The path has no further steps to advance.
    Exhausted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimError {
    UnknownActor(EntityId),
    OutOfBounds(Pos),
    InvalidDelay,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    EmptyMap,
    RaggedRow { row: usize },
    UnknownGlyph { glyph: char, row: usize, col: usize },
    SpawnOutOfBounds { kind: ActorKind, pos: Pos },
    SpawnOnWall { kind: ActorKind, pos: Pos },
    Parse(String),
}
