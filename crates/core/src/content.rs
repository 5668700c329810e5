use crate::types::{ActorKind, Faction};

pub mod components {
    pub const BARBED_WIRE: &str = "Barbed Wire";
    pub const NUTRIENT: &str = "Nutrient";
    pub const CALCIUM_DUST: &str = "Calcium Dust";
    pub const SILICON_DUST: &str = "Silicon Dust";
}

use components::{BARBED_WIRE, CALCIUM_DUST, NUTRIENT, SILICON_DUST};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttackPolicy {
    Idle,
    /// Pursue the nearest visible target. With `avoid_armored`, armored targets are
    /// ignored unless they are the only ones in view.
    Hunt { prey: Faction, avoid_armored: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FleePolicy {
    /// Step away from visible armored threats once one is within `radius`.
    Terror { radius: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cadence {
    EveryTurn,
    /// Rest while stamina remains, then refill the pool and act.
    Stamina { pool: u8 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DestroyRule {
    Remove,
    Revert(ActorKind),
    DropComponents,
}

#[derive(Clone, Copy, Debug)]
pub struct Archetype {
    pub name: &'static str,
    pub faction: Faction,
    pub awareness: i32,
    pub delay: u32,
    pub schedulable: bool,
    pub armored: bool,
    /// May be swapped with or trampled as a stepping stone.
    pub displaceable: bool,
    pub attack: AttackPolicy,
    pub flee: Option<FleePolicy>,
    pub cadence: Cadence,
    /// Form taken when surrounded on every side; `None` if the kind cannot be engulfed.
    pub captured_form: Option<ActorKind>,
    pub on_destroy: DestroyRule,
    pub components: &'static [&'static str],
}

const PASSIVE_ORGANELLE: Archetype = Archetype {
    name: "Membrane",
    faction: Faction::Slime,
    awareness: 0,
    delay: 16,
    schedulable: false,
    armored: false,
    displaceable: true,
    attack: AttackPolicy::Idle,
    flee: None,
    cadence: Cadence::EveryTurn,
    captured_form: None,
    on_destroy: DestroyRule::DropComponents,
    components: &[BARBED_WIRE, NUTRIENT],
};

const HUNT_HUMANS: AttackPolicy = AttackPolicy::Hunt { prey: Faction::Human, avoid_armored: true };

const MAW: Archetype = Archetype {
    name: "Maw",
    awareness: 1,
    schedulable: true,
    attack: HUNT_HUMANS,
    components: &[BARBED_WIRE, NUTRIENT, SILICON_DUST],
    ..PASSIVE_ORGANELLE
};

const MILITIA: Archetype = Archetype {
    name: "Militia",
    faction: Faction::Human,
    awareness: 5,
    delay: 16,
    schedulable: true,
    armored: false,
    displaceable: true,
    attack: AttackPolicy::Hunt { prey: Faction::Slime, avoid_armored: false },
    flee: None,
    cadence: Cadence::EveryTurn,
    captured_form: None,
    on_destroy: DestroyRule::Remove,
    components: &[],
};

static ARCHETYPES: [Archetype; 11] = [
    PASSIVE_ORGANELLE,
    Archetype {
        name: "Reinforced Membrane",
        components: &[BARBED_WIRE, NUTRIENT, CALCIUM_DUST, CALCIUM_DUST],
        ..PASSIVE_ORGANELLE
    },
    Archetype {
        name: "Force Field",
        components: &[
            BARBED_WIRE,
            NUTRIENT,
            CALCIUM_DUST,
            CALCIUM_DUST,
            CALCIUM_DUST,
            CALCIUM_DUST,
            CALCIUM_DUST,
        ],
        ..PASSIVE_ORGANELLE
    },
    Archetype {
        name: "Non-Newtonian Membrane",
        components: &[BARBED_WIRE, NUTRIENT, CALCIUM_DUST, CALCIUM_DUST, SILICON_DUST],
        ..PASSIVE_ORGANELLE
    },
    MAW,
    Archetype {
        name: "Reinforced Maw",
        attack: AttackPolicy::Hunt { prey: Faction::Human, avoid_armored: false },
        components: &[BARBED_WIRE, NUTRIENT, SILICON_DUST, CALCIUM_DUST, CALCIUM_DUST, CALCIUM_DUST],
        ..MAW
    },
    Archetype {
        name: "Tentacle",
        awareness: 3,
        delay: 4,
        flee: Some(FleePolicy::Terror { radius: 1 }),
        components: &[BARBED_WIRE, NUTRIENT, SILICON_DUST, SILICON_DUST, SILICON_DUST, SILICON_DUST],
        ..MAW
    },
    MILITIA,
    Archetype {
        name: "Tank",
        awareness: 3,
        armored: true,
        displaceable: false,
        cadence: Cadence::Stamina { pool: 2 },
        captured_form: Some(ActorKind::CapturedTank),
        on_destroy: DestroyRule::DropComponents,
        components: &[CALCIUM_DUST],
        ..MILITIA
    },
    Archetype {
        name: "Dissolving Tank",
        faction: Faction::Slime,
        awareness: 0,
        attack: AttackPolicy::Idle,
        on_destroy: DestroyRule::Revert(ActorKind::Tank),
        ..MILITIA
    },
    Archetype {
        name: "City",
        awareness: 0,
        schedulable: false,
        displaceable: false,
        attack: AttackPolicy::Idle,
        ..MILITIA
    },
];

pub fn archetype(kind: ActorKind) -> &'static Archetype {
    let index = match kind {
        ActorKind::Membrane => 0,
        ActorKind::ReinforcedMembrane => 1,
        ActorKind::ForceField => 2,
        ActorKind::NonNewtonianMembrane => 3,
        ActorKind::Maw => 4,
        ActorKind::ReinforcedMaw => 5,
        ActorKind::Tentacle => 6,
        ActorKind::Militia => 7,
        ActorKind::Tank => 8,
        ActorKind::CapturedTank => 9,
        ActorKind::City => 10,
    };
    &ARCHETYPES[index]
}

pub const ALL_KINDS: [ActorKind; 11] = [
    ActorKind::Membrane,
    ActorKind::ReinforcedMembrane,
    ActorKind::ForceField,
    ActorKind::NonNewtonianMembrane,
    ActorKind::Maw,
    ActorKind::ReinforcedMaw,
    ActorKind::Tentacle,
    ActorKind::Militia,
    ActorKind::Tank,
    ActorKind::CapturedTank,
    ActorKind::City,
];
