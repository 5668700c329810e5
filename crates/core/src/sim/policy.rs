//! Per-archetype turn decisions, driven by the capability table in `content`.

use super::dice::pick_index;
use super::*;
use crate::content::{AttackPolicy, Cadence, FleePolicy};
use crate::state::{manhattan, neighbors};

impl Sim {
    /// Runs one decision for `id`. Returns false when the actor spent the turn resting.
    pub fn act(&mut self, id: EntityId) -> Result<bool, SimError> {
        let actor = self.world.actors.get(id).ok_or(SimError::UnknownActor(id))?;
        let arch = archetype(actor.kind);
        if let Some(captured) = arch.captured_form
            && self.is_engulfed(actor.pos)
        {
            self.transform(id, captured)?;
            return Ok(true);
        }
        if !self.spend_stamina(id, arch.cadence)? {
            self.push_log(LogEvent::Idle { actor: id });
            return Ok(false);
        }
        match arch.attack {
            AttackPolicy::Idle => self.push_log(LogEvent::Idle { actor: id }),
            AttackPolicy::Hunt { prey, avoid_armored } => {
                self.hunt(id, prey, avoid_armored, arch.flee)?;
            }
        }
        Ok(true)
    }

    /// Visible actors of faction `prey`, in registry order.
    pub fn seen_targets(&self, id: EntityId, prey: Faction) -> Result<Vec<EntityId>, SimError> {
        let candidates: Vec<EntityId> = self
            .world
            .actors
            .values()
            .filter(|actor| actor.id != id && archetype(actor.kind).faction == prey)
            .map(|actor| actor.id)
            .collect();
        self.seen(id, &candidates, true)
    }

    /// Cells on every side are either not floor or hold a slime.
    fn is_engulfed(&self, pos: Pos) -> bool {
        neighbors(pos).into_iter().all(|cell| {
            self.world.map.tile_at(cell) != TileKind::Floor
                || self.world.actors_at(cell).any(|actor| archetype(actor.kind).faction == Faction::Slime)
        })
    }

    fn is_armored(&self, id: EntityId) -> bool {
        self.world.actors.get(id).is_some_and(|actor| archetype(actor.kind).armored)
    }

    fn spend_stamina(&mut self, id: EntityId, cadence: Cadence) -> Result<bool, SimError> {
        let Cadence::Stamina { pool } = cadence else {
            return Ok(true);
        };
        let actor = self.world.actors.get_mut(id).ok_or(SimError::UnknownActor(id))?;
        if actor.stamina > 0 {
            actor.stamina -= 1;
            return Ok(false);
        }
        actor.stamina = pool;
        Ok(true)
    }

    fn hunt(
        &mut self,
        id: EntityId,
        prey: Faction,
        avoid_armored: bool,
        flee: Option<FleePolicy>,
    ) -> Result<(), SimError> {
        let mut targets = self.seen_targets(id, prey)?;
        let any_unarmored = targets.iter().any(|target| !self.is_armored(*target));
        if avoid_armored && any_unarmored {
            let armored: Vec<EntityId> =
                targets.iter().copied().filter(|target| self.is_armored(*target)).collect();
            if let Some(FleePolicy::Terror { radius }) = flee {
                let pos = self.world.actors[id].pos;
                let terrified =
                    armored.iter().any(|threat| manhattan(self.world.actors[*threat].pos, pos) <= radius);
                if terrified && self.minimize_terror(id, &armored)? {
                    return Ok(());
                }
            }
            targets.retain(|target| !armored.contains(target));
        }
        if targets.is_empty() {
            self.push_log(LogEvent::Idle { actor: id });
            return Ok(());
        }
        self.act_toward(id, &targets)
    }

    /// Steps along one of the tied shortest paths to `targets`, attacking whatever
    /// stands on the next cell.
    fn act_toward(&mut self, id: EntityId, targets: &[EntityId]) -> Result<(), SimError> {
        let origin = self.world.actors.get(id).ok_or(SimError::UnknownActor(id))?.pos;
        let mut paths = paths_to_nearest(&mut self.world, origin, targets, ignore_none);
        if paths.is_empty() {
            self.push_log(LogEvent::Idle { actor: id });
            return Ok(());
        }
        let pick = pick_index(&mut self.rng, paths.len());
        match paths[pick].step_forward() {
            Ok(next) => {
                self.attack_move(id, next)?;
            }
            Err(PathError::Exhausted | PathError::NotFound) => {
                let name = self.world.actors[id].name.clone();
                self.flavor(format!("{name} whimpers sadly"));
            }
        }
        Ok(())
    }
}
