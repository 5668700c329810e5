//! Movement, transformation and destruction of actors.
//! Every change of identity goes through here so the world and the turn queue never
//! disagree about which actors exist.

use super::dice::pick_index;
use super::*;
use crate::content::DestroyRule;

impl Sim {
    /// Moves `id` onto `dest`, swapping with a displaceable ally or attacking an enemy
    /// standing there. Damage is not resolved here; an attacked target stays put.
    pub fn attack_move(&mut self, id: EntityId, dest: Pos) -> Result<MoveOutcome, SimError> {
        let actor = self.world.actors.get(id).ok_or(SimError::UnknownActor(id))?;
        let from = actor.pos;
        let faction = archetype(actor.kind).faction;
        if dest == from {
            return Ok(MoveOutcome::Stayed);
        }
        if !self.world.map.in_bounds(dest) {
            return Ok(MoveOutcome::Blocked);
        }

        let occupant = self
            .world
            .actors_at(dest)
            .find(|other| other.id != id)
            .map(|other| (other.id, other.kind));
        match occupant {
            Some((target, kind)) if archetype(kind).faction != faction => {
                self.push_log(LogEvent::Attacked { attacker: id, target });
                Ok(MoveOutcome::Attacked(target))
            }
            Some((occupant, kind)) if archetype(kind).displaceable => {
                self.world.move_actor(id, dest);
                self.world.move_actor(occupant, from);
                self.push_log(LogEvent::Swapped { actor: id, occupant });
                Ok(MoveOutcome::Swapped(occupant))
            }
            Some(_) => Ok(MoveOutcome::Blocked),
            None if self.world.map.is_walkable(dest) => {
                self.world.move_actor(id, dest);
                self.push_log(LogEvent::Moved { actor: id, from, to: dest });
                Ok(MoveOutcome::Moved(dest))
            }
            None => Ok(MoveOutcome::Blocked),
        }
    }

    /// Replaces `id` with a fresh actor of kind `into` on the same cell. The old entry
    /// leaves the turn queue; the new one joins it at its own delay if it takes turns.
    pub fn transform(&mut self, id: EntityId, into: ActorKind) -> Result<EntityId, SimError> {
        let old = self.world.remove_actor(id).ok_or(SimError::UnknownActor(id))?;
        self.scheduler.remove(id);
        let replacement = self.world.place_actor(Actor::from_archetype(into, old.pos));
        let arch = archetype(into);
        if arch.schedulable {
            self.scheduler.add(replacement, arch.delay);
        }
        tracing::debug!(from = ?old.kind, into = ?into, pos = ?old.pos, "actor transformed");
        self.push_log(LogEvent::Transformed { from: id, into: replacement, kind: into });
        Ok(replacement)
    }

    /// Applies the archetype's destroy rule. Returns the replacement actor, if any.
    pub fn destroy(&mut self, id: EntityId) -> Result<Option<EntityId>, SimError> {
        let kind = self.world.actors.get(id).ok_or(SimError::UnknownActor(id))?.kind;
        match archetype(kind).on_destroy {
            DestroyRule::Revert(original) => self.transform(id, original).map(Some),
            DestroyRule::Remove => {
                self.remove(id, kind);
                Ok(None)
            }
            DestroyRule::DropComponents => {
                if let Some(pos) = self.remove(id, kind) {
                    self.drop_items(pos, archetype(kind).components);
                }
                Ok(None)
            }
        }
    }

    fn remove(&mut self, id: EntityId, kind: ActorKind) -> Option<Pos> {
        let actor = self.world.remove_actor(id)?;
        self.scheduler.remove(id);
        tracing::debug!(?kind, pos = ?actor.pos, "actor destroyed");
        self.push_log(LogEvent::Destroyed { actor: id, kind });
        Some(actor.pos)
    }

    /// Scatters one item per name over the nearest free cells around `origin`, a ring at
    /// a time. Items that find no free cell are crushed.
    fn drop_items(&mut self, origin: Pos, names: &[&str]) {
        let mut available = Vec::new();
        for name in names {
            if available.is_empty() {
                available = self.world.nearest_drop_cells(origin);
            }
            if available.is_empty() {
                self.push_log(LogEvent::ItemCrushed { name: name.to_string() });
                self.flavor(format!("The {name} had nowhere to land and is crushed!"));
                continue;
            }
            let cell = available.remove(pick_index(&mut self.rng, available.len()));
            let item = self.world.place_item(name, cell);
            self.push_log(LogEvent::ItemDropped { item, pos: cell });
        }
    }
}
