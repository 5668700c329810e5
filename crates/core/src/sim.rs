//! Turn-stepped simulation context.
//! `Sim` owns the world, the turn queue, the message log and the random source, and is
//! passed explicitly into every decision, path search and log write.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use crate::config::SimConfig;
use crate::content::archetype;
use crate::state::{Actor, Map, World};
use crate::types::*;

mod dice;
mod hash;
mod lifecycle;
mod pathfinding;
mod policy;
mod scheduler;
mod threat;
mod turns;
mod visibility;

#[cfg(test)]
mod test_support;

pub use pathfinding::{
    Path, WalkableOverride, ignore_none, path_exists, paths_to_nearest, shortest_path,
};
pub use scheduler::{EntryState, Scheduler};
pub use threat::{Candidates, UphillPlan, UphillStep, score_uphill_candidates, step_away_from};
pub use visibility::{FieldOfView, compute_visibility};

pub struct Sim {
    seed: u64,
    rng: ChaCha8Rng,
    world: World,
    scheduler: Scheduler,
    log: Vec<LogEvent>,
    log_limit: usize,
    first_turn_delay: u32,
}

impl Sim {
    pub fn new(config: &SimConfig, map: Map) -> Self {
        Self {
            seed: config.seed,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            world: World::new(map),
            scheduler: Scheduler::new(),
            log: Vec::new(),
            log_limit: config.log_limit,
            first_turn_delay: config.first_turn_delay,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct world access for setup and tests. Actors added here are not scheduled;
    /// use [`Sim::spawn`] for that.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn current_tick(&self) -> u64 {
        self.scheduler.now()
    }

    pub fn log(&self) -> &[LogEvent] {
        &self.log
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Places a new actor and schedules it if its archetype takes turns.
    pub fn spawn(&mut self, kind: ActorKind, pos: Pos) -> Result<EntityId, SimError> {
        if !self.world.map.in_bounds(pos) {
            return Err(SimError::OutOfBounds(pos));
        }
        let id = self.world.place_actor(Actor::from_archetype(kind, pos));
        if archetype(kind).schedulable {
            self.scheduler.add(id, self.first_turn_delay);
        }
        tracing::trace!(?id, ?kind, ?pos, "spawned actor");
        Ok(id)
    }

    /// Changes the delay used the next time `id` is re-queued.
    pub fn set_delay(&mut self, id: EntityId, delay: u32) -> Result<(), SimError> {
        if delay == 0 {
            return Err(SimError::InvalidDelay);
        }
        let actor = self.world.actors.get_mut(id).ok_or(SimError::UnknownActor(id))?;
        actor.delay = delay;
        Ok(())
    }

    /// Field of view from `id`'s cell with its own awareness radius.
    pub fn fov(&self, id: EntityId, light_walls: bool) -> Result<FieldOfView, SimError> {
        let actor = self.world.actors.get(id).ok_or(SimError::UnknownActor(id))?;
        Ok(compute_visibility(&self.world.map, actor.pos, actor.awareness, light_walls))
    }

    /// The members of `candidates` that `id` can currently see, in candidate order.
    pub fn seen(
        &self,
        id: EntityId,
        candidates: &[EntityId],
        light_walls: bool,
    ) -> Result<Vec<EntityId>, SimError> {
        let fov = self.fov(id, light_walls)?;
        Ok(candidates
            .iter()
            .copied()
            .filter(|candidate| {
                self.world.actors.get(*candidate).is_some_and(|actor| fov.contains(actor.pos))
            })
            .collect())
    }

    pub fn path_exists<F>(&mut self, id: EntityId, is_ignorable: F, to: Pos) -> Result<bool, SimError>
    where
        F: Fn(&Actor) -> bool,
    {
        let from = self.world.actors.get(id).ok_or(SimError::UnknownActor(id))?.pos;
        Ok(path_exists(&mut self.world, from, to, is_ignorable))
    }

    /// Writes `id`'s field of view into the map's visible flags. Previously visible
    /// cells are cleared first; explored cells accumulate.
    pub fn reveal_from(&mut self, id: EntityId) -> Result<(), SimError> {
        let fov = self.fov(id, true)?;
        self.world.map.clear_visible();
        for cell in fov.iter() {
            self.world.map.set_visible(cell, true);
        }
        Ok(())
    }

    fn push_log(&mut self, event: LogEvent) {
        self.log.push(event);
        if self.log.len() > self.log_limit {
            let excess = self.log.len() - self.log_limit;
            self.log.drain(..excess);
        }
    }

    fn flavor(&mut self, text: String) {
        self.push_log(LogEvent::Flavor(text));
    }
}
