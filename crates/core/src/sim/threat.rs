//! Greedy "uphill" retreat: score the mover's own cell, displaceable neighbours and free
//! neighbouring cells by summed taxicab distance to a set of threats, then pick a move.
//!
//! The per-category scan keeps every candidate that met or beat the running best when
//! it was scanned, so earlier lower scorers stay in the pool. This is an approximation,
//! not a true safety map; callers needing exact safety must build a distance field.

use rand_chacha::rand_core::Rng;

use super::dice::{coin_flip, pick_index};
use super::*;
use crate::state::manhattan;

/// Running best score for one candidate category plus everything accumulated so far.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidates<T> {
    best: Option<u32>,
    accumulated: Vec<T>,
}

impl<T> Default for Candidates<T> {
    fn default() -> Self {
        Self { best: None, accumulated: Vec::new() }
    }
}

impl<T: Copy> Candidates<T> {
    fn offer(&mut self, score: u32, candidate: T) {
        if self.best.is_none_or(|best| score >= best) {
            self.best = Some(score);
            self.accumulated.push(candidate);
        }
    }

    pub fn best(&self) -> Option<u32> {
        self.best
    }

    pub fn accumulated(&self) -> &[T] {
        &self.accumulated
    }

    fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<T> {
        if self.accumulated.is_empty() {
            return None;
        }
        self.accumulated.get(pick_index(rng, self.accumulated.len())).copied()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UphillStep {
    Stay(Pos),
    Walk(Pos),
    /// Step onto `pos` by displacing `occupant`.
    Sacrifice { occupant: EntityId, pos: Pos },
}

impl UphillStep {
    pub fn cell(self) -> Pos {
        match self {
            UphillStep::Stay(pos) | UphillStep::Walk(pos) => pos,
            UphillStep::Sacrifice { pos, .. } => pos,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UphillPlan {
    pub origin: Pos,
    pub stay: u32,
    pub sacrifices: Candidates<(EntityId, Pos)>,
    pub free_cells: Candidates<Pos>,
}

impl UphillPlan {
    /// Stay unless some category beats the current cell; prefer the higher-scoring
    /// category and flip a coin when both tie.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> UphillStep {
        let beats_stay = |best: Option<u32>| best.is_some_and(|score| score > self.stay);
        if !beats_stay(self.sacrifices.best) && !beats_stay(self.free_cells.best) {
            return UphillStep::Stay(self.origin);
        }
        let take_sacrifice = match (self.sacrifices.best, self.free_cells.best) {
            (Some(sacrifice), Some(free)) if sacrifice == free => coin_flip(rng),
            (Some(sacrifice), Some(free)) => sacrifice > free,
            (Some(_), None) => true,
            (None, _) => false,
        };
        let picked = if take_sacrifice {
            self.sacrifices.pick(rng).map(|(occupant, pos)| UphillStep::Sacrifice { occupant, pos })
        } else {
            self.free_cells.pick(rng).map(UphillStep::Walk)
        };
        picked.unwrap_or(UphillStep::Stay(self.origin))
    }
}

fn safety(threats: &[Pos], cell: Pos) -> u32 {
    threats.iter().map(|threat| manhattan(*threat, cell)).sum()
}

/// Scores every candidate move for `mover` against `threats`. Threat ids that no longer
/// exist are ignored. Stepping stones are displaceable neighbours outside the threat set.
pub fn score_uphill_candidates(
    world: &World,
    mover: EntityId,
    threats: &[EntityId],
    may_use_step_stones: bool,
) -> Result<UphillPlan, SimError> {
    let origin = world.actors.get(mover).ok_or(SimError::UnknownActor(mover))?.pos;
    let threat_cells: Vec<Pos> =
        threats.iter().filter_map(|id| world.actors.get(*id)).map(|actor| actor.pos).collect();

    let mut sacrifices = Candidates::default();
    if may_use_step_stones {
        for occupant in world.adjacent_actors(origin) {
            if occupant == mover || threats.contains(&occupant) {
                continue;
            }
            let actor = &world.actors[occupant];
            if !archetype(actor.kind).displaceable {
                continue;
            }
            sacrifices.offer(safety(&threat_cells, actor.pos), (occupant, actor.pos));
        }
    }

    let mut free_cells = Candidates::default();
    for cell in world.adjacent_walkable_cells(origin) {
        free_cells.offer(safety(&threat_cells, cell), cell);
    }

    Ok(UphillPlan { origin, stay: safety(&threat_cells, origin), sacrifices, free_cells })
}

/// Decision only: the cell `mover` should head for to get away from `threats`.
pub fn step_away_from<R: Rng + ?Sized>(
    world: &World,
    rng: &mut R,
    mover: EntityId,
    threats: &[EntityId],
    may_use_step_stones: bool,
) -> Result<Pos, SimError> {
    let plan = score_uphill_candidates(world, mover, threats, may_use_step_stones)?;
    Ok(plan.choose(rng).cell())
}

impl Sim {
    pub fn step_away_from(
        &mut self,
        mover: EntityId,
        threats: &[EntityId],
        may_use_step_stones: bool,
    ) -> Result<Pos, SimError> {
        step_away_from(&self.world, &mut self.rng, mover, threats, may_use_step_stones)
    }

    /// Decision and execution: moves `mover` away from `threats`, using stepping stones.
    /// Returns whether a step was issued; that step spends the turn even when it ends
    /// up as an attack on the stepping stone.
    pub fn minimize_terror(&mut self, mover: EntityId, threats: &[EntityId]) -> Result<bool, SimError> {
        let plan = score_uphill_candidates(&self.world, mover, threats, true)?;
        let step = plan.choose(&mut self.rng);
        if let UphillStep::Stay(_) = step {
            return Ok(false);
        }
        let outcome = self.attack_move(mover, step.cell())?;
        if matches!(outcome, MoveOutcome::Moved(_) | MoveOutcome::Swapped(_)) {
            self.push_log(LogEvent::Fled { actor: mover, to: step.cell() });
        }
        Ok(true)
    }
}
