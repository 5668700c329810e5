//! Turn loop: pop the next actor, let it decide, re-queue it at its current delay.

use super::*;

impl Sim {
    /// Runs a single turn. Returns `None` once nothing is left to schedule.
    pub fn step(&mut self) -> Option<TurnReport> {
        loop {
            let id = self.scheduler.next()?;
            let Some(kind) = self.world.actors.get(id).map(|actor| actor.kind) else {
                tracing::debug!(?id, "dropping queue entry for a missing actor");
                self.scheduler.remove(id);
                continue;
            };
            let tick = self.scheduler.now();
            let acted = match self.act(id) {
                Ok(acted) => acted,
                Err(err) => {
                    tracing::warn!(?id, ?err, "turn failed");
                    false
                }
            };
            if let Some(actor) = self.world.actors.get(id) {
                self.scheduler.finish(id, actor.delay);
            }
            tracing::trace!(tick, ?id, ?kind, acted, "turn");
            return Some(TurnReport { tick, actor: id, kind, acted });
        }
    }

    pub fn advance(&mut self, max_turns: u32) -> AdvanceResult {
        let mut turns = 0;
        while turns < max_turns {
            if self.step().is_none() {
                return AdvanceResult { turns, stop_reason: AdvanceStopReason::NoSchedulableActors };
            }
            turns += 1;
        }
        AdvanceResult { turns, stop_reason: AdvanceStopReason::BudgetExhausted }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::test_support::*;

    #[test]
    fn empty_sim_stops_immediately() {
        let mut sim = seeded_sim(1, Map::new(5, 5));
        sim.spawn(ActorKind::Membrane, Pos { y: 2, x: 2 }).expect("spawn");
        let result = sim.advance(10);
        assert_eq!(result.turns, 0);
        assert_eq!(result.stop_reason, AdvanceStopReason::NoSchedulableActors);
    }

    #[test]
    fn budget_limits_the_number_of_turns() {
        let mut sim = seeded_sim(1, Map::new(9, 9));
        sim.spawn(ActorKind::Maw, Pos { y: 2, x: 2 }).expect("spawn");
        let result = sim.advance(7);
        assert_eq!(result.turns, 7);
        assert_eq!(result.stop_reason, AdvanceStopReason::BudgetExhausted);
        assert_eq!(sim.current_tick(), 6 * 16);
    }

    #[test]
    fn delay_changes_apply_on_the_next_requeue() {
        let mut sim = seeded_sim(1, Map::new(9, 9));
        let fast = sim.spawn(ActorKind::Maw, Pos { y: 2, x: 2 }).expect("spawn");
        let slow = sim.spawn(ActorKind::Maw, Pos { y: 6, x: 6 }).expect("spawn");
        sim.set_delay(fast, 2).expect("delay");

        let order: Vec<EntityId> = (0..6).filter_map(|_| sim.step()).map(|turn| turn.actor).collect();
        assert_eq!(order, vec![fast, slow, fast, fast, fast, fast]);
    }

    #[test]
    fn entries_for_actors_removed_behind_the_scheduler_are_skipped() {
        let mut sim = seeded_sim(1, Map::new(9, 9));
        let gone = sim.spawn(ActorKind::Maw, Pos { y: 2, x: 2 }).expect("spawn");
        let kept = sim.spawn(ActorKind::Maw, Pos { y: 6, x: 6 }).expect("spawn");
        sim.world_mut().remove_actor(gone);

        let turn = sim.step().expect("turn");
        assert_eq!(turn.actor, kept);
        assert_eq!(sim.scheduler().state(gone), EntryState::Removed);
    }

    #[test]
    fn captured_tank_takes_over_the_turns() {
        let mut sim = sim_from_ascii(&["#####", "#...#", "#####"]);
        let tank = sim.spawn(ActorKind::Tank, Pos { y: 1, x: 2 }).expect("spawn");
        sim.spawn(ActorKind::Membrane, Pos { y: 1, x: 1 }).expect("spawn");
        sim.spawn(ActorKind::Membrane, Pos { y: 1, x: 3 }).expect("spawn");

        let first = sim.step().expect("turn");
        assert_eq!(first.actor, tank);
        assert!(first.acted);

        let second = sim.step().expect("turn");
        assert_ne!(second.actor, tank);
        assert_eq!(second.kind, ActorKind::CapturedTank);
        assert_eq!(second.tick, 16);
        assert!(sim.step().is_some_and(|turn| turn.actor == second.actor && turn.tick == 32));
    }
}
