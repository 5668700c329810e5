//! Delay-ordered turn queue.
//! Entries are keyed by (due tick, insertion sequence) so equal due ticks resolve in
//! the order actors were queued.

use std::collections::BTreeMap;

use slotmap::SecondaryMap;

use crate::types::EntityId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryState {
    Queued,
    Active,
    Removed,
}

#[derive(Clone, Default)]
pub struct Scheduler {
    now: u64,
    next_seq: u64,
    queue: BTreeMap<(u64, u64), EntityId>,
    keys: SecondaryMap<EntityId, (u64, u64)>,
    active: Option<EntityId>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    /// Queues `id` to act `delay` ticks from now, replacing any existing entry.
    pub fn add(&mut self, id: EntityId, delay: u32) {
        self.remove(id);
        let key = (self.now + u64::from(delay), self.next_seq);
        self.next_seq += 1;
        self.queue.insert(key, id);
        self.keys.insert(id, key);
    }

    /// Drops the entry for `id`, whether queued or active. Returns false if it had none.
    pub fn remove(&mut self, id: EntityId) -> bool {
        let was_active = self.active == Some(id);
        if was_active {
            self.active = None;
        }
        match self.keys.remove(id) {
            Some(key) => {
                self.queue.remove(&key);
                true
            }
            None => was_active,
        }
    }

    /// Promotes the entry with the smallest due tick and advances the clock to it.
    ///
    /// A previously active entry that was never finished is dropped.
    pub fn next(&mut self) -> Option<EntityId> {
        let ((due, _), id) = self.queue.pop_first()?;
        self.keys.remove(id);
        self.now = self.now.max(due);
        self.active = Some(id);
        Some(id)
    }

    /// Re-queues the active entry `delay` ticks from now. Does nothing if `id` is no
    /// longer active, e.g. because it was removed during its own turn.
    pub fn finish(&mut self, id: EntityId, delay: u32) -> bool {
        if self.active != Some(id) {
            return false;
        }
        self.active = None;
        self.add(id, delay);
        true
    }

    pub fn active(&self) -> Option<EntityId> {
        self.active
    }

    pub fn state(&self, id: EntityId) -> EntryState {
        if self.active == Some(id) {
            EntryState::Active
        } else if self.keys.contains_key(id) {
            EntryState::Queued
        } else {
            EntryState::Removed
        }
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.state(id) != EntryState::Removed
    }

    /// Ticks left before a queued entry acts.
    pub fn remaining_delay(&self, id: EntityId) -> Option<u64> {
        self.keys.get(id).map(|(due, _)| due - self.now)
    }

    /// Queued entries in the order they will act.
    pub fn queued(&self) -> impl Iterator<Item = (EntityId, u64)> + '_ {
        self.queue.iter().map(|((due, _), id)| (*id, *due))
    }

    pub fn len(&self) -> usize {
        self.queue.len() + usize::from(self.active.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
