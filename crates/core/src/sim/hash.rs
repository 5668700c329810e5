//! Stable snapshot hashing for comparing seeded runs.

use std::hash::Hasher;

use slotmap::Key;
use xxhash_rust::xxh3::Xxh3;

use super::*;

impl Sim {
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u64(self.scheduler.now());
        for actor in self.world.actors.values() {
            hasher.write_u64(actor.id.data().as_ffi());
            hasher.write_u8(actor.kind as u8);
            hasher.write_i32(actor.pos.x);
            hasher.write_i32(actor.pos.y);
            hasher.write_u32(actor.delay);
            hasher.write_u8(actor.stamina);
        }
        for item in self.world.items.values() {
            hasher.write(item.name.as_bytes());
            hasher.write_i32(item.pos.x);
            hasher.write_i32(item.pos.y);
        }
        for (id, due) in self.scheduler.queued() {
            hasher.write_u64(id.data().as_ffi());
            hasher.write_u64(due);
        }
        hasher.finish()
    }
}
