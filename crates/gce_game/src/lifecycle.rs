//! Deferred entity creation and removal.
//!
//! The live collection is only ever changed in `flush`, between ticks. Spawns
//! made during a tick wait in a queue and are first updated on the next tick;
//! marked entities stay in place (still visible to the rest of the tick) until
//! the flush drops them in one pass.

use crate::entity::{Entity, EntityId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushStats {
    pub removed: usize,
    pub added: usize,
}

#[derive(Debug, Default)]
pub struct Lifecycle {
    next_id: u32,
    pending: Vec<Entity>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `entity` and hand back its id. Ids increase monotonically, so the
    /// live collection stays sorted by id.
    pub fn spawn(&mut self, mut entity: Entity) -> EntityId {
        self.next_id += 1;
        let id = EntityId(self.next_id);
        entity.id = id;
        self.pending.push(entity);
        id
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn flush(&mut self, live: &mut Vec<Entity>) -> FlushStats {
        let before = live.len();
        live.retain(|entity| !entity.vitals.marked_for_deletion);
        let removed = before - live.len();
        let added = self.pending.len();
        live.append(&mut self.pending);
        FlushStats { removed, added }
    }
}

/// Binary search over a collection kept sorted by id.
pub fn find_mut(live: &mut [Entity], id: EntityId) -> Option<&mut Entity> {
    let index = live.binary_search_by_key(&id, |entity| entity.id).ok()?;
    live.get_mut(index)
}

pub fn find(live: &[Entity], id: EntityId) -> Option<&Entity> {
    let index = live.binary_search_by_key(&id, |entity| entity.id).ok()?;
    live.get(index)
}
