//! Timed actions keyed by simulated time.
//!
//! Entities never hold timers that outlive them. Anything that should happen
//! later is queued here with the owning entity's id; the world drops the
//! action at dispatch time if the owner is gone. Ordering is by due time, ties
//! broken by insertion order.

use crate::entity::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledAction {
    /// End the event state started with `token`.
    RevertState { token: u32 },
    BossShot { index: u32 },
    BossSummon { index: u32 },
    BossFollowUpAttack,
    BossExplosion,
    BossFinale,
}

impl ScheduledAction {
    /// Actions that only make sense while the owner is still fighting. The
    /// boss's death sequence keeps running after its death is triggered.
    pub fn requires_alive_owner(self) -> bool {
        !matches!(self, Self::BossExplosion | Self::BossFinale)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduled {
    pub due_us: u64,
    pub seq: u64,
    pub owner: EntityId,
    pub action: ScheduledAction,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    queue: Vec<Scheduled>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_us: u64, owner: EntityId, action: ScheduledAction) {
        let entry = Scheduled {
            due_us,
            seq: self.next_seq,
            owner,
            action,
        };
        self.next_seq += 1;
        let at = self
            .queue
            .partition_point(|s| (s.due_us, s.seq) <= (entry.due_us, entry.seq));
        self.queue.insert(at, entry);
    }

    /// Remove and return every entry due at or before `now_us`, in order.
    pub fn drain_due(&mut self, now_us: u64) -> Vec<Scheduled> {
        let count = self.queue.partition_point(|s| s.due_us <= now_us);
        self.queue.drain(..count).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
