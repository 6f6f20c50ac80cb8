//! Per-tick shared state handed to every entity hook.
//!
//! Entities never reach into the world directly. Reads go through a
//! [`WorldView`] captured once at the start of the tick; writes (spawns,
//! delayed actions, cues, game-state changes) go through [`TickCtx`], which
//! queues them for the world to apply at well-defined points.

use crate::config::SimConfig;
use crate::cues::{Cue, CueRequest};
use crate::entity::{Entity, EntityId, EntityKind};
use crate::lifecycle::Lifecycle;
use crate::schedule::{ScheduledAction, Scheduler};
use gce_core::input::ControlState;
use glam::Vec2;
use rand::rngs::StdRng;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    Menu,
    Playing,
    LevelComplete,
    GameOver,
    Victory,
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Menu => "menu",
            Self::Playing => "playing",
            Self::LevelComplete => "level_complete",
            Self::GameOver => "game_over",
            Self::Victory => "victory",
        };
        f.write_str(name)
    }
}

/// Snapshot of another entity's box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: Vec2,
}

impl Target {
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// Read-only facts about the world as it stood at the start of the tick.
#[derive(Debug, Clone, Default)]
pub struct WorldView {
    pub player: Option<Target>,
    /// Live hostiles and a boss that is not dying; turret targets.
    pub hostiles: Vec<Target>,
}

impl WorldView {
    pub fn capture(entities: &[Entity]) -> Self {
        let mut view = Self::default();
        for entity in entities {
            if entity.vitals.marked_for_deletion {
                continue;
            }
            let target = Target {
                id: entity.id,
                pos: entity.body.pos,
                size: entity.body.size,
            };
            match &entity.kind {
                EntityKind::Player(_) => view.player = Some(target),
                EntityKind::Hostile(_) => view.hostiles.push(target),
                EntityKind::Boss(_) if !entity.vitals.death_triggered => {
                    view.hostiles.push(target)
                }
                _ => {}
            }
        }
        view
    }

    /// Closest hostile whose top-left corner lies strictly within `range` of
    /// `from`. Ties keep the earlier entity.
    pub fn nearest_hostile(&self, from: Vec2, range: f32) -> Option<&Target> {
        let mut best: Option<(&Target, f32)> = None;
        for target in &self.hostiles {
            let distance = target.pos.distance(from);
            if distance >= range {
                continue;
            }
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((target, distance));
            }
        }
        best.map(|(target, _)| target)
    }
}

pub struct TickCtx<'a> {
    pub now_us: u64,
    pub dt_us: u64,
    pub config: &'a SimConfig,
    pub controls: ControlState,
    pub level_size: Vec2,
    pub lifecycle: &'a mut Lifecycle,
    pub scheduler: &'a mut Scheduler,
    pub cues: &'a mut Vec<CueRequest>,
    pub rng: &'a mut StdRng,
    pub game_state: &'a mut GameState,
}

impl TickCtx<'_> {
    pub fn dt_s(&self) -> f32 {
        self.dt_us as f32 / 1_000_000.0
    }

    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        self.lifecycle.spawn(entity)
    }

    pub fn schedule_in(&mut self, delay_us: u64, owner: EntityId, action: ScheduledAction) {
        self.scheduler
            .schedule(self.now_us + delay_us, owner, action);
    }

    pub fn cue(&mut self, cue: Cue) {
        self.cues.push(CueRequest::new(cue));
    }

    /// Leave `Playing` for `to`. Any other current state ignores the request,
    /// so the first transition in a tick wins.
    pub fn transition(&mut self, to: GameState) {
        if *self.game_state != GameState::Playing || to == GameState::Playing {
            return;
        }
        log::info!("Game state {} -> {to}", self.game_state);
        *self.game_state = to;
    }
}
