//! The simulation world.
//!
//! A `World` is built from one level and owns everything in it: the tile
//! grid, the live entities, the scheduler, the camera and the game state.
//! Changing level means building a new world.
//!
//! One `update` is one fixed-size tick, run in a fixed order:
//! scheduled actions, spawner, entity updates, interactions, boss phase
//! checks, level completion, lifecycle flush, camera.

use crate::camera::Camera;
use crate::collision::TileGrid;
use crate::config::SimConfig;
use crate::cues::CueRequest;
use crate::entity::{Entity, EntityId, EntityKind};
use crate::hostile::HostileKind;
use crate::interaction::resolve_interactions;
use crate::level::{CompletionRule, EntitySpawn, LevelFile};
use crate::lifecycle::{self, Lifecycle};
use crate::pickup::CollectibleKind;
use crate::player::PlayerColor;
use crate::schedule::Scheduler;
use crate::spawner::HostileSpawner;
use crate::tick::{GameState, TickCtx, WorldView};
use gce_core::input::ControlState;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct LevelInfo {
    pub name: String,
    pub background: Option<String>,
    pub completion: CompletionRule,
    pub final_level: bool,
}

impl Default for LevelInfo {
    fn default() -> Self {
        Self {
            name: String::new(),
            background: None,
            completion: CompletionRule::Never,
            final_level: false,
        }
    }
}

pub struct World {
    config: SimConfig,
    level: LevelInfo,
    grid: TileGrid,
    entities: Vec<Entity>,
    lifecycle: Lifecycle,
    scheduler: Scheduler,
    camera: Camera,
    spawner: Option<HostileSpawner>,
    cues: Vec<CueRequest>,
    controls: ControlState,
    rng: StdRng,
    state: GameState,
    clock_us: u64,
    ticks: u64,
    player_id: Option<EntityId>,
    boss_id: Option<EntityId>,
}

impl World {
    /// An empty world over `grid`, already in `Playing`.
    pub fn new(grid: TileGrid, config: SimConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            camera: Camera::new(config.viewport.size()),
            config,
            level: LevelInfo::default(),
            grid,
            entities: Vec::new(),
            lifecycle: Lifecycle::new(),
            scheduler: Scheduler::new(),
            spawner: None,
            cues: Vec::new(),
            controls: ControlState::default(),
            rng,
            state: GameState::Playing,
            clock_us: 0,
            ticks: 0,
            player_id: None,
            boss_id: None,
        }
    }

    pub fn from_level(level: &LevelFile, config: SimConfig) -> Result<Self, String> {
        let mut world = Self::new(TileGrid::from_level(level), config);
        world.level = LevelInfo {
            name: level.name.clone(),
            background: level.background.clone(),
            completion: level.completion,
            final_level: level.final_level,
        };
        world.spawner = level.spawner.map(HostileSpawner::new);

        for spawn in level.entity_spawns() {
            if let Some(entity) = world.entity_from_spawn(spawn) {
                world.insert(entity);
            }
        }

        if world.player_id.is_none() {
            return Err(format!(
                "Level validation failed: level '{}' has no player",
                level.name
            ));
        }
        world.follow_player();
        log::info!(
            "World ready for level '{}': {} entities, boss: {}",
            world.level.name,
            world.entities.len(),
            world.boss_id.is_some()
        );
        Ok(world)
    }

    fn entity_from_spawn(&self, spawn: EntitySpawn) -> Option<Entity> {
        let config = &self.config;
        let entity = match spawn {
            EntitySpawn::Player { x, y, color } => {
                let color = match color.as_deref() {
                    None => PlayerColor::Magenta,
                    Some(name) => PlayerColor::from_name(name).unwrap_or_else(|| {
                        log::warn!("Unknown player color '{name}', using magenta");
                        PlayerColor::Magenta
                    }),
                };
                Entity::player(Vec2::new(x, y), color, config)
            }
            EntitySpawn::Hostile { x, y, enemy_type } => {
                let kind = enemy_type
                    .as_deref()
                    .map_or(HostileKind::Sbeer, HostileKind::from_name);
                Entity::hostile(Vec2::new(x, y), kind, config)
            }
            EntitySpawn::Boss { x, y } => Entity::boss(Vec2::new(x, y), config),
            EntitySpawn::Turret { x, y } => Entity::turret(Vec2::new(x, y)),
            EntitySpawn::Collectible {
                x,
                y,
                collectible_type,
            } => {
                let name = collectible_type.as_deref().unwrap_or("");
                let Some(kind) = CollectibleKind::from_name(name) else {
                    log::warn!(
                        "Level '{}': skipping collectible of unknown kind '{name}'",
                        self.level.name
                    );
                    return None;
                };
                Entity::collectible(Vec2::new(x, y), kind)
            }
            EntitySpawn::Unknown => return None,
        };
        Some(entity)
    }

    /// Add an entity between ticks. A second player or boss is refused.
    pub fn insert(&mut self, entity: Entity) -> Option<EntityId> {
        let is_player = matches!(entity.kind, EntityKind::Player(_));
        let is_boss = matches!(entity.kind, EntityKind::Boss(_));
        if is_player && self.player_id.is_some() {
            log::warn!("Level '{}': ignoring extra player", self.level.name);
            return None;
        }
        if is_boss && self.boss_id.is_some() {
            log::warn!("Level '{}': ignoring extra boss", self.level.name);
            return None;
        }

        let id = self.lifecycle.spawn(entity);
        self.lifecycle.flush(&mut self.entities);
        if is_player {
            self.player_id = Some(id);
        }
        if is_boss {
            self.boss_id = Some(id);
        }
        Some(id)
    }

    pub fn update(&mut self, dt_us: u64) {
        if self.state != GameState::Playing {
            return;
        }
        self.ticks += 1;
        self.clock_us += dt_us;

        let view = WorldView::capture(&self.entities);
        let level_size = self.grid.pixel_size();
        let mut ctx = TickCtx {
            now_us: self.clock_us,
            dt_us,
            config: &self.config,
            controls: self.controls,
            level_size,
            lifecycle: &mut self.lifecycle,
            scheduler: &mut self.scheduler,
            cues: &mut self.cues,
            rng: &mut self.rng,
            game_state: &mut self.state,
        };

        run_due_actions(&mut self.entities, &mut ctx);

        if let Some(spawner) = self.spawner.as_mut() {
            if spawner.tick() {
                spawn_hostile(&self.camera, spawner.spawn_y, &mut ctx);
            }
        }

        for entity in self.entities.iter_mut() {
            entity.update(&view, &self.grid, &mut ctx);
        }

        resolve_interactions(&mut self.entities, &mut ctx);

        for entity in self.entities.iter_mut() {
            entity.check_boss_phase(&mut ctx);
        }

        if let Some(player) = self.player_id.and_then(|id| lifecycle::find(&self.entities, id)) {
            if !player.vitals.death_triggered
                && self
                    .level
                    .completion
                    .is_satisfied(player.body.pos.x, level_size.x)
            {
                let next = if self.level.final_level {
                    GameState::Victory
                } else {
                    GameState::LevelComplete
                };
                ctx.transition(next);
            }
        }

        let stats = self.lifecycle.flush(&mut self.entities);
        if stats.removed > 0 || stats.added > 0 {
            log::trace!(
                "tick {}: -{} +{} entities ({} live)",
                self.ticks,
                stats.removed,
                stats.added,
                self.entities.len()
            );
        }

        self.follow_player();
    }

    fn follow_player(&mut self) {
        if let Some(player) = self.player() {
            let (pos, size) = (player.body.pos, player.body.size);
            self.camera.follow(pos, size, self.grid.pixel_size());
        }
    }

    pub fn set_controls(&mut self, controls: ControlState) {
        self.controls = controls;
    }

    pub fn controls(&self) -> ControlState {
        self.controls
    }

    /// Host-driven state change, e.g. from a pause menu.
    pub fn set_game_state(&mut self, state: GameState) {
        if self.state != state {
            log::info!("Game state {} -> {state} (host)", self.state);
            self.state = state;
        }
    }

    pub fn game_state(&self) -> GameState {
        self.state
    }

    pub fn drain_cues(&mut self) -> Vec<CueRequest> {
        std::mem::take(&mut self.cues)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        lifecycle::find(&self.entities, id)
    }

    pub fn player(&self) -> Option<&Entity> {
        self.player_id.and_then(|id| self.entity(id))
    }

    pub fn boss(&self) -> Option<&Entity> {
        self.boss_id.and_then(|id| self.entity(id))
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn level(&self) -> &LevelInfo {
        &self.level
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn clock_us(&self) -> u64 {
        self.clock_us
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn pending_actions(&self) -> usize {
        self.scheduler.len()
    }
}

/// Dispatch scheduled actions that are due. Actions whose owner has left the
/// world, or is dying when the action needs it alive, are dropped.
fn run_due_actions(entities: &mut [Entity], ctx: &mut TickCtx) {
    for due in ctx.scheduler.drain_due(ctx.now_us) {
        let Some(owner) = lifecycle::find_mut(entities, due.owner) else {
            log::trace!("Dropping {:?}: owner {:?} is gone", due.action, due.owner);
            continue;
        };
        let dying = owner.vitals.death_triggered && due.action.requires_alive_owner();
        if owner.vitals.marked_for_deletion || dying {
            log::trace!("Dropping {:?}: owner {:?} is dead", due.action, due.owner);
            continue;
        }
        owner.perform(due.action, ctx);
    }
}

fn spawn_hostile(camera: &Camera, y: f32, ctx: &mut TickCtx) {
    let width = crate::hostile::SIZE.x;
    let low = camera.position.x.max(0.0);
    let high = (camera.position.x + camera.viewport.x - width).min(ctx.level_size.x - width);
    let x = if high > low {
        ctx.rng.gen_range(low..high)
    } else {
        low
    };
    let kind = match ctx.rng.gen_range(0..3) {
        0 => HostileKind::Sbeer,
        1 => HostileKind::Ghoul,
        _ => HostileKind::Spider,
    };
    let hostile = Entity::hostile(Vec2::new(x, y), kind, ctx.config);
    let id = ctx.spawn(hostile);
    log::debug!("Spawner produced {} {id:?} at x={x:.0}", kind.name());
}
