//! Per-frame draw snapshot handed to a [`Renderer`].
//!
//! The simulation never draws. Once per frame it flattens the settled world
//! into plain data: camera, visible tiles, and one [`DrawItem`] per entity in
//! draw order.

use crate::behavior::BehaviorState;
use crate::body::Facing;
use crate::camera::Camera;
use crate::collision::TileKind;
use crate::entity::{Entity, EntityId, EntityKind};
use crate::tick::GameState;
use crate::world::World;
use glam::Vec2;

#[derive(Debug, Clone, PartialEq)]
pub struct TileDraw {
    pub cell: (i32, i32),
    pub screen_pos: Vec2,
    pub size: f32,
    pub kind: TileKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub id: EntityId,
    pub kind: &'static str,
    pub screen_pos: Vec2,
    pub size: Vec2,
    pub facing: Facing,
    pub state: BehaviorState,
    pub frame: u32,
    pub sprite_key: String,
    /// Health fraction for kinds that show a bar.
    pub health_ratio: Option<f32>,
    pub boss_phase: Option<u8>,
    /// False while the player blinks during invulnerability.
    pub visible: bool,
    pub on_screen: bool,
    pub z_index: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hud {
    pub health: i32,
    pub max_health: i32,
    pub coins: u32,
}

#[derive(Debug, Clone)]
pub struct RenderFrame {
    pub game_state: GameState,
    pub camera: Camera,
    pub background: Option<String>,
    pub tiles: Vec<TileDraw>,
    /// Sorted by z-index, ties in id order.
    pub entities: Vec<DrawItem>,
    pub hud: Option<Hud>,
}

pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame);
}

impl RenderFrame {
    pub fn capture(world: &World) -> Self {
        let camera = *world.camera();
        let grid = world.grid();
        let tiles = grid
            .visible_tiles(camera.position, camera.viewport)
            .map(|(x, y, kind)| {
                let world_pos = Vec2::new(x as f32, y as f32) * grid.block_size();
                TileDraw {
                    cell: (x, y),
                    screen_pos: camera.to_screen(world_pos),
                    size: grid.block_size(),
                    kind,
                }
            })
            .collect();

        let mut entities: Vec<DrawItem> = world
            .entities()
            .iter()
            .filter(|e| e.is_live())
            .map(|e| e.draw_item(&camera))
            .collect();
        entities.sort_by_key(|item| (item.z_index, item.id));

        let hud = world.player().and_then(|player| {
            let health = player.vitals.health?;
            let EntityKind::Player(data) = &player.kind else {
                return None;
            };
            Some(Hud {
                health: health.current.max(0),
                max_health: health.max,
                coins: data.coins,
            })
        });

        Self {
            game_state: world.game_state(),
            camera,
            background: world.level().background.clone(),
            tiles,
            entities,
            hud,
        }
    }
}

impl Entity {
    pub fn draw_item(&self, camera: &Camera) -> DrawItem {
        let state = self.behavior.current();
        let (frame, frame_count) = match &self.kind {
            EntityKind::Effect(effect) => (effect.sprite_frame(), effect.kind.frame_count()),
            _ => (self.animation.frame_index, self.animation.clip.frame_count),
        };

        let health_ratio = match self.kind {
            EntityKind::Player(_) | EntityKind::Boss(_) | EntityKind::Turret(_) => {
                self.vitals.health.map(|h| h.ratio())
            }
            _ => None,
        };
        let boss_phase = match &self.kind {
            EntityKind::Boss(boss) => Some(boss.phase()),
            _ => None,
        };
        let visible = match &self.kind {
            EntityKind::Player(player) => player.is_visible(),
            _ => true,
        };

        DrawItem {
            id: self.id,
            kind: self.kind.label(),
            screen_pos: camera.to_screen(self.body.pos),
            size: self.body.size,
            facing: self.body.facing,
            state,
            frame,
            sprite_key: sprite_key(&self.kind, state, frame, frame_count),
            health_ratio,
            boss_phase,
            visible,
            on_screen: camera.is_visible(self.body.pos, self.body.size),
            z_index: self.z_index,
        }
    }
}

fn state_label(kind: &EntityKind, state: BehaviorState) -> &'static str {
    match (kind, state) {
        (EntityKind::Boss(_), BehaviorState::Shoot) => "attack1",
        (EntityKind::Boss(_), BehaviorState::Summon) => "attack2",
        (EntityKind::Boss(_), BehaviorState::Charge) => "attack3",
        _ => state.name(),
    }
}

/// Sprite naming used by the asset pack, e.g. `player_magenta_walk_2` or
/// `ghoul_idle_1`. Single-frame clips carry no frame suffix.
pub fn sprite_key(kind: &EntityKind, state: BehaviorState, frame: u32, frame_count: u32) -> String {
    let stem = match kind {
        EntityKind::Player(player) => {
            format!("player_{}_{}", player.color.name(), state_label(kind, state))
        }
        EntityKind::Hostile(hostile) => {
            format!("{}_{}", hostile.kind.name(), state_label(kind, state))
        }
        EntityKind::Boss(_) => format!("boss_{}", state_label(kind, state)),
        EntityKind::Turret(_) => format!("turret_{}", state_label(kind, state)),
        EntityKind::Projectile(projectile) => match projectile.faction {
            crate::entity::Faction::Player => "projectile_player".to_string(),
            crate::entity::Faction::Hostile => "projectile_hostile".to_string(),
        },
        EntityKind::Collectible(collectible) => collectible.kind.name().to_string(),
        EntityKind::Effect(effect) => effect.kind.name().to_string(),
    };
    if frame_count <= 1 {
        stem
    } else {
        format!("{stem}_{}", frame + 1)
    }
}

/// Renderer that discards frames.
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _frame: &RenderFrame) {}
}
