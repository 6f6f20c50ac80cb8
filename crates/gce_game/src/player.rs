use crate::behavior::BehaviorState;
use crate::body::Facing;
use crate::collision::TileGrid;
use crate::cues::Cue;
use crate::entity::{Actor, Entity, Faction};
use crate::tick::{GameState, TickCtx};
use glam::Vec2;

pub const SIZE: Vec2 = Vec2::new(32.0, 48.0);
pub const SHOT_SIZE: f32 = 16.0;
/// Horizontal speed above which the player counts as walking (px/s).
const WALK_THRESHOLD: f32 = 30.0;
const BLINK_US: u64 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerColor {
    Magenta,
    Cyan,
    Yellow,
    Red,
}

impl PlayerColor {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "magenta" => Some(Self::Magenta),
            "cyan" => Some(Self::Cyan),
            "yellow" => Some(Self::Yellow),
            "red" => Some(Self::Red),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Magenta => "magenta",
            Self::Cyan => "cyan",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub color: PlayerColor,
    pub coins: u32,
    shoot_cooldown_us: u64,
    invulnerable_us: u64,
    invulnerability_window_us: u64,
}

impl Player {
    pub fn new(color: PlayerColor) -> Self {
        Self {
            color,
            coins: 0,
            shoot_cooldown_us: 0,
            invulnerable_us: 0,
            invulnerability_window_us: 0,
        }
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_us > 0
    }

    /// Blinks on and off every 100 ms while invulnerable.
    pub fn is_visible(&self) -> bool {
        if !self.is_invulnerable() {
            return true;
        }
        let elapsed = self.invulnerability_window_us - self.invulnerable_us;
        (elapsed / BLINK_US) % 2 == 0
    }

    pub(crate) fn update(&mut self, actor: &mut Actor, grid: &TileGrid, ctx: &mut TickCtx) {
        let tuning = ctx.config.player;
        let controls = ctx.controls;
        let body = &mut *actor.body;

        body.accel.x = controls.horizontal() * tuning.run_accel;
        if controls.left {
            body.facing = Facing::Left;
        }
        if controls.right {
            body.facing = Facing::Right;
        }
        if controls.jump && body.on_ground {
            body.vel.y = -tuning.jump_speed;
            ctx.cue(Cue::Jump);
        }

        body.integrate(ctx.dt_s(), ctx.config.gravity);
        grid.resolve(body);

        self.shoot_cooldown_us = self.shoot_cooldown_us.saturating_sub(ctx.dt_us);
        self.invulnerable_us = self.invulnerable_us.saturating_sub(ctx.dt_us);

        if controls.shoot && self.shoot_cooldown_us == 0 {
            self.shoot(actor, ctx);
        }

        let state = if !actor.body.on_ground {
            BehaviorState::Jump
        } else if actor.body.vel.x.abs() > WALK_THRESHOLD {
            BehaviorState::Walk
        } else {
            BehaviorState::Idle
        };
        actor.behavior.select(state);
    }

    fn shoot(&mut self, actor: &Actor, ctx: &mut TickCtx) {
        let tuning = ctx.config.player;
        let body = &*actor.body;
        let x = match body.facing {
            Facing::Right => body.right(),
            Facing::Left => body.left(),
        };
        let pos = Vec2::new(x, body.top() + body.size.y / 4.0);
        let vel = Vec2::new(body.facing.sign() * tuning.shot_speed, 0.0);
        ctx.spawn(Entity::projectile(
            pos,
            SHOT_SIZE,
            vel,
            Faction::Player,
            tuning.shot_damage,
        ));
        ctx.cue(Cue::Shoot);
        self.shoot_cooldown_us = tuning.shoot_cooldown_ms * 1_000;
    }

    pub(crate) fn on_damage(&mut self, _actor: &mut Actor, ctx: &mut TickCtx) {
        self.invulnerability_window_us = ctx.config.player.invulnerability_ms * 1_000;
        self.invulnerable_us = self.invulnerability_window_us;
        ctx.cue(Cue::Hurt);
    }

    pub(crate) fn on_death(&mut self, _actor: &mut Actor, ctx: &mut TickCtx) {
        ctx.cue(Cue::Death);
        ctx.transition(GameState::GameOver);
    }
}
