use crate::behavior::BehaviorState;
use crate::body::Facing;
use crate::cues::Cue;
use crate::effect::EffectKind;
use crate::entity::{Actor, Entity, Faction};
use crate::tick::{Target, TickCtx, WorldView};
use glam::Vec2;

pub const SIZE: Vec2 = Vec2::new(32.0, 48.0);
pub const MAX_HEALTH: i32 = 30;
const FIRE_INTERVAL_US: u64 = 1_500_000;
const RANGE: f32 = 300.0;
const SHOT_SIZE: f32 = 24.0;
const SHOT_SPEED: f32 = 480.0;
const SHOT_DAMAGE: i32 = 10;
const SHOOT_POSE_US: u64 = 300_000;

/// Stationary ally that fires at the nearest hostile in range.
#[derive(Debug, Clone, Default)]
pub struct Turret {
    fire_timer_us: u64,
}

impl Turret {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn update(&mut self, actor: &mut Actor, view: &WorldView, ctx: &mut TickCtx) {
        actor.body.vel = Vec2::ZERO;
        self.fire_timer_us += ctx.dt_us;
        if self.fire_timer_us < FIRE_INTERVAL_US {
            return;
        }
        // The timer keeps running with nothing in range, so a target that
        // wanders in is fired on at once.
        if let Some(target) = view.nearest_hostile(actor.body.pos, RANGE).copied() {
            self.fire(actor, &target, ctx);
            self.fire_timer_us = 0;
        }
    }

    fn fire(&mut self, actor: &mut Actor, target: &Target, ctx: &mut TickCtx) {
        let body = &mut *actor.body;
        let origin = Vec2::new(
            body.pos.x + body.size.x / 2.0,
            body.pos.y + body.size.y / 4.0,
        );
        let aim = target.center() - origin;
        body.facing = Facing::toward(aim.x);
        let direction = aim.normalize_or_zero();
        if direction == Vec2::ZERO {
            return;
        }

        ctx.spawn(Entity::projectile(
            origin,
            SHOT_SIZE,
            direction * SHOT_SPEED,
            Faction::Player,
            SHOT_DAMAGE,
        ));
        ctx.cue(Cue::TurretShoot);
        actor.pose(BehaviorState::Shoot, SHOOT_POSE_US, ctx);
    }

    pub(crate) fn on_death(&mut self, actor: &mut Actor, ctx: &mut TickCtx) {
        ctx.spawn(Entity::effect(actor.body.center(), EffectKind::Explosion, 8));
        ctx.cue(Cue::TurretDestroy);
        actor.vitals.die();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::TileGrid;
    use crate::entity::test_support::Harness;
    use crate::entity::{EntityId, EntityKind};

    fn run_ticks(turret: &mut Entity, harness: &mut Harness, view: &WorldView, ticks: usize) {
        let grid = TileGrid::new(40, 20, 32.0);
        for _ in 0..ticks {
            let mut ctx = harness.ctx();
            turret.update(view, &grid, &mut ctx);
            harness.now_us += harness.config.fixed_step_us;
        }
    }

    #[test]
    fn fires_at_nearest_hostile_on_interval() {
        let mut harness = Harness::new();
        let mut turret = Entity::turret(Vec2::new(100.0, 100.0));
        let view = WorldView {
            player: None,
            hostiles: vec![Target {
                id: EntityId(9),
                pos: Vec2::new(300.0, 100.0),
                size: Vec2::splat(32.0),
            }],
        };

        // 1.5 s at 16.667 ms per tick is reached on the 90th tick.
        run_ticks(&mut turret, &mut harness, &view, 89);
        assert_eq!(harness.lifecycle.pending_len(), 0);
        run_ticks(&mut turret, &mut harness, &view, 1);
        assert_eq!(harness.lifecycle.pending_len(), 1);
        assert_eq!(turret.body.facing, Facing::Right);
        assert_eq!(turret.behavior.current(), BehaviorState::Shoot);
        assert!(harness.cue_names().contains(&"turretShoot"));

        let mut live = Vec::new();
        harness.lifecycle.flush(&mut live);
        let shot = &live[0];
        assert!(matches!(&shot.kind, EntityKind::Projectile(p) if p.faction == Faction::Player));
        assert!(shot.body.vel.x > 0.0);
    }

    #[test]
    fn holds_fire_without_target_in_range() {
        let mut harness = Harness::new();
        let mut turret = Entity::turret(Vec2::new(100.0, 100.0));
        let view = WorldView {
            player: None,
            hostiles: vec![Target {
                id: EntityId(9),
                pos: Vec2::new(500.0, 100.0),
                size: Vec2::splat(32.0),
            }],
        };
        run_ticks(&mut turret, &mut harness, &view, 200);
        assert_eq!(harness.lifecycle.pending_len(), 0);
        assert_eq!(turret.body.pos, Vec2::new(100.0, 100.0));
    }
}
