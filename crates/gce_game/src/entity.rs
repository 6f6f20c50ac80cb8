//! The entity model.
//!
//! Every simulated object is an [`Entity`]: shared kinematic and life-cycle
//! state plus an [`EntityKind`] carrying the kind-specific data. Hooks
//! (`update`, `take_damage`, `trigger_death`, `perform`) dispatch on the kind
//! and hand the per-kind code an [`Actor`], a view of the shared fields that
//! can be borrowed alongside the kind data.

use crate::behavior::{BehaviorState, StateMachine};
use crate::body::Body;
use crate::boss::{self, Boss};
use crate::collision::TileGrid;
use crate::config::SimConfig;
use crate::effect::{Effect, EffectKind};
use crate::hostile::{self, Hostile, HostileKind};
use crate::pickup::{Collectible, CollectibleKind};
use crate::player::{self, Player, PlayerColor};
use crate::projectile::Projectile;
use crate::schedule::ScheduledAction;
use crate::tick::{TickCtx, WorldView};
use crate::turret::{self, Turret};
use gce_core::animation::{AnimationClip, AnimationState};
use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Placeholder carried until the lifecycle assigns a real id.
    pub const UNASSIGNED: EntityId = EntityId(0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Faction {
    Player,
    Hostile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn full(max: i32) -> Self {
        Self { current: max, max }
    }

    pub fn ratio(&self) -> f32 {
        if self.max <= 0 {
            return 0.0;
        }
        (self.current.max(0) as f32 / self.max as f32).min(1.0)
    }

    pub fn heal(&mut self, amount: i32) {
        self.current = (self.current + amount).min(self.max);
    }
}

#[derive(Debug, Clone, Default)]
pub struct Vitals {
    pub health: Option<Health>,
    pub marked_for_deletion: bool,
    pub death_triggered: bool,
}

impl Vitals {
    /// Flag for removal at the next flush. Idempotent.
    pub fn die(&mut self) {
        self.marked_for_deletion = true;
    }
}

#[derive(Debug, Clone)]
pub enum EntityKind {
    Player(Player),
    Hostile(Hostile),
    Boss(Boss),
    Turret(Turret),
    Projectile(Projectile),
    Collectible(Collectible),
    Effect(Effect),
}

impl EntityKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Player(_) => "player",
            Self::Hostile(_) => "hostile",
            Self::Boss(_) => "boss",
            Self::Turret(_) => "turret",
            Self::Projectile(_) => "projectile",
            Self::Collectible(_) => "collectible",
            Self::Effect(_) => "effect",
        }
    }
}

/// Mutable view of the shared parts of an entity.
pub struct Actor<'a> {
    pub id: EntityId,
    pub body: &'a mut Body,
    pub vitals: &'a mut Vitals,
    pub behavior: &'a mut StateMachine,
}

impl Actor<'_> {
    /// Enter an event state and schedule its end.
    pub fn pose(&mut self, state: BehaviorState, duration_us: u64, ctx: &mut TickCtx) {
        let token = self.behavior.trigger(state);
        ctx.schedule_in(duration_us, self.id, ScheduledAction::RevertState { token });
    }
}

const FRAME_US: u64 = 100_000;

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub body: Body,
    pub vitals: Vitals,
    pub behavior: StateMachine,
    pub animation: AnimationState,
    pub z_index: i32,
    pub kind: EntityKind,
}

impl Entity {
    fn new(kind: EntityKind, body: Body, health: Option<i32>, z_index: i32) -> Self {
        let mut entity = Self {
            id: EntityId::UNASSIGNED,
            body,
            vitals: Vitals {
                health: health.map(Health::full),
                ..Vitals::default()
            },
            behavior: StateMachine::default(),
            animation: AnimationState::new(AnimationClip::looping(1, FRAME_US)),
            z_index,
            kind,
        };
        entity.animation = AnimationState::new(entity.animation_clip());
        entity
    }

    pub fn player(pos: Vec2, color: PlayerColor, config: &SimConfig) -> Self {
        let mut body = Body::new(pos, player::SIZE);
        body.friction = config.friction;
        Self::new(
            EntityKind::Player(Player::new(color)),
            body,
            Some(config.player.max_health),
            10,
        )
    }

    pub fn hostile(pos: Vec2, kind: HostileKind, config: &SimConfig) -> Self {
        let mut body = Body::new(pos, hostile::SIZE);
        body.friction = config.friction;
        Self::new(
            EntityKind::Hostile(Hostile::new(kind)),
            body,
            Some(hostile::MAX_HEALTH),
            1,
        )
    }

    pub fn boss(pos: Vec2, config: &SimConfig) -> Self {
        let mut body = Body::new(pos, boss::SIZE);
        body.friction = config.friction;
        body.facing = crate::body::Facing::Left;
        Self::new(
            EntityKind::Boss(Boss::new()),
            body,
            Some(boss::MAX_HEALTH),
            5,
        )
    }

    pub fn turret(pos: Vec2) -> Self {
        let mut body = Body::new(pos, turret::SIZE);
        body.gravity_scale = 0.0;
        Self::new(
            EntityKind::Turret(Turret::new()),
            body,
            Some(turret::MAX_HEALTH),
            2,
        )
    }

    pub fn projectile(pos: Vec2, size: f32, vel: Vec2, faction: Faction, damage: i32) -> Self {
        let mut body = Body::new(pos, Vec2::splat(size));
        body.gravity_scale = 0.0;
        body.vel = vel;
        body.facing = crate::body::Facing::toward(vel.x);
        Self::new(
            EntityKind::Projectile(Projectile::new(faction, damage)),
            body,
            None,
            3,
        )
    }

    pub fn collectible(pos: Vec2, kind: CollectibleKind) -> Self {
        let mut body = Body::new(pos, Vec2::splat(kind.size()));
        body.gravity_scale = 0.0;
        Self::new(
            EntityKind::Collectible(Collectible::new(kind, pos.y)),
            body,
            None,
            3,
        )
    }

    /// Effects are placed by their centre point.
    pub fn effect(center: Vec2, kind: EffectKind, duration_frames: u32) -> Self {
        let size = Vec2::splat(kind.size());
        let mut body = Body::new(center - size * 0.5, size);
        body.gravity_scale = 0.0;
        Self::new(
            EntityKind::Effect(Effect::new(kind, duration_frames)),
            body,
            None,
            15,
        )
    }

    pub fn is_live(&self) -> bool {
        !self.vitals.marked_for_deletion
    }

    fn actor(&mut self) -> (Actor<'_>, &mut EntityKind) {
        (
            Actor {
                id: self.id,
                body: &mut self.body,
                vitals: &mut self.vitals,
                behavior: &mut self.behavior,
            },
            &mut self.kind,
        )
    }

    pub fn update(&mut self, view: &WorldView, grid: &TileGrid, ctx: &mut TickCtx) {
        if self.vitals.marked_for_deletion {
            return;
        }

        let (mut actor, kind) = self.actor();
        match kind {
            EntityKind::Player(player) => player.update(&mut actor, grid, ctx),
            EntityKind::Hostile(hostile) => hostile.update(&mut actor, view, grid, ctx),
            EntityKind::Boss(boss) => boss.update(&mut actor, view, grid, ctx),
            EntityKind::Turret(turret) => turret.update(&mut actor, view, ctx),
            EntityKind::Projectile(projectile) => projectile.update(&mut actor, grid, ctx),
            EntityKind::Collectible(collectible) => collectible.update(&mut actor, ctx),
            EntityKind::Effect(effect) => effect.update(&mut actor, ctx),
        }

        self.apply_boundaries(ctx);

        let clip = self.animation_clip();
        self.animation.play(clip);
        self.animation.tick(ctx.dt_us);
    }

    fn apply_boundaries(&mut self, ctx: &mut TickCtx) {
        if self.vitals.marked_for_deletion {
            return;
        }

        if matches!(
            self.kind,
            EntityKind::Player(_) | EntityKind::Hostile(_) | EntityKind::Boss(_)
        ) {
            let max_x = (ctx.level_size.x - self.body.size.x).max(0.0);
            if self.body.pos.x < 0.0 || self.body.pos.x > max_x {
                self.body.pos.x = self.body.pos.x.clamp(0.0, max_x);
                self.body.vel.x = 0.0;
            }
        }

        if self.body.top() > ctx.level_size.y {
            if self.vitals.health.is_some() {
                log::debug!("{} {:?} fell out of the level", self.kind.label(), self.id);
                self.trigger_death(ctx);
            } else {
                self.vitals.die();
            }
        }
    }

    /// Apply damage. Returns whether it landed; damage to an invulnerable
    /// player, a dying entity or a kind without health is ignored.
    pub fn take_damage(&mut self, amount: i32, ctx: &mut TickCtx) -> bool {
        if self.vitals.death_triggered {
            return false;
        }
        if let EntityKind::Player(player) = &self.kind {
            if player.is_invulnerable() {
                return false;
            }
        }
        let Some(health) = self.vitals.health.as_mut() else {
            return false;
        };
        health.current -= amount;
        let dead = health.current <= 0;

        let (mut actor, kind) = self.actor();
        match kind {
            EntityKind::Player(player) => player.on_damage(&mut actor, ctx),
            EntityKind::Boss(boss) => boss.on_damage(&mut actor, ctx),
            _ => {}
        }

        if dead {
            self.trigger_death(ctx);
        }
        true
    }

    /// Run the kind's death hook. Only the first call has any effect.
    pub fn trigger_death(&mut self, ctx: &mut TickCtx) {
        if self.vitals.death_triggered {
            return;
        }
        self.vitals.death_triggered = true;
        if let Some(health) = self.vitals.health.as_mut() {
            health.current = health.current.min(0);
        }

        let (mut actor, kind) = self.actor();
        match kind {
            EntityKind::Player(player) => player.on_death(&mut actor, ctx),
            EntityKind::Hostile(hostile) => hostile.on_death(&mut actor, ctx),
            EntityKind::Boss(boss) => boss.on_death(&mut actor, ctx),
            EntityKind::Turret(turret) => turret.on_death(&mut actor, ctx),
            EntityKind::Projectile(_) | EntityKind::Collectible(_) | EntityKind::Effect(_) => {
                actor.vitals.die()
            }
        }
    }

    /// Run a scheduled action owned by this entity.
    pub fn perform(&mut self, action: ScheduledAction, ctx: &mut TickCtx) {
        let (mut actor, kind) = self.actor();
        match (action, kind) {
            (ScheduledAction::RevertState { token }, _) => actor.behavior.revert(token),
            (ScheduledAction::BossShot { index }, EntityKind::Boss(boss)) => {
                boss.fire_shot(&actor, index, ctx)
            }
            (ScheduledAction::BossSummon { index }, EntityKind::Boss(_)) => {
                boss::summon_minion(&actor, index, ctx)
            }
            (ScheduledAction::BossFollowUpAttack, EntityKind::Boss(boss)) => {
                boss.attack(&mut actor, ctx)
            }
            (ScheduledAction::BossExplosion, EntityKind::Boss(_)) => boss::explode(&actor, ctx),
            (ScheduledAction::BossFinale, EntityKind::Boss(_)) => boss::finale(&mut actor, ctx),
            (action, kind) => {
                log::trace!("{} {:?} ignores {action:?}", kind.label(), actor.id)
            }
        }
    }

    /// Re-evaluate a living boss's phase from its health.
    pub fn check_boss_phase(&mut self, ctx: &mut TickCtx) {
        if self.vitals.death_triggered || self.vitals.marked_for_deletion {
            return;
        }
        if let (EntityKind::Boss(boss), Some(health)) = (&mut self.kind, &self.vitals.health) {
            boss.check_phase(health, ctx);
        }
    }

    pub fn animation_clip(&self) -> AnimationClip {
        use BehaviorState as S;
        let state = self.behavior.current();
        match &self.kind {
            EntityKind::Player(_) => match state {
                S::Walk => AnimationClip::looping(3, FRAME_US),
                S::Jump => AnimationClip::looping(1, FRAME_US),
                _ => AnimationClip::looping(2, FRAME_US),
            },
            EntityKind::Hostile(_) => match state {
                S::Walk => AnimationClip::looping(3, FRAME_US),
                _ => AnimationClip::looping(2, FRAME_US),
            },
            EntityKind::Boss(_) => match state {
                S::Walk => AnimationClip::looping(3, FRAME_US),
                S::Hurt => AnimationClip::looping(1, FRAME_US),
                S::Death => AnimationClip::once(4, FRAME_US),
                _ => AnimationClip::looping(2, FRAME_US),
            },
            EntityKind::Turret(_) => AnimationClip::looping(2, FRAME_US),
            EntityKind::Projectile(_) => AnimationClip::looping(1, FRAME_US),
            EntityKind::Collectible(_) => AnimationClip::looping(4, 150_000),
            EntityKind::Effect(effect) => AnimationClip::once(effect.kind.frame_count(), FRAME_US),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::cues::CueRequest;
    use crate::lifecycle::Lifecycle;
    use crate::schedule::Scheduler;
    use crate::tick::GameState;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Owned backing storage for a `TickCtx` in unit tests.
    pub struct Harness {
        pub config: SimConfig,
        pub lifecycle: Lifecycle,
        pub scheduler: Scheduler,
        pub cues: Vec<CueRequest>,
        pub rng: StdRng,
        pub state: GameState,
        pub now_us: u64,
    }

    impl Harness {
        pub fn new() -> Self {
            Self {
                config: SimConfig::default(),
                lifecycle: Lifecycle::new(),
                scheduler: Scheduler::new(),
                cues: Vec::new(),
                rng: StdRng::seed_from_u64(42),
                state: GameState::Playing,
                now_us: 0,
            }
        }

        pub fn ctx(&mut self) -> TickCtx<'_> {
            TickCtx {
                now_us: self.now_us,
                dt_us: self.config.fixed_step_us,
                config: &self.config,
                controls: Default::default(),
                level_size: Vec2::new(3200.0, 640.0),
                lifecycle: &mut self.lifecycle,
                scheduler: &mut self.scheduler,
                cues: &mut self.cues,
                rng: &mut self.rng,
                game_state: &mut self.state,
            }
        }

        pub fn cue_names(&self) -> Vec<&'static str> {
            self.cues.iter().map(|r| r.cue.name()).collect()
        }
    }
}
