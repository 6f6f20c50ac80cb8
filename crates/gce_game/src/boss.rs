//! Boss behavior.
//!
//! The boss escalates through three phases as its health drops and never goes
//! back. Each phase has its own movement pattern and attack cadence. Multi-step
//! attacks (shot bursts, summons) and the death sequence are spread over time
//! through the world scheduler, keyed on the boss's id, so nothing fires for a
//! boss that is no longer there.

use crate::behavior::BehaviorState;
use crate::body::Facing;
use crate::collision::TileGrid;
use crate::cues::Cue;
use crate::effect::EffectKind;
use crate::entity::{Actor, Entity, Faction, Health};
use crate::hostile::HostileKind;
use crate::pickup::CollectibleKind;
use crate::schedule::ScheduledAction;
use crate::tick::{Target, TickCtx, WorldView};
use glam::Vec2;
use rand::Rng;

pub const SIZE: Vec2 = Vec2::new(64.0, 96.0);
pub const MAX_HEALTH: i32 = 100;
pub const CONTACT_DAMAGE: i32 = 20;

const POSE_US: u64 = 400_000;
const HURT_US: u64 = 200_000;
const WALK_THRESHOLD: f32 = 6.0;

const SHOT_SPACING_US: u64 = 200_000;
const SHOT_SPEED: f32 = 480.0;
const SHOT_DAMAGE: i32 = 10;
const SHOT_SIZE: f32 = 16.0;

const SUMMON_DELAY_US: u64 = 500_000;
const SUMMON_SPACING_US: u64 = 300_000;
const SUMMON_OFFSET: f32 = 50.0;

const FOLLOW_UP_DELAY_US: u64 = 500_000;
const FOLLOW_UP_CHANCE: f64 = 0.3;

const EXPLOSION_COUNT: u64 = 10;
const EXPLOSION_SPACING_US: u64 = 200_000;
const FINALE_DELAY_US: u64 = 2_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossAttack {
    RangedBurst,
    Summon,
    Charge,
}

#[derive(Debug, Clone)]
pub struct Boss {
    phase: u8,
    attack_timer_us: u64,
    jump_timer_us: u64,
}

impl Default for Boss {
    fn default() -> Self {
        Self::new()
    }
}

impl Boss {
    pub fn new() -> Self {
        Self {
            phase: 1,
            attack_timer_us: 0,
            jump_timer_us: 0,
        }
    }

    pub fn phase(&self) -> u8 {
        self.phase
    }

    fn attack_interval_us(&self) -> u64 {
        match self.phase {
            1 => 2_000_000,
            2 => 1_400_000,
            _ => 800_000,
        }
    }

    fn jump_interval_us(&self) -> Option<u64> {
        match self.phase {
            1 => None,
            2 => Some(4_000_000),
            _ => Some(2_000_000),
        }
    }

    pub(crate) fn update(
        &mut self,
        actor: &mut Actor,
        view: &WorldView,
        grid: &TileGrid,
        ctx: &mut TickCtx,
    ) {
        if actor.vitals.death_triggered {
            actor.body.vel = Vec2::ZERO;
            actor.body.accel = Vec2::ZERO;
            return;
        }

        if let Some(player) = view.player {
            self.pursue(actor, &player, ctx);
        }

        actor.body.integrate(ctx.dt_s(), ctx.config.gravity);
        grid.resolve(actor.body);

        let state = if actor.body.vel.x.abs() > WALK_THRESHOLD {
            BehaviorState::Walk
        } else {
            BehaviorState::Idle
        };
        actor.behavior.select(state);
    }

    fn pursue(&mut self, actor: &mut Actor, player: &Target, ctx: &mut TickCtx) {
        self.attack_timer_us += ctx.dt_us;
        let jump_interval = self.jump_interval_us();
        if jump_interval.is_some() {
            self.jump_timer_us += ctx.dt_us;
        }

        let body = &mut *actor.body;
        let offset = player.pos - body.pos;
        let distance = offset.length();
        let toward = Facing::toward(offset.x);
        body.facing = toward;
        let jump_due = body.on_ground && jump_interval.is_some_and(|i| self.jump_timer_us >= i);

        match self.phase {
            1 => {
                if distance > 100.0 {
                    body.vel.x = toward.sign() * 120.0;
                } else {
                    body.vel.x *= 0.9;
                }
            }
            2 => {
                if distance > 80.0 {
                    body.vel.x = toward.sign() * 180.0;
                } else {
                    body.vel.x *= 0.9;
                }
                if jump_due {
                    self.jump_timer_us = 0;
                    body.vel.y = -720.0;
                    body.vel.x = toward.sign() * 360.0;
                    ctx.cue(Cue::BossJump);
                }
            }
            _ => {
                let heading = if self.attack_timer_us % 500_000 < 250_000 {
                    toward
                } else {
                    toward.flipped()
                };
                body.vel.x = heading.sign() * 240.0;
                if jump_due {
                    self.jump_timer_us = 0;
                    body.vel.y = -840.0;
                }
            }
        }

        if self.attack_timer_us >= self.attack_interval_us() {
            self.attack_timer_us = 0;
            self.attack(actor, ctx);
            if self.phase >= 3 && ctx.rng.gen_bool(FOLLOW_UP_CHANCE) {
                ctx.schedule_in(
                    FOLLOW_UP_DELAY_US,
                    actor.id,
                    ScheduledAction::BossFollowUpAttack,
                );
            }
        }
    }

    pub(crate) fn attack(&mut self, actor: &mut Actor, ctx: &mut TickCtx) {
        let attack = match ctx.rng.gen_range(0..3) {
            0 => BossAttack::RangedBurst,
            1 => BossAttack::Summon,
            _ => BossAttack::Charge,
        };
        log::debug!("Boss {:?} phase {} uses {attack:?}", actor.id, self.phase);

        let phase = u64::from(self.phase);
        match attack {
            BossAttack::RangedBurst => {
                actor.pose(BehaviorState::Shoot, POSE_US, ctx);
                for i in 0..phase {
                    ctx.schedule_in(
                        i * SHOT_SPACING_US,
                        actor.id,
                        ScheduledAction::BossShot { index: i as u32 },
                    );
                }
            }
            BossAttack::Summon => {
                actor.pose(BehaviorState::Summon, POSE_US, ctx);
                ctx.cue(Cue::BossSummon);
                for i in 0..phase.min(2) {
                    ctx.schedule_in(
                        SUMMON_DELAY_US + i * SUMMON_SPACING_US,
                        actor.id,
                        ScheduledAction::BossSummon { index: i as u32 },
                    );
                }
            }
            BossAttack::Charge => {
                actor.pose(BehaviorState::Charge, POSE_US, ctx);
                let speed = (10.0 + 2.0 * f32::from(self.phase)) * 60.0;
                actor.body.vel.x = actor.body.facing.sign() * speed;
                ctx.spawn(Entity::effect(actor.body.center(), EffectKind::Charge, 10));
                ctx.cue(Cue::BossCharge);
            }
        }
    }

    /// One shot of a ranged burst. Shots fan downward from -10° in 20° steps.
    pub(crate) fn fire_shot(&self, actor: &Actor, index: u32, ctx: &mut TickCtx) {
        let body = &*actor.body;
        let angle = (-10.0 + 20.0 * index as f32).to_radians();
        let x = match body.facing {
            Facing::Right => body.right(),
            Facing::Left => body.left(),
        };
        let origin = Vec2::new(x, body.top() + body.size.y / 3.0);
        let vel = Vec2::new(body.facing.sign() * angle.cos(), angle.sin()) * SHOT_SPEED;
        ctx.spawn(Entity::projectile(
            origin,
            SHOT_SIZE,
            vel,
            Faction::Hostile,
            SHOT_DAMAGE,
        ));
        ctx.cue(Cue::BossShoot);
    }

    pub(crate) fn on_damage(&mut self, actor: &mut Actor, ctx: &mut TickCtx) {
        actor.pose(BehaviorState::Hurt, HURT_US, ctx);
        ctx.spawn(Entity::effect(actor.body.center(), EffectKind::Hit, 5));
        ctx.cue(Cue::BossHurt);
    }

    pub(crate) fn on_death(&mut self, actor: &mut Actor, ctx: &mut TickCtx) {
        log::info!("Boss {:?} defeated in phase {}", actor.id, self.phase);
        actor.behavior.kill();
        actor.body.vel = Vec2::ZERO;
        actor.body.accel = Vec2::ZERO;
        ctx.cue(Cue::BossDeath);
        for i in 0..EXPLOSION_COUNT {
            ctx.schedule_in(
                i * EXPLOSION_SPACING_US,
                actor.id,
                ScheduledAction::BossExplosion,
            );
        }
        ctx.schedule_in(FINALE_DELAY_US, actor.id, ScheduledAction::BossFinale);
    }

    /// Advance the phase if health has dropped past a threshold. Returns the
    /// new phase when it changed.
    pub(crate) fn check_phase(&mut self, health: &Health, ctx: &mut TickCtx) -> Option<u8> {
        let next = phase_for(health);
        if next <= self.phase {
            return None;
        }
        log::debug!("Boss phase {} -> {next}", self.phase);
        self.phase = next;
        ctx.cue(Cue::BossPhase);
        Some(next)
    }
}

/// Phase implied by a health fraction: above 66% is 1, above 33% is 2.
pub fn phase_for(health: &Health) -> u8 {
    let scaled = i64::from(health.current) * 100;
    let max = i64::from(health.max);
    if scaled <= max * 33 {
        3
    } else if scaled <= max * 66 {
        2
    } else {
        1
    }
}

pub(crate) fn summon_minion(actor: &Actor, index: u32, ctx: &mut TickCtx) {
    let body = &*actor.body;
    let x = if index % 2 == 0 {
        body.left() - SUMMON_OFFSET
    } else {
        body.right() + SUMMON_OFFSET
    };
    let minion = Entity::hostile(Vec2::new(x, body.top()), HostileKind::Sbeer, ctx.config);
    let center = minion.body.center();
    let id = ctx.spawn(minion);
    ctx.spawn(Entity::effect(center, EffectKind::Spawn, 5));
    log::debug!("Boss {:?} summoned hostile {id:?}", actor.id);
}

pub(crate) fn explode(actor: &Actor, ctx: &mut TickCtx) {
    let body = &*actor.body;
    let point = body.pos
        + Vec2::new(
            ctx.rng.gen_range(0.0..body.size.x),
            ctx.rng.gen_range(0.0..body.size.y),
        );
    ctx.spawn(Entity::effect(point, EffectKind::Explosion, 8));
    ctx.cue(Cue::Explosion);
}

pub(crate) fn finale(actor: &mut Actor, ctx: &mut TickCtx) {
    let size = Vec2::splat(CollectibleKind::Confetti.size());
    // Keep the prize reachable even if the boss died off the map.
    let pos = (actor.body.center() - size * 0.5)
        .clamp(Vec2::ZERO, (ctx.level_size - size).max(Vec2::ZERO));
    ctx.spawn(Entity::collectible(pos, CollectibleKind::Confetti));
    ctx.cue(Cue::ConfettiAppear);
    actor.vitals.die();
}
