use crate::cues::Cue;
use crate::effect::EffectKind;
use crate::entity::{Actor, Entity, EntityKind};
use crate::tick::{GameState, TickCtx};
use glam::Vec2;
use rand::Rng;

const BOB_AMPLITUDE: f32 = 5.0;
/// Radians per millisecond of simulated time.
const BOB_RATE: f64 = 0.002;
const SPARKLE_CHANCE: f64 = 0.1;
pub const HEAL_AMOUNT: i32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectibleKind {
    Coin,
    Health,
    /// The victory item dropped by the boss.
    Confetti,
}

impl CollectibleKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "coin" => Some(Self::Coin),
            "health" => Some(Self::Health),
            "confetti" => Some(Self::Confetti),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Coin => "coin",
            Self::Health => "health",
            Self::Confetti => "confetti",
        }
    }

    pub fn size(self) -> f32 {
        match self {
            Self::Confetti => 32.0,
            Self::Coin | Self::Health => 16.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Collectible {
    pub kind: CollectibleKind,
    base_y: f32,
}

impl Collectible {
    pub fn new(kind: CollectibleKind, base_y: f32) -> Self {
        Self { kind, base_y }
    }

    pub(crate) fn update(&mut self, actor: &mut Actor, ctx: &mut TickCtx) {
        let phase = ctx.now_us as f64 / 1_000.0 * BOB_RATE;
        actor.body.pos.y = self.base_y + phase.sin() as f32 * BOB_AMPLITUDE;

        if self.kind == CollectibleKind::Confetti && ctx.rng.gen_bool(SPARKLE_CHANCE) {
            let body = &*actor.body;
            let point = body.pos
                + Vec2::new(
                    ctx.rng.gen_range(0.0..body.size.x),
                    ctx.rng.gen_range(0.0..body.size.y),
                );
            ctx.spawn(Entity::effect(point, EffectKind::Sparkle, 3));
        }
    }
}

/// Apply a pickup to the player, then consume it.
pub(crate) fn collect(item: &mut Entity, player: &mut Entity, ctx: &mut TickCtx) {
    let EntityKind::Collectible(collectible) = &item.kind else {
        return;
    };
    match collectible.kind {
        CollectibleKind::Coin => {
            if let EntityKind::Player(data) = &mut player.kind {
                data.coins += 1;
            }
            ctx.cue(Cue::Coin);
        }
        CollectibleKind::Health => {
            if let Some(health) = player.vitals.health.as_mut() {
                health.heal(HEAL_AMOUNT);
            }
            ctx.cue(Cue::Powerup);
        }
        CollectibleKind::Confetti => {
            ctx.cue(Cue::Victory);
            ctx.transition(GameState::Victory);
        }
    }
    ctx.spawn(Entity::effect(item.body.center(), EffectKind::Collect, 5));
    item.vitals.die();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::TileGrid;
    use crate::entity::test_support::Harness;
    use crate::tick::WorldView;

    #[test]
    fn bobs_around_its_base() {
        let mut harness = Harness::new();
        let grid = TileGrid::new(10, 10, 32.0);
        let mut coin = Entity::collectible(Vec2::new(50.0, 100.0), CollectibleKind::Coin);
        for tick in 0..120u64 {
            harness.now_us = tick * 16_667;
            let mut ctx = harness.ctx();
            coin.update(&WorldView::default(), &grid, &mut ctx);
            assert!((coin.body.pos.y - 100.0).abs() <= BOB_AMPLITUDE + 1e-3);
        }
        assert_eq!(coin.body.pos.x, 50.0);
    }

    #[test]
    fn unknown_kind_is_none() {
        assert_eq!(CollectibleKind::from_name("gem"), None);
        assert_eq!(CollectibleKind::from_name("health"), Some(CollectibleKind::Health));
        assert_eq!(CollectibleKind::Confetti.size(), 32.0);
    }

    #[test]
    fn confetti_sparkles() {
        let mut harness = Harness::new();
        let grid = TileGrid::new(10, 10, 32.0);
        let mut confetti = Entity::collectible(Vec2::new(50.0, 100.0), CollectibleKind::Confetti);
        {
            let mut ctx = harness.ctx();
            for _ in 0..200 {
                confetti.update(&WorldView::default(), &grid, &mut ctx);
            }
        }
        let sparkles = harness.lifecycle.pending_len();
        assert!(sparkles > 0 && sparkles < 60, "sparkles {sparkles}");
    }
}
