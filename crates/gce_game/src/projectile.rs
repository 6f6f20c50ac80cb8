use crate::collision::TileGrid;
use crate::cues::Cue;
use crate::effect::EffectKind;
use crate::entity::{Actor, Entity, Faction};
use crate::tick::TickCtx;

pub const LIFESPAN_US: u64 = 2_000_000;

#[derive(Debug, Clone)]
pub struct Projectile {
    pub faction: Faction,
    pub damage: i32,
    remaining_us: u64,
}

impl Projectile {
    pub fn new(faction: Faction, damage: i32) -> Self {
        Self {
            faction,
            damage,
            remaining_us: LIFESPAN_US,
        }
    }

    /// Straight-line flight; expires with its lifespan or on the first tile.
    pub(crate) fn update(&mut self, actor: &mut Actor, grid: &TileGrid, ctx: &mut TickCtx) {
        let body = &mut *actor.body;
        body.pos += body.vel * ctx.dt_s();

        self.remaining_us = self.remaining_us.saturating_sub(ctx.dt_us);
        if self.remaining_us == 0 {
            actor.vitals.die();
            return;
        }

        let impact_at = body.center();
        if grid.resolve(body).any() {
            ctx.spawn(Entity::effect(impact_at, EffectKind::Impact, 3));
            ctx.cue(Cue::BulletImpact);
            actor.vitals.die();
        }
    }
}
