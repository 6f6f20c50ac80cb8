//! Entity-vs-entity rules.
//!
//! Every unordered pair is tested once per tick for box overlap, and the first
//! rule that matches the pair (in either orientation) is applied. Entities
//! flagged for deletion earlier in the tick are still tested; guards on the
//! individual effects (death triggered, invulnerability) keep a pair from
//! doing double damage.

use crate::boss;
use crate::cues::Cue;
use crate::effect::EffectKind;
use crate::entity::{Entity, EntityKind, Faction};
use crate::hostile;
use crate::pickup;
use crate::tick::TickCtx;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    PlayerShotHits,
    HostileShotHits,
    BodyContact,
    Pickup,
}

fn classify(a: &EntityKind, b: &EntityKind) -> Option<Rule> {
    match (a, b) {
        (EntityKind::Projectile(shot), EntityKind::Hostile(_) | EntityKind::Boss(_))
            if shot.faction == Faction::Player =>
        {
            Some(Rule::PlayerShotHits)
        }
        (EntityKind::Projectile(shot), EntityKind::Player(_) | EntityKind::Turret(_))
            if shot.faction == Faction::Hostile =>
        {
            Some(Rule::HostileShotHits)
        }
        (EntityKind::Player(_), EntityKind::Hostile(_) | EntityKind::Boss(_)) => {
            Some(Rule::BodyContact)
        }
        (EntityKind::Player(_), EntityKind::Collectible(_)) => Some(Rule::Pickup),
        _ => None,
    }
}

pub fn resolve_interactions(entities: &mut [Entity], ctx: &mut TickCtx) {
    for i in 0..entities.len() {
        let (head, tail) = entities.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if !a.body.overlaps(&b.body) {
                continue;
            }
            if let Some(rule) = classify(&a.kind, &b.kind) {
                apply(rule, a, b, ctx);
            } else if let Some(rule) = classify(&b.kind, &a.kind) {
                apply(rule, b, a, ctx);
            }
        }
    }
}

fn apply(rule: Rule, first: &mut Entity, second: &mut Entity, ctx: &mut TickCtx) {
    match rule {
        Rule::PlayerShotHits => {
            shot_hits(first, second, ctx);
            let at = first.body.center();
            ctx.spawn(Entity::effect(at, EffectKind::Impact, 3));
            ctx.cue(Cue::BulletHit);
        }
        Rule::HostileShotHits => shot_hits(first, second, ctx),
        Rule::BodyContact => body_contact(first, second, ctx),
        Rule::Pickup => pickup::collect(second, first, ctx),
    }
}

fn shot_hits(shot: &mut Entity, target: &mut Entity, ctx: &mut TickCtx) {
    let EntityKind::Projectile(projectile) = &shot.kind else {
        return;
    };
    target.take_damage(projectile.damage, ctx);
    shot.vitals.die();
}

/// Player touching a hostile or the boss: a stomp from above damages the
/// target and bounces the player, anything else hurts the player.
fn body_contact(player: &mut Entity, target: &mut Entity, ctx: &mut TickCtx) {
    let invulnerable = matches!(&player.kind, EntityKind::Player(p) if p.is_invulnerable());
    if invulnerable || target.vitals.death_triggered {
        return;
    }

    let target_mid = target.body.top() + target.body.size.y / 2.0;
    let stomp = player.body.vel.y > 0.0 && player.body.bottom() < target_mid;
    if stomp {
        target.take_damage(1, ctx);
        player.body.vel.y = -ctx.config.player.jump_speed / 1.5;
        ctx.cue(Cue::Stomp);
        return;
    }

    let damage = match target.kind {
        EntityKind::Boss(_) => boss::CONTACT_DAMAGE,
        _ => hostile::CONTACT_DAMAGE,
    };
    player.take_damage(damage, ctx);
}
