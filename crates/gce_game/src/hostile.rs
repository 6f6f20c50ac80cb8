use crate::behavior::BehaviorState;
use crate::body::Facing;
use crate::collision::TileGrid;
use crate::cues::Cue;
use crate::effect::EffectKind;
use crate::entity::{Actor, Entity};
use crate::pickup::CollectibleKind;
use crate::tick::{TickCtx, WorldView};
use glam::Vec2;
use rand::Rng;

pub const SIZE: Vec2 = Vec2::new(32.0, 32.0);
pub const MAX_HEALTH: i32 = 1;
pub const CONTACT_DAMAGE: i32 = 10;
const SPEED: f32 = 90.0;
const DETECTION_RANGE: f32 = 200.0;
const ATTACK_RANGE: f32 = 50.0;
const PATROL_FLIP_US: u64 = 3_000_000;
const WALK_THRESHOLD: f32 = 6.0;
const COIN_DROP_CHANCE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostileKind {
    Sbeer,
    Ghoul,
    Spider,
}

impl HostileKind {
    /// Unknown names fall back to the basic walker.
    pub fn from_name(name: &str) -> Self {
        match name {
            "ghoul" => Self::Ghoul,
            "spider" => Self::Spider,
            "sbeer" => Self::Sbeer,
            other => {
                log::warn!("Unknown hostile kind '{other}', using sbeer");
                Self::Sbeer
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Sbeer => "sbeer",
            Self::Ghoul => "ghoul",
            Self::Spider => "spider",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Hostile {
    pub kind: HostileKind,
    direction: Facing,
    patrol_us: u64,
}

impl Hostile {
    pub fn new(kind: HostileKind) -> Self {
        Self {
            kind,
            direction: Facing::Left,
            patrol_us: 0,
        }
    }

    pub(crate) fn update(
        &mut self,
        actor: &mut Actor,
        view: &WorldView,
        grid: &TileGrid,
        ctx: &mut TickCtx,
    ) {
        let body = &mut *actor.body;
        let mut in_attack_range = false;

        match view.player {
            Some(player) if player.pos.distance(body.pos) < DETECTION_RANGE => {
                self.direction = Facing::toward(player.pos.x - body.pos.x);
                in_attack_range = player.pos.distance(body.pos) < ATTACK_RANGE;
            }
            _ => {
                self.patrol_us += ctx.dt_us;
                if self.patrol_us >= PATROL_FLIP_US {
                    self.patrol_us = 0;
                    self.direction = self.direction.flipped();
                }
            }
        }

        body.facing = self.direction;
        body.vel.x = self.direction.sign() * SPEED;
        body.integrate(ctx.dt_s(), ctx.config.gravity);

        if grid.resolve(body).blocked_horizontally() {
            self.direction = self.direction.flipped();
            body.facing = self.direction;
        }

        let state = if in_attack_range {
            BehaviorState::Attack
        } else if body.vel.x.abs() > WALK_THRESHOLD {
            BehaviorState::Walk
        } else {
            BehaviorState::Idle
        };
        actor.behavior.select(state);
    }

    pub(crate) fn on_death(&mut self, actor: &mut Actor, ctx: &mut TickCtx) {
        let body = &*actor.body;
        ctx.spawn(Entity::effect(body.center(), EffectKind::Death, 5));
        ctx.cue(Cue::EnemyDeath);
        if ctx.rng.gen_bool(COIN_DROP_CHANCE) {
            let drop = Vec2::new(body.pos.x + body.size.x / 4.0, body.pos.y);
            ctx.spawn(Entity::collectible(drop, CollectibleKind::Coin));
        }
        log::debug!("{} {:?} defeated", self.kind.name(), actor.id);
        actor.vitals.die();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::test_support::Harness;
    use crate::entity::EntityId;
    use crate::tick::Target;

    fn view_with_player(pos: Vec2) -> WorldView {
        WorldView {
            player: Some(Target {
                id: EntityId(1),
                pos,
                size: Vec2::new(32.0, 48.0),
            }),
            hostiles: Vec::new(),
        }
    }

    #[test]
    fn chases_player_in_range() {
        let mut harness = Harness::new();
        let grid = TileGrid::new(40, 20, 32.0);
        let mut hostile = Entity::hostile(Vec2::new(300.0, 100.0), HostileKind::Sbeer, &harness.config);
        let view = view_with_player(Vec2::new(200.0, 100.0));
        {
            let mut ctx = harness.ctx();
            hostile.update(&view, &grid, &mut ctx);
        }
        assert!(hostile.body.vel.x < 0.0);
        assert_eq!(hostile.body.facing, Facing::Left);
        assert_eq!(hostile.behavior.current(), BehaviorState::Walk);
    }

    #[test]
    fn attack_state_when_close() {
        let mut harness = Harness::new();
        let grid = TileGrid::new(40, 20, 32.0);
        let mut hostile = Entity::hostile(Vec2::new(300.0, 100.0), HostileKind::Ghoul, &harness.config);
        let view = view_with_player(Vec2::new(330.0, 100.0));
        {
            let mut ctx = harness.ctx();
            hostile.update(&view, &grid, &mut ctx);
        }
        assert_eq!(hostile.body.facing, Facing::Right);
        assert_eq!(hostile.behavior.current(), BehaviorState::Attack);
    }

    #[test]
    fn patrol_turns_at_walls() {
        let mut harness = Harness::new();
        let mut grid = TileGrid::new(40, 20, 32.0);
        grid.set(2, 3, Some(crate::collision::TileKind::Brick));
        let mut hostile = Entity::hostile(Vec2::new(97.0, 96.0), HostileKind::Spider, &harness.config);
        {
            let mut ctx = harness.ctx();
            hostile.update(&WorldView::default(), &grid, &mut ctx);
        }
        assert_eq!(hostile.body.pos.x, 96.0);
        assert_eq!(hostile.body.facing, Facing::Right);
    }

    #[test]
    fn patrol_crosses_flat_floor_without_turning() {
        let mut harness = Harness::new();
        let mut grid = TileGrid::new(60, 12, 32.0);
        for x in 0..60 {
            grid.set(x, 11, Some(crate::collision::TileKind::Dirt));
        }
        let mut hostile = Entity::hostile(Vec2::new(100.3, 320.0), HostileKind::Sbeer, &harness.config);
        if let crate::entity::EntityKind::Hostile(data) = &mut hostile.kind {
            data.direction = Facing::Right;
        }
        for tick in 0..150 {
            {
                let mut ctx = harness.ctx();
                hostile.update(&WorldView::default(), &grid, &mut ctx);
            }
            harness.now_us += harness.config.fixed_step_us;
            assert_eq!(hostile.body.facing, Facing::Right, "turned at tick {tick}");
            assert_eq!(hostile.body.bottom(), 352.0);
        }
        assert!(hostile.body.pos.x > 100.3 + 4.0 * 32.0);
    }

    #[test]
    fn unknown_kind_falls_back() {
        assert_eq!(HostileKind::from_name("slime"), HostileKind::Sbeer);
        assert_eq!(HostileKind::from_name("spider"), HostileKind::Spider);
    }
}
