use crate::entity::Actor;
use crate::tick::TickCtx;

const FRAME_US: u64 = 100_000;

/// Short-lived visual effect with no gameplay interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Explosion,
    Impact,
    Collect,
    Death,
    Spawn,
    Charge,
    Hit,
    Sparkle,
}

impl EffectKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Explosion => "explosion",
            Self::Impact => "impact",
            Self::Collect => "collect",
            Self::Death => "death",
            Self::Spawn => "spawn",
            Self::Charge => "charge",
            Self::Hit => "hit",
            Self::Sparkle => "sparkle",
        }
    }

    pub fn size(self) -> f32 {
        match self {
            Self::Explosion => 64.0,
            Self::Death => 48.0,
            Self::Sparkle => 16.0,
            Self::Impact | Self::Collect | Self::Spawn | Self::Charge | Self::Hit => 32.0,
        }
    }

    /// Number of distinct sprite frames; longer effects hold the last one.
    pub fn frame_count(self) -> u32 {
        match self {
            Self::Explosion | Self::Collect | Self::Death => 5,
            Self::Spawn | Self::Charge => 4,
            Self::Impact | Self::Hit | Self::Sparkle => 3,
        }
    }

    /// Upward drift in px/s.
    fn rise_speed(self) -> f32 {
        match self {
            Self::Sparkle => 30.0,
            Self::Collect => 60.0,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Effect {
    pub kind: EffectKind,
    pub duration_frames: u32,
    pub frame: u32,
    frame_timer_us: u64,
}

impl Effect {
    pub fn new(kind: EffectKind, duration_frames: u32) -> Self {
        Self {
            kind,
            duration_frames,
            frame: 0,
            frame_timer_us: 0,
        }
    }

    pub fn sprite_frame(&self) -> u32 {
        self.frame.min(self.kind.frame_count().saturating_sub(1))
    }

    pub(crate) fn update(&mut self, actor: &mut Actor, ctx: &mut TickCtx) {
        actor.body.pos.y -= self.kind.rise_speed() * ctx.dt_s();

        self.frame_timer_us += ctx.dt_us;
        if self.frame_timer_us >= FRAME_US {
            self.frame_timer_us -= FRAME_US;
            self.frame += 1;
            if self.frame >= self.duration_frames {
                actor.vitals.die();
            }
        }
    }
}
