//! Named audio/effect cues. The simulation only requests them; playing them is
//! up to whatever `CueSink` the host provides.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Jump,
    Shoot,
    Hurt,
    Death,
    Stomp,
    Coin,
    Powerup,
    Victory,
    EnemyDeath,
    BulletImpact,
    BulletHit,
    TurretShoot,
    TurretDestroy,
    BossPhase,
    BossJump,
    BossShoot,
    BossSummon,
    BossCharge,
    BossHurt,
    BossDeath,
    Explosion,
    ConfettiAppear,
}

impl Cue {
    pub fn name(self) -> &'static str {
        match self {
            Self::Jump => "jump",
            Self::Shoot => "shoot",
            Self::Hurt => "hurt",
            Self::Death => "death",
            Self::Stomp => "stomp",
            Self::Coin => "coin",
            Self::Powerup => "powerup",
            Self::Victory => "victory",
            Self::EnemyDeath => "enemyDeath",
            Self::BulletImpact => "bulletImpact",
            Self::BulletHit => "bulletHit",
            Self::TurretShoot => "turretShoot",
            Self::TurretDestroy => "turretDestroy",
            Self::BossPhase => "bossPhase",
            Self::BossJump => "bossJump",
            Self::BossShoot => "bossShoot",
            Self::BossSummon => "bossSummon",
            Self::BossCharge => "bossCharge",
            Self::BossHurt => "bossHurt",
            Self::BossDeath => "bossDeath",
            Self::Explosion => "explosion",
            Self::ConfettiAppear => "confettiAppear",
        }
    }

    pub fn default_volume(self) -> f32 {
        match self {
            Self::Death
            | Self::Victory
            | Self::BossPhase
            | Self::BossDeath
            | Self::ConfettiAppear => 1.0,
            Self::Stomp | Self::BossJump | Self::BossSummon | Self::BossCharge => 0.7,
            Self::TurretDestroy => 0.6,
            Self::Jump
            | Self::Hurt
            | Self::Coin
            | Self::Powerup
            | Self::EnemyDeath
            | Self::BossShoot
            | Self::BossHurt => 0.5,
            Self::TurretShoot => 0.4,
            Self::Shoot | Self::BulletHit | Self::Explosion => 0.3,
            Self::BulletImpact => 0.2,
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CueRequest {
    pub cue: Cue,
    pub volume: f32,
}

impl CueRequest {
    pub fn new(cue: Cue) -> Self {
        Self {
            cue,
            volume: cue.default_volume(),
        }
    }
}

pub trait CueSink {
    fn play(&mut self, request: CueRequest);
}

/// Discards every cue.
pub struct NullCueSink;

impl CueSink for NullCueSink {
    fn play(&mut self, _request: CueRequest) {}
}

/// Records cues in order; handy for hosts that batch them and for tests.
impl CueSink for Vec<CueRequest> {
    fn play(&mut self, request: CueRequest) {
        self.push(request);
    }
}

/// Logs each cue at debug level.
pub struct LogCueSink;

impl CueSink for LogCueSink {
    fn play(&mut self, request: CueRequest) {
        log::debug!("cue {} (volume {:.1})", request.cue, request.volume);
    }
}
