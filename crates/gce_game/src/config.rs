//! Simulation tunables, loadable from JSON. Every field has a default so a
//! config file only needs to name what it overrides.

use gce_core::time::DEFAULT_FIXED_STEP_US;
use glam::Vec2;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 540.0,
        }
    }
}

/// Player movement and combat tuning.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    /// Horizontal acceleration while a direction is held (px/s²).
    pub run_accel: f32,
    /// Initial upward speed of a jump (px/s).
    pub jump_speed: f32,
    pub shot_speed: f32,
    pub shot_damage: i32,
    pub shoot_cooldown_ms: u64,
    pub invulnerability_ms: u64,
    pub max_health: i32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            run_accel: 1800.0,
            jump_speed: 720.0,
            shot_speed: 600.0,
            shot_damage: 5,
            shoot_cooldown_ms: 300,
            invulnerability_ms: 1000,
            max_health: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub fixed_step_us: u64,
    /// Cap applied to a single frame's elapsed time. `None` keeps every
    /// microsecond, so a stalled host catches up with a burst of steps.
    pub max_frame_us: Option<u64>,
    pub viewport: Viewport,
    /// Downward acceleration (px/s²).
    pub gravity: f32,
    pub friction: f32,
    /// Seed for the world RNG. Without one the world seeds from entropy.
    pub rng_seed: Option<u64>,
    pub player: PlayerConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fixed_step_us: DEFAULT_FIXED_STEP_US,
            max_frame_us: None,
            viewport: Viewport::default(),
            gravity: 1800.0,
            friction: 12.0,
            rng_seed: None,
            player: PlayerConfig::default(),
        }
    }
}

pub fn load_config_from_path(path: &Path) -> Result<SimConfig, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let config: SimConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &SimConfig) -> Result<(), String> {
    if config.fixed_step_us == 0 {
        return Err("Config validation failed: fixed_step_us must be > 0".to_string());
    }
    if config.max_frame_us == Some(0) {
        return Err("Config validation failed: max_frame_us must be > 0 when set".to_string());
    }
    if !(config.viewport.width > 0.0 && config.viewport.height > 0.0) {
        return Err("Config validation failed: viewport must be positive".to_string());
    }
    if config.friction < 0.0 {
        return Err("Config validation failed: friction must be >= 0".to_string());
    }
    if config.player.max_health <= 0 {
        return Err("Config validation failed: player.max_health must be > 0".to_string());
    }
    Ok(())
}
