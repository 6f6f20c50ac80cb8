//! Level descriptor.
//!
//! Levels are JSON documents produced by an external editor. Interpretation is
//! lenient: unknown entity types, malformed entity entries and out-of-range
//! tile codes are skipped with a warning rather than failing the load. Only
//! structural problems (bad dimensions, unparseable JSON) are errors.

use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LevelFile {
    #[serde(default)]
    pub name: String,
    /// Width in cells.
    pub width: u32,
    /// Height in cells.
    pub height: u32,
    #[serde(default = "default_block_size")]
    pub block_size: u32,
    /// Row-major tile codes, `blocks[y][x]`. Kept as raw JSON values so a
    /// single bad cell does not reject the level.
    #[serde(default)]
    pub blocks: Vec<Vec<Value>>,
    #[serde(default)]
    pub entities: Vec<Value>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub completion: CompletionRule,
    #[serde(default)]
    pub final_level: bool,
    #[serde(default)]
    pub spawner: Option<SpawnerConfig>,
}

const fn default_block_size() -> u32 {
    32
}

const fn default_end_margin() -> f32 {
    200.0
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompletionRule {
    /// Satisfied once the player's x reaches `level_width - margin`.
    ReachEnd {
        #[serde(default = "default_end_margin")]
        margin: f32,
    },
    #[serde(rename = "none")]
    Never,
}

impl Default for CompletionRule {
    fn default() -> Self {
        Self::ReachEnd {
            margin: default_end_margin(),
        }
    }
}

impl CompletionRule {
    pub fn is_satisfied(&self, player_x: f32, level_width: f32) -> bool {
        match *self {
            Self::ReachEnd { margin } => player_x >= level_width - margin,
            Self::Never => false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpawnerConfig {
    pub interval_ticks: u32,
    #[serde(default)]
    pub y: f32,
}

/// One placed entity. Kind names follow the level editor's vocabulary.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntitySpawn {
    Player {
        x: f32,
        y: f32,
        #[serde(default)]
        color: Option<String>,
    },
    #[serde(rename = "enemy")]
    Hostile {
        x: f32,
        y: f32,
        #[serde(default, rename = "enemyType")]
        enemy_type: Option<String>,
    },
    Boss {
        x: f32,
        y: f32,
    },
    Turret {
        x: f32,
        y: f32,
    },
    Collectible {
        x: f32,
        y: f32,
        #[serde(default, rename = "collectibleType")]
        collectible_type: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

impl LevelFile {
    pub fn block_size_px(&self) -> f32 {
        self.block_size as f32
    }

    /// Tile code at a cell, or 0 for anything missing or non-integer.
    pub fn tile_code(&self, x: usize, y: usize) -> i64 {
        self.blocks
            .get(y)
            .and_then(|row| row.get(x))
            .and_then(Value::as_i64)
            .unwrap_or(0)
    }

    /// Parses the entity list, dropping entries that are malformed or of an
    /// unknown type.
    pub fn entity_spawns(&self) -> Vec<EntitySpawn> {
        let mut spawns = Vec::with_capacity(self.entities.len());
        for (index, raw) in self.entities.iter().enumerate() {
            match serde_json::from_value::<EntitySpawn>(raw.clone()) {
                Ok(EntitySpawn::Unknown) => {
                    log::warn!(
                        "Level '{}': skipping entity {index} with unknown type {}",
                        self.name,
                        raw.get("type").unwrap_or(&Value::Null)
                    );
                }
                Ok(spawn) => spawns.push(spawn),
                Err(e) => {
                    log::warn!(
                        "Level '{}': skipping malformed entity {index}: {e}",
                        self.name
                    );
                }
            }
        }
        spawns
    }
}

pub fn parse_level(raw: &str) -> Result<LevelFile, String> {
    let level: LevelFile =
        serde_json::from_str(raw).map_err(|e| format!("Failed to parse level JSON: {e}"))?;
    validate_level(&level)?;
    Ok(level)
}

pub fn load_level_from_path(path: &Path) -> Result<LevelFile, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let level: LevelFile = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse level JSON {}: {e}", path.display()))?;
    validate_level(&level)?;
    log::info!(
        "Loaded level '{}' ({}x{} cells) from {}",
        level.name,
        level.width,
        level.height,
        path.display()
    );
    Ok(level)
}

fn validate_level(level: &LevelFile) -> Result<(), String> {
    if level.width == 0 || level.height == 0 {
        return Err("Level validation failed: width and height must be > 0".to_string());
    }
    if level.block_size == 0 {
        return Err("Level validation failed: blockSize must be > 0".to_string());
    }
    if let Some(spawner) = &level.spawner {
        if spawner.interval_ticks == 0 {
            return Err("Level validation failed: spawner.intervalTicks must be > 0".to_string());
        }
    }
    if level.blocks.len() > level.height as usize {
        log::warn!(
            "Level '{}': {} block rows exceed height {}; extra rows ignored",
            level.name,
            level.blocks.len(),
            level.height
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "gce_level_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn minimal_level_uses_defaults() {
        let level = parse_level(r#"{"width": 4, "height": 3}"#).expect("minimal level");
        assert_eq!(level.block_size, 32);
        assert_eq!(level.completion, CompletionRule::ReachEnd { margin: 200.0 });
        assert!(!level.final_level);
        assert!(level.spawner.is_none());
    }

    #[test]
    fn unknown_and_malformed_entities_are_skipped() {
        let level = parse_level(
            r#"{
              "width": 4, "height": 3,
              "entities": [
                {"type": "player", "x": 10, "y": 20, "color": "cyan"},
                {"type": "dragon", "x": 0, "y": 0},
                {"type": "enemy", "y": 5},
                {"type": "enemy", "x": 40, "y": 5, "enemyType": "ghoul"},
                {"type": "collectible", "x": 1, "y": 2, "collectibleType": "coin"}
              ]
            }"#,
        )
        .expect("lenient level");

        let spawns = level.entity_spawns();
        assert_eq!(spawns.len(), 3);
        assert_eq!(
            spawns[0],
            EntitySpawn::Player {
                x: 10.0,
                y: 20.0,
                color: Some("cyan".to_string())
            }
        );
        assert_eq!(
            spawns[1],
            EntitySpawn::Hostile {
                x: 40.0,
                y: 5.0,
                enemy_type: Some("ghoul".to_string())
            }
        );
    }

    #[test]
    fn tile_codes_tolerate_short_rows_and_junk() {
        let level = parse_level(
            r#"{"width": 3, "height": 2, "blocks": [[1, "x", 2], [4]]}"#,
        )
        .expect("level parses");
        assert_eq!(level.tile_code(0, 0), 1);
        assert_eq!(level.tile_code(1, 0), 0);
        assert_eq!(level.tile_code(2, 0), 2);
        assert_eq!(level.tile_code(2, 1), 0);
        assert_eq!(level.tile_code(0, 7), 0);
    }

    #[test]
    fn completion_rules_parse() {
        let level = parse_level(r#"{"width": 1, "height": 1, "completion": {"kind": "none"}}"#)
            .expect("level parses");
        assert_eq!(level.completion, CompletionRule::Never);

        let level = parse_level(
            r#"{"width": 1, "height": 1, "completion": {"kind": "reach_end", "margin": 64}}"#,
        )
        .expect("level parses");
        assert!(level.completion.is_satisfied(960.0, 1024.0));
        assert!(!level.completion.is_satisfied(959.0, 1024.0));
    }

    #[test]
    fn load_level_rejects_zero_size() {
        let path = temp_file_path("zero");
        fs::write(&path, r#"{"width": 0, "height": 4}"#).expect("write temp file");

        let err = load_level_from_path(&path).expect_err("zero width should fail");
        assert!(err.contains("width and height"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_level_reads_spawner() {
        let path = temp_file_path("spawner");
        fs::write(
            &path,
            r#"{"name": "t", "width": 8, "height": 4, "spawner": {"intervalTicks": 40, "y": 64}}"#,
        )
        .expect("write temp file");

        let level = load_level_from_path(&path).expect("valid level should load");
        assert_eq!(
            level.spawner,
            Some(SpawnerConfig {
                interval_ticks: 40,
                y: 64.0
            })
        );
        let _ = fs::remove_file(path);
    }
}
