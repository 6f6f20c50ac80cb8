use gce_core::input::ControlState;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Recorded control snapshots, one per simulation tick once expanded.
#[derive(Debug, Deserialize, Clone)]
pub struct InputScript {
    pub frames: Vec<ScriptFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScriptFrame {
    #[serde(flatten)]
    pub controls: ControlState,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl InputScript {
    pub fn expanded(&self) -> Vec<ControlState> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(frame.controls);
            }
        }
        out
    }
}

pub fn load_input_script_from_path(path: &Path) -> Result<InputScript, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let script: InputScript = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse input script JSON {}: {e}", path.display()))?;
    validate_input_script(&script)?;
    Ok(script)
}

fn validate_input_script(script: &InputScript) -> Result<(), String> {
    if script.frames.is_empty() {
        return Err("Input script validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::tests::{floor_level, seeded_config};
    use crate::world::World;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "gce_script_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn script_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "frames": [
                { "right": true, "repeat": 3 },
                { "jump": true, "shoot": true },
                { "repeat": 0 }
              ]
            }"#,
        )
        .expect("write script file");

        let script = load_input_script_from_path(&path).expect("script should load");
        let expanded = script.expanded();
        assert_eq!(expanded.len(), 5);
        assert!(expanded[0].right && !expanded[0].jump);
        assert!(expanded[3].jump && expanded[3].shoot);
        assert_eq!(expanded[4], ControlState::default());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn empty_script_is_rejected() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write script file");
        let err = load_input_script_from_path(&path).expect_err("empty script must fail");
        assert!(err.contains("frames list is empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_reports_path() {
        let path = temp_file_path("missing");
        let err = load_input_script_from_path(&path).expect_err("missing file must fail");
        assert!(err.starts_with("Failed to read"));
    }

    #[test]
    fn scripted_run_is_deterministic() {
        let script: InputScript = serde_json::from_str(
            r#"{
              "frames": [
                { "right": true, "repeat": 60 },
                { "right": true, "jump": true },
                { "right": true, "shoot": true, "repeat": 120 },
                { "left": true, "repeat": 45 }
              ]
            }"#,
        )
        .expect("parse script");
        let inputs = script.expanded();
        let level = floor_level(
            80,
            12,
            r#"[
              {"type": "player", "x": 64, "y": 304},
              {"type": "enemy", "x": 900, "y": 320, "enemyType": "ghoul"}
            ]"#,
        );

        let mut run_a = World::from_level(&level, seeded_config()).expect("level builds");
        let mut run_b = World::from_level(&level, seeded_config()).expect("level builds");
        for controls in &inputs {
            run_a.set_controls(*controls);
            run_a.update(16_667);
            run_b.set_controls(*controls);
            run_b.update(16_667);
        }

        let a = run_a.player().expect("player a");
        let b = run_b.player().expect("player b");
        assert_eq!(a.body.pos, b.body.pos);
        assert_eq!(a.body.vel, b.body.vel);
        assert_eq!(run_a.entities().len(), run_b.entities().len());
        assert!(a.body.pos.x > 64.0);
    }
}
