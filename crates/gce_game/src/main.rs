//! Headless runner: loads a level, plays it at a fixed 60 Hz frame rate with
//! scripted (or idle) controls and logs what happened.
//!
//! Each host frame follows the same shape a windowed host would use:
//!
//!   1. feed the frame's elapsed time into the loop's accumulator
//!   2. run whole simulation steps with the current controls
//!   3. forward cue requests and hand one draw snapshot to the renderer

use std::path::PathBuf;
use std::time::Duration;

use gce_core::input::ControlState;
use gce_core::time::DEFAULT_FIXED_STEP_US;
use gce_game::config::{load_config_from_path, SimConfig};
use gce_game::cues::LogCueSink;
use gce_game::game_loop::{GameLoop, LoopControl};
use gce_game::input_script::load_input_script_from_path;
use gce_game::level::{load_level_from_path, parse_level, LevelFile};
use gce_game::render::{Hud, RenderFrame, Renderer};
use gce_game::tick::GameState;
use gce_game::world::World;

const DEMO_LEVEL: &str = include_str!("../../../assets/levels/demo.json");
const DEFAULT_SECONDS: u64 = 30;
const REPORT_EVERY_FRAMES: u64 = 300;

#[derive(Default)]
struct StatsRenderer {
    frames: u64,
    peak_entities: usize,
    peak_on_screen: usize,
    last_hud: Option<Hud>,
    last_boss_phase: Option<u8>,
}

impl Renderer for StatsRenderer {
    fn render(&mut self, frame: &RenderFrame) {
        self.frames += 1;
        self.peak_entities = self.peak_entities.max(frame.entities.len());
        let on_screen = frame.entities.iter().filter(|e| e.on_screen).count();
        self.peak_on_screen = self.peak_on_screen.max(on_screen);
        self.last_hud = frame.hud;

        let phase = frame.entities.iter().find_map(|e| e.boss_phase);
        if phase.is_some() {
            self.last_boss_phase = phase;
        }

        if self.frames % REPORT_EVERY_FRAMES == 0 {
            log::info!(
                "frame {}: state {}, camera ({:.0}, {:.0}), {} entities ({} on screen), {} tiles",
                self.frames,
                frame.game_state,
                frame.camera.position.x,
                frame.camera.position.y,
                frame.entities.len(),
                on_screen,
                frame.tiles.len()
            );
        }
    }
}

struct Args {
    level: Option<PathBuf>,
    script: Option<PathBuf>,
    config: Option<PathBuf>,
    seconds: u64,
}

fn usage() -> String {
    "Usage: cargo run -p gce_game -- [level.json] [--script input.json] [--config sim.json] [--seconds N]\nExample: cargo run -p gce_game -- assets/levels/demo.json --script assets/scripts/demo_run.json --seconds 20".to_string()
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        level: None,
        script: None,
        config: None,
        seconds: DEFAULT_SECONDS,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--script" => args.script = Some(PathBuf::from(iter.next().ok_or_else(usage)?)),
            "--config" => args.config = Some(PathBuf::from(iter.next().ok_or_else(usage)?)),
            "--seconds" => {
                let raw = iter.next().ok_or_else(usage)?;
                args.seconds = raw
                    .parse::<u64>()
                    .map_err(|e| format!("Invalid seconds '{raw}': {e}"))?;
            }
            "-h" | "--help" => return Err(usage()),
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown option '{flag}'\n{}", usage()))
            }
            _ if args.level.is_none() => args.level = Some(PathBuf::from(&arg)),
            _ => return Err(usage()),
        }
    }
    if args.seconds == 0 {
        return Err("seconds must be > 0".to_string());
    }
    Ok(args)
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => load_config_from_path(path)?,
        None => SimConfig::default(),
    };
    let level: LevelFile = match &args.level {
        Some(path) => load_level_from_path(path)?,
        None => {
            log::info!("No level given, playing the built-in demo level");
            parse_level(DEMO_LEVEL)?
        }
    };
    let inputs: Vec<ControlState> = match &args.script {
        Some(path) => {
            let script = load_input_script_from_path(path)?;
            let inputs = script.expanded();
            log::info!("Loaded input script {} ({} frames)", path.display(), inputs.len());
            inputs
        }
        None => Vec::new(),
    };

    let frame_time = Duration::from_micros(DEFAULT_FIXED_STEP_US);
    let max_frames = args.seconds * 1_000_000 / DEFAULT_FIXED_STEP_US;

    let mut game = GameLoop::new(World::from_level(&level, config)?);
    let mut renderer = StatsRenderer::default();
    let mut cues = LogCueSink;

    for frame in 0..max_frames {
        let controls = usize::try_from(frame)
            .ok()
            .and_then(|i| inputs.get(i))
            .copied()
            .unwrap_or_default();
        if game.frame(frame_time, controls, &mut renderer, &mut cues) == LoopControl::Stop {
            break;
        }
        if game.world().game_state() != GameState::Playing {
            break;
        }
    }

    let world = game.world();
    log::info!(
        "Finished '{}' after {} frames ({} ticks, {:.2}s simulated): {}",
        world.level().name,
        renderer.frames,
        world.ticks(),
        world.clock_us() as f64 / 1_000_000.0,
        world.game_state()
    );
    if let Some(hud) = renderer.last_hud {
        log::info!(
            "Player health {}/{}, coins {}",
            hud.health,
            hud.max_health,
            hud.coins
        );
    }
    if let Some(phase) = renderer.last_boss_phase {
        log::info!("Boss last seen in phase {phase}");
    }
    log::info!(
        "Peak entities {} ({} on screen), avg frame {:.2}ms",
        renderer.peak_entities,
        renderer.peak_on_screen,
        game.time.smoothed_frame_time_ms
    );
    Ok(())
}
