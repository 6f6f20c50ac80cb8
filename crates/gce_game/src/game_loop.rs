//! Host-facing frame driver: banks wall-clock time, runs whole simulation
//! steps, then hands one draw snapshot to the renderer.

use crate::cues::CueSink;
use crate::render::{RenderFrame, Renderer};
use crate::tick::GameState;
use crate::world::World;
use gce_core::input::ControlState;
use gce_core::time::TimeState;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    /// Back at the menu; the host should not schedule another frame.
    Stop,
}

pub struct GameLoop {
    pub time: TimeState,
    world: World,
}

impl GameLoop {
    pub fn new(world: World) -> Self {
        let mut time = TimeState::with_step(world.config().fixed_step_us);
        time.max_frame_us = world.config().max_frame_us;
        Self { time, world }
    }

    pub fn frame(
        &mut self,
        elapsed: Duration,
        controls: ControlState,
        renderer: &mut dyn Renderer,
        cues: &mut dyn CueSink,
    ) -> LoopControl {
        self.time.begin_frame(elapsed);
        self.world.set_controls(controls);
        while self.time.should_step() {
            self.world.update(self.time.fixed_step_us);
        }
        self.time.end_frame();

        for request in self.world.drain_cues() {
            cues.play(request);
        }
        renderer.render(&RenderFrame::capture(&self.world));

        if self.world.game_state() == GameState::Menu {
            LoopControl::Stop
        } else {
            LoopControl::Continue
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Swap in a freshly loaded level. Banked time is kept.
    pub fn replace_world(&mut self, world: World) -> World {
        std::mem::replace(&mut self.world, world)
    }
}
