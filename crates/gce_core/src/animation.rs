//! Frame-based animation timing.
//!
//! A clip is a number of frames with a uniform per-frame duration. All timing
//! uses integer microseconds (`u64`) so that advancing under the fixed-step
//! clock never drifts. Which sprites the frames map to is the renderer's
//! business; the simulation only tracks the frame index.

/// Shape of one animation: how many frames, how long each, whether it loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationClip {
    pub frame_count: u32,
    pub frame_us: u64,
    pub looping: bool,
}

impl AnimationClip {
    pub const fn looping(frame_count: u32, frame_us: u64) -> Self {
        Self {
            frame_count,
            frame_us,
            looping: true,
        }
    }

    pub const fn once(frame_count: u32, frame_us: u64) -> Self {
        Self {
            frame_count,
            frame_us,
            looping: false,
        }
    }

    /// Total duration of one full cycle in microseconds.
    pub fn total_duration_us(&self) -> u64 {
        self.frame_us * u64::from(self.frame_count)
    }
}

/// Runtime state for one playing clip.
#[derive(Debug, Clone)]
pub struct AnimationState {
    pub clip: AnimationClip,
    pub frame_index: u32,
    pub elapsed_us: u64,
    pub finished: bool,
}

impl AnimationState {
    pub fn new(clip: AnimationClip) -> Self {
        Self {
            clip,
            frame_index: 0,
            elapsed_us: 0,
            finished: false,
        }
    }

    /// Switch to `clip`, restarting from frame 0. Playing the clip that is
    /// already active keeps its progress.
    pub fn play(&mut self, clip: AnimationClip) {
        if self.clip != clip {
            *self = Self::new(clip);
        }
    }

    /// Advance by `dt_us` microseconds and return the current frame index.
    pub fn tick(&mut self, dt_us: u64) -> u32 {
        if self.clip.frame_count == 0 || self.clip.frame_us == 0 || self.finished {
            return self.frame_index;
        }

        self.elapsed_us += dt_us;

        while self.elapsed_us >= self.clip.frame_us {
            self.elapsed_us -= self.clip.frame_us;
            self.frame_index += 1;

            if self.frame_index >= self.clip.frame_count {
                if self.clip.looping {
                    self.frame_index = 0;
                } else {
                    self.frame_index = self.clip.frame_count - 1;
                    self.elapsed_us = 0;
                    self.finished = true;
                    break;
                }
            }
        }

        self.frame_index
    }
}
