//! Fixed-timestep clock.
//!
//! The host hands over wall-clock deltas once per rendered frame; the clock
//! accumulates them in integer microseconds and hands out fixed simulation
//! steps until less than one step remains. The remainder carries over to the
//! next frame, so no time is lost or counted twice.

use std::time::Duration;

const FPS_SAMPLE_COUNT: usize = 60;

/// Default simulation step: 60 Hz, rounded to whole microseconds.
pub const DEFAULT_FIXED_STEP_US: u64 = 16_667;

pub struct TimeState {
    pub fixed_step_us: u64,
    /// Optional clamp on a single frame's elapsed time. `None` keeps every
    /// microsecond the host reports.
    pub max_frame_us: Option<u64>,
    accumulator_us: u64,
    pub total_time_us: u64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt_us: u64,
    pub interpolation_alpha: f64,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    pub fn new() -> Self {
        Self::with_step(DEFAULT_FIXED_STEP_US)
    }

    pub fn with_step(fixed_step_us: u64) -> Self {
        let step_s = fixed_step_us.max(1) as f64 / 1_000_000.0;
        Self {
            fixed_step_us: fixed_step_us.max(1),
            max_frame_us: None,
            accumulator_us: 0,
            total_time_us: 0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt_us: 0,
            interpolation_alpha: 0.0,
            fps_samples: [step_s; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 1.0 / step_s,
            smoothed_frame_time_ms: step_s * 1000.0,
        }
    }

    /// Feed one host frame's elapsed wall-clock time into the accumulator.
    pub fn begin_frame(&mut self, elapsed: Duration) {
        let mut real_dt_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);

        if let Some(cap) = self.max_frame_us {
            if real_dt_us > cap {
                log::warn!(
                    "Frame took {:.1}ms, capping to {:.1}ms",
                    real_dt_us as f64 / 1000.0,
                    cap as f64 / 1000.0
                );
                real_dt_us = cap;
            }
        }

        self.real_dt_us = real_dt_us;
        self.accumulator_us = self.accumulator_us.saturating_add(real_dt_us);
        self.steps_this_frame = 0;
        self.frame_count += 1;

        let real_dt_s = real_dt_us as f64 / 1_000_000.0;
        self.fps_samples[self.fps_sample_index] = real_dt_s;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    /// Consume one fixed step from the accumulator if enough time is banked.
    pub fn should_step(&mut self) -> bool {
        if self.accumulator_us >= self.fixed_step_us {
            self.accumulator_us -= self.fixed_step_us;
            self.total_time_us += self.fixed_step_us;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    pub fn end_frame(&mut self) {
        self.interpolation_alpha = self.accumulator_us as f64 / self.fixed_step_us as f64;
    }

    pub fn accumulator_us(&self) -> u64 {
        self.accumulator_us
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_frames(time: &mut TimeState, deltas_us: &[u64]) -> u64 {
        let mut steps = 0;
        for &d in deltas_us {
            time.begin_frame(Duration::from_micros(d));
            while time.should_step() {
                steps += 1;
            }
            time.end_frame();
        }
        steps
    }

    #[test]
    fn step_count_matches_floor_of_total_elapsed() {
        let deltas = [3_000, 16_000, 40_123, 1, 16_666, 99_999, 7, 250_000];
        let mut time = TimeState::new();
        let steps = run_frames(&mut time, &deltas);

        let total: u64 = deltas.iter().sum();
        assert_eq!(steps, total / DEFAULT_FIXED_STEP_US);
        assert_eq!(time.fixed_step_count, steps);
        assert_eq!(time.accumulator_us(), total % DEFAULT_FIXED_STEP_US);
    }

    #[test]
    fn remainder_carries_over_between_frames() {
        let mut time = TimeState::with_step(10_000);
        assert_eq!(run_frames(&mut time, &[6_000]), 0);
        assert_eq!(run_frames(&mut time, &[6_000]), 1);
        assert_eq!(time.accumulator_us(), 2_000);
        assert!((time.interpolation_alpha - 0.2).abs() < 1e-9);
    }

    #[test]
    fn long_frame_runs_many_steps_without_cap() {
        let mut time = TimeState::with_step(10_000);
        time.begin_frame(Duration::from_millis(1_000));
        let mut steps = 0;
        while time.should_step() {
            steps += 1;
        }
        assert_eq!(steps, 100);
        assert_eq!(time.steps_this_frame, 100);
        assert_eq!(time.total_time_us, 1_000_000);
    }

    #[test]
    fn frame_cap_clips_elapsed_time() {
        let mut time = TimeState::with_step(10_000);
        time.max_frame_us = Some(50_000);
        time.begin_frame(Duration::from_millis(1_000));
        assert_eq!(time.real_dt_us, 50_000);
        let mut steps = 0;
        while time.should_step() {
            steps += 1;
        }
        assert_eq!(steps, 5);
    }

    #[test]
    fn smoothed_fps_tracks_frame_rate() {
        let mut time = TimeState::new();
        for _ in 0..FPS_SAMPLE_COUNT {
            time.begin_frame(Duration::from_micros(33_333));
        }
        assert!((time.smoothed_fps - 30.0).abs() < 0.1);
        assert_eq!(time.frame_count, FPS_SAMPLE_COUNT as u64);
    }
}
