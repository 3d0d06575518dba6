//! Fixed-timestep accumulator
//!
//! Engines deliver uneven frame deltas. The clock banks them and hands out
//! whole `SIM_DT` steps, capped per frame so a long stall can't snowball.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone)]
pub struct FrameClock {
    step: f32,
    accumulator: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(SIM_DT)
    }
}

impl FrameClock {
    pub fn new(step: f32) -> Self {
        Self {
            step,
            accumulator: 0.0,
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Bank a frame delta and return how many fixed steps to run now
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let frame_dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += frame_dt;

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < MAX_SUBSTEPS {
            self.accumulator -= self.step;
            substeps += 1;
        }
        substeps
    }

    /// Fraction of a step left over (for render interpolation)
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }
}
