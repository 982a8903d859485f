//! One-shot celebration when the rolling window reaches the goal

use core::num::NonZeroU32;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::RgbColor;
use embedded_hal::delay::DelayNs;

use crate::config::Timings;
use crate::io::{Display, SEGMENT_COUNT, ScopedDisplay, pause};

/// Full turns of the two-point sweep.
pub const SWEEP_ROTATIONS: usize = 10;

/// Positions the two lights step through per turn; they sit opposite each other.
const SWEEP_HALF: usize = SEGMENT_COUNT / 2;

/// Edge-triggered goal state.
///
/// Fires once when the window size rises to the goal and re-arms only after
/// the size falls back below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalCelebration {
    goal: NonZeroU32,
    achieved: bool,
}

impl GoalCelebration {
    pub const fn new(goal: NonZeroU32) -> Self {
        Self {
            goal,
            achieved: false,
        }
    }

    pub const fn goal(&self) -> NonZeroU32 {
        self.goal
    }

    pub const fn achieved(&self) -> bool {
        self.achieved
    }

    /// Advance the state for this tick. Returns `true` on the rising edge,
    /// when the caller should play the celebration.
    pub fn evaluate(&mut self, current_size: usize) -> bool {
        let reached = current_size >= self.goal.get() as usize;
        match (reached, self.achieved) {
            (true, false) => {
                self.achieved = true;
                true
            }
            (false, _) => {
                self.achieved = false;
                false
            }
            (true, true) => false,
        }
    }

    /// Forget any achievement, e.g. on the daily reset.
    pub fn rearm(&mut self) {
        self.achieved = false;
    }
}

/// Two opposing lights chasing around the ring. Blocks until done.
pub fn celebrate<D: Display, W: DelayNs>(display: &mut D, delay: &mut W, timings: &Timings) {
    let color = Rgb888::WHITE;
    let mut display = ScopedDisplay::acquire(display);

    for _ in 0..SWEEP_ROTATIONS {
        for x in 0..SWEEP_HALF {
            display.clear();
            display.set_segment(x, color);
            display.set_segment(x + SWEEP_HALF, color);
            pause(delay, timings.sweep_step);
        }
    }
}
