//! Color-graded progress gauge
//!
//! The ring shows how far the rolling window is toward the goal in tenths.
//! Lights fill in reverse physical order (position 9 first), so on the device
//! the gauge appears to fill clockwise from the lower left.
//!
//! | Step  | Color           |
//! |-------|-----------------|
//! | 0, 1  | red             |
//! | 2     | (255, 100, 0)   |
//! | 3     | (255, 180, 0)   |
//! | 4, 5  | yellow          |
//! | 6     | (175, 255, 0)   |
//! | 7     | (100, 255, 0)   |
//! | 8+    | green           |

use core::num::NonZeroU32;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::RgbColor;

use crate::io::SEGMENT_COUNT;

/// Gradient color for fill step `step`, red through green.
pub const fn color_for_segment(step: usize) -> Rgb888 {
    match step {
        0 | 1 => Rgb888::new(255, 0, 0),
        2 => Rgb888::new(255, 100, 0),
        3 => Rgb888::new(255, 180, 0),
        4 | 5 => Rgb888::new(255, 255, 0),
        6 => Rgb888::new(175, 255, 0),
        7 => Rgb888::new(100, 255, 0),
        _ => Rgb888::new(0, 255, 0),
    }
}

/// Scale each channel by `intensity`, rounding to the nearest integer.
pub fn dim(color: Rgb888, intensity: f32) -> Rgb888 {
    let scale = |channel: u8| -> u8 {
        // `as` saturates, which also clamps to 0..=255
        (f32::from(channel) * intensity + 0.5) as u8
    };
    Rgb888::new(scale(color.r()), scale(color.g()), scale(color.b()))
}

/// Completed tenths of the goal. Not capped at ten.
pub fn filled_steps(window_size: usize, goal: NonZeroU32) -> usize {
    let goal = goal.get() as usize;
    window_size.saturating_mul(SEGMENT_COUNT) / goal
}

/// Build the gauge frame, indexed by physical position.
///
/// Fill step `i` lands on position `SEGMENT_COUNT - 1 - i`. Overshooting the
/// goal lights every position and carries no further meaning.
pub fn render(window_size: usize, goal: NonZeroU32, intensity: f32) -> [Rgb888; SEGMENT_COUNT] {
    let filled = filled_steps(window_size, goal);
    let mut frame = [Rgb888::BLACK; SEGMENT_COUNT];

    for step in 0..SEGMENT_COUNT {
        if step < filled && filled > 0 {
            frame[SEGMENT_COUNT - 1 - step] = dim(color_for_segment(step), intensity);
        }
    }

    frame
}
