//! Day total readout as colored light counts
//!
//! The total is split into base-10 digits and each digit is shown as that
//! many lit positions in its own color, one after another. A zero tens or
//! ones digit is signaled by blinking the status lamp, so a zero is never
//! mistaken for "nothing shown yet".
//!
//! Totals of 1000 or more clamp to ten hundreds; the readout tops out there.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::RgbColor;
use embedded_hal::delay::DelayNs;
use log::debug;

use crate::config::{DigitPalette, Timings};
use crate::io::{Display, SEGMENT_COUNT, ScopedDisplay, pause};

/// Hundreds never exceed the number of lights on the ring.
pub const MAX_HUNDREDS: u32 = SEGMENT_COUNT as u32;

/// Digits of a day total, derived on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitPlan {
    pub hundreds: u32,
    pub tens: u32,
    pub ones: u32,
}

impl DigitPlan {
    /// Split `total` into digits, clamping hundreds to [`MAX_HUNDREDS`].
    ///
    /// Lossy above 999: tens and ones are whatever remains after the clamped
    /// hundreds, which may not be single digits.
    pub fn decompose(total: u32) -> Self {
        let hundreds = (total / 100).min(MAX_HUNDREDS);
        let rest = total - hundreds * 100;
        let tens = rest / 10;
        let ones = rest - tens * 10;
        Self {
            hundreds,
            tens,
            ones,
        }
    }
}

/// Play the full digit sequence for `total`. Blocks for its whole duration.
pub fn show_total<D, W>(
    display: &mut D,
    delay: &mut W,
    total: u32,
    palette: &DigitPalette,
    timings: &Timings,
) where
    D: Display,
    W: DelayNs,
{
    let plan = DigitPlan::decompose(total);
    debug!("Showing day total {} as {:?}", total, plan);

    let mut display = ScopedDisplay::acquire(display);

    display.clear();
    pause(delay, timings.digits_blank);

    if plan.hundreds > 0 {
        show_digit(&mut *display, delay, plan.hundreds, palette.hundreds, timings);
    }

    if plan.tens > 0 {
        show_digit(&mut *display, delay, plan.tens, palette.tens, timings);
    } else if plan.hundreds > 0 {
        blink_placeholder(&mut *display, delay, timings);
    }

    if plan.ones > 0 {
        show_digit(&mut *display, delay, plan.ones, palette.ones, timings);
    } else {
        blink_placeholder(&mut *display, delay, timings);
    }
}

/// Light positions `0..digit` in `color`, hold, then go dark.
fn show_digit<D: Display, W: DelayNs>(
    display: &mut D,
    delay: &mut W,
    digit: u32,
    color: Rgb888,
    timings: &Timings,
) {
    let count = (digit as usize).min(SEGMENT_COUNT);
    for index in 0..count {
        display.set_segment(index, color);
    }
    pause(delay, timings.digit_hold);
    display.fill(Rgb888::BLACK);
}

/// Zero placeholder: blink the status lamp.
fn blink_placeholder<D: Display, W: DelayNs>(display: &mut D, delay: &mut W, timings: &Timings) {
    for _ in 0..timings.blink_count {
        display.set_status_lamp(true);
        pause(delay, timings.blink_phase);
        display.set_status_lamp(false);
        pause(delay, timings.blink_phase);
    }
}
