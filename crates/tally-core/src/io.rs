//! Capability traits for the hardware the core talks to
//!
//! The core never touches pins or the light strip directly. Every physical
//! concern goes through one of these traits:
//!
//! | Trait           | Contract                                          |
//! |-----------------|---------------------------------------------------|
//! | [`EventSource`] | non-blocking poll, "did the event fire this tick" |
//! | [`Display`]     | ten lights on a ring plus one status lamp         |
//! | [`Clock`]       | monotonic time                                    |
//!
//! Blocking pauses use `embedded_hal::delay::DelayNs`.

use core::ops::{Deref, DerefMut};

use embassy_time::{Duration, Instant};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::RgbColor;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use log::error;

/// Number of lights on the ring.
pub const SEGMENT_COUNT: usize = 10;

/// Something that reports whether the tracked event fired.
pub trait EventSource {
    /// Returns `true` if the event fired since the last poll. Must not block.
    fn poll(&mut self) -> bool;
}

/// The light ring and status lamp.
///
/// Calls are assumed to always succeed; driver faults are the implementor's
/// concern.
pub trait Display {
    /// Set every light to `color`.
    fn fill(&mut self, color: Rgb888);

    /// Set a single light. `index` is the physical position, `0..SEGMENT_COUNT`.
    fn set_segment(&mut self, index: usize, color: Rgb888);

    fn set_status_lamp(&mut self, on: bool);

    /// Turn every light off.
    fn clear(&mut self) {
        self.fill(Rgb888::BLACK);
    }

    /// Write a full frame, one color per physical position.
    fn show_frame(&mut self, frame: &[Rgb888; SEGMENT_COUNT]) {
        for (index, color) in frame.iter().enumerate() {
            self.set_segment(index, *color);
        }
    }
}

impl<D: Display + ?Sized> Display for &mut D {
    fn fill(&mut self, color: Rgb888) {
        (**self).fill(color);
    }

    fn set_segment(&mut self, index: usize, color: Rgb888) {
        (**self).set_segment(index, color);
    }

    fn set_status_lamp(&mut self, on: bool) {
        (**self).set_status_lamp(on);
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn show_frame(&mut self, frame: &[Rgb888; SEGMENT_COUNT]) {
        (**self).show_frame(frame);
    }
}

/// Monotonic time source.
pub trait Clock {
    fn now(&self) -> Instant;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Block for `duration` on an `embedded-hal` delay provider.
///
/// Microsecond resolution; anything past `u32::MAX` µs (about 71 minutes)
/// is capped there.
pub fn pause<W: DelayNs>(delay: &mut W, duration: Duration) {
    let us = u32::try_from(duration.as_micros()).unwrap_or(u32::MAX);
    delay.delay_us(us);
}

/// Exclusive hold on the display for one blocking sequence.
///
/// The digit readout and the celebration sweep each own the display for
/// several seconds. The guard leaves the ring dark and the status lamp off
/// when dropped, whichever way the sequence ends.
pub struct ScopedDisplay<'a, D: Display> {
    display: &'a mut D,
}

impl<'a, D: Display> ScopedDisplay<'a, D> {
    pub fn acquire(display: &'a mut D) -> Self {
        Self { display }
    }
}

impl<D: Display> Deref for ScopedDisplay<'_, D> {
    type Target = D;

    fn deref(&self) -> &D {
        &*self.display
    }
}

impl<D: Display> DerefMut for ScopedDisplay<'_, D> {
    fn deref_mut(&mut self) -> &mut D {
        &mut *self.display
    }
}

impl<D: Display> Drop for ScopedDisplay<'_, D> {
    fn drop(&mut self) {
        self.display.clear();
        self.display.set_status_lamp(false);
    }
}

/// Level-polled digital input.
///
/// The pin is read once per poll; a high level counts as the event firing.
/// Read errors are logged and reported as "not fired".
pub struct PinSource<P> {
    pin: P,
    name: &'static str,
}

impl<P: InputPin> PinSource<P> {
    pub const fn new(pin: P, name: &'static str) -> Self {
        Self { pin, name }
    }

    /// Give the pin back, e.g. to reconfigure it.
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: InputPin> EventSource for PinSource<P> {
    fn poll(&mut self) -> bool {
        self.pin.is_high().unwrap_or_else(|e| {
            error!("{} read failed: {:?}", self.name, e);
            false
        })
    }
}

/// The tracked event's input, picked once at startup by the slide switch.
pub enum TriggerSource<P, B> {
    /// External pad (slide switch off)
    ExternalPad(P),
    /// On-board button, the backup/demo mode (slide switch on)
    OnboardButton(B),
}

impl<P: EventSource, B: EventSource> TriggerSource<P, B> {
    /// Pick the variant from the slide switch position.
    pub fn select(switch_on: bool, pad: P, button: B) -> Self {
        if switch_on {
            Self::OnboardButton(button)
        } else {
            Self::ExternalPad(pad)
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::ExternalPad(_) => "external pad",
            Self::OnboardButton(_) => "on-board button",
        }
    }
}

impl<P: EventSource, B: EventSource> EventSource for TriggerSource<P, B> {
    fn poll(&mut self) -> bool {
        match self {
            Self::ExternalPad(pad) => pad.poll(),
            Self::OnboardButton(button) => button.poll(),
        }
    }
}

impl<E: EventSource + ?Sized> EventSource for &mut E {
    fn poll(&mut self) -> bool {
        (**self).poll()
    }
}
