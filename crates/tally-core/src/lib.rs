//! Hardware-independent core library for the tally event-rate gauge
//!
//! This crate contains all platform-agnostic logic of the gauge: the rolling
//! time window of recorded events, the mapping from counts to light patterns
//! (color-graded gauge, base-10 digit display), the one-shot goal celebration
//! and the control loop tying them together.
//!
//! Physical pins, the light-strip driver and timing primitives stay outside.
//! They are reached through the capability traits in [`io`] and
//! `embedded_hal::delay::DelayNs`.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both
//! embedded targets and desktop hosts (for the simulator and tests).

#![no_std]

extern crate alloc;

pub mod celebration;
pub mod config;
pub mod control;
pub mod digits;
pub mod error;
pub mod gauge;
pub mod io;
pub mod window;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{DigitPalette, EvictionPolicy, TallyConfig, Timings, ValidConfig};
pub use control::{ControlLoop, LoopState, TickReport};
pub use error::ConfigError;
pub use io::{Clock, Display, EventSource, PinSource, ScopedDisplay, TriggerSource};
