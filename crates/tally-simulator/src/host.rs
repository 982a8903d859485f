//! Host implementations of the clock and delay capabilities.

use std::time::Instant as StdInstant;

use embassy_time::Instant;
#[cfg(not(feature = "window"))]
use embedded_hal::delay::DelayNs;
use tally_core::Clock;

/// Monotonic clock backed by `std::time::Instant`.
///
/// `speed` stretches simulated time so that long record periods and the daily
/// reset can be watched without waiting hours. Copies share the same start.
#[derive(Debug, Clone, Copy)]
pub struct HostClock {
    start: StdInstant,
    speed: f64,
}

impl HostClock {
    pub fn new(speed: f64) -> Self {
        Self {
            start: StdInstant::now(),
            speed,
        }
    }
}

impl Clock for HostClock {
    fn now(&self) -> Instant {
        let simulated = self.start.elapsed().as_secs_f64() * self.speed;
        Instant::from_micros((simulated * 1_000_000.0) as u64)
    }
}

/// Blocking delay on the calling thread.
#[cfg(not(feature = "window"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct HostDelay;

#[cfg(not(feature = "window"))]
impl DelayNs for HostDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(std::time::Duration::from_micros(u64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}
