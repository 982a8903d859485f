//! Synthetic inputs and a logging display for headless runs.

use embassy_time::{Duration, Instant};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::RgbColor;
use log::{debug, trace};
use tally_core::io::SEGMENT_COUNT;
use tally_core::{Clock, Display, EventSource};

use crate::MAX_INTERVAL_SECS;
use crate::host::HostClock;

/// Interval in simulated time, `None` for zero or negative seconds.
///
/// Clamped to [`MAX_INTERVAL_SECS`]; NaN never fires.
pub fn interval(secs: f64) -> Option<Duration> {
    (secs > 0.0).then(|| {
        let micros = secs.min(MAX_INTERVAL_SECS) * 1_000_000.0;
        Duration::from_micros(micros as u64)
    })
}

/// Fires once every `interval` of simulated time; never fires without one.
pub struct MockPulses {
    clock: HostClock,
    schedule: Option<(Duration, Instant)>,
}

impl MockPulses {
    pub fn new(clock: HostClock, interval: Option<Duration>) -> Self {
        let schedule = interval.map(|interval| (interval, clock.now() + interval));
        Self { clock, schedule }
    }
}

impl EventSource for MockPulses {
    fn poll(&mut self) -> bool {
        let Some((interval, next_at)) = self.schedule.as_mut() else {
            return false;
        };

        let now = self.clock.now();
        if now < *next_at {
            return false;
        }
        *next_at = now + *interval;
        true
    }
}

/// Display that keeps the ring state in memory and logs when it changes.
pub struct LogRing {
    frame: [Rgb888; SEGMENT_COUNT],
    lamp: bool,
}

impl Default for LogRing {
    fn default() -> Self {
        Self {
            frame: [Rgb888::BLACK; SEGMENT_COUNT],
            lamp: false,
        }
    }
}

impl LogRing {
    /// One character per position: `#` lit, `.` dark.
    fn pattern(frame: &[Rgb888; SEGMENT_COUNT]) -> String {
        frame
            .iter()
            .map(|c| if *c == Rgb888::BLACK { '.' } else { '#' })
            .collect()
    }
}

impl Display for LogRing {
    fn fill(&mut self, color: Rgb888) {
        trace!("Fill ({}, {}, {})", color.r(), color.g(), color.b());
        self.frame = [color; SEGMENT_COUNT];
    }

    fn set_segment(&mut self, index: usize, color: Rgb888) {
        self.frame[index] = color;
    }

    fn set_status_lamp(&mut self, on: bool) {
        if on != self.lamp {
            trace!("Status lamp {}", if on { "on" } else { "off" });
        }
        self.lamp = on;
    }

    fn show_frame(&mut self, frame: &[Rgb888; SEGMENT_COUNT]) {
        if *frame != self.frame {
            let lit = frame.iter().filter(|c| **c != Rgb888::BLACK).count();
            debug!("Gauge [{}] {}/{}", Self::pattern(frame), lit, SEGMENT_COUNT);
        }
        self.frame = *frame;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval() {
        assert_eq!(interval(0.0), None);
        assert_eq!(interval(-1.0), None);
        assert_eq!(interval(1.5), Some(Duration::from_millis(1500)));
        assert_eq!(interval(f64::NAN), None);
    }

    #[test]
    fn test_huge_interval_is_clamped() {
        let max = Duration::from_secs(MAX_INTERVAL_SECS as u64);
        assert_eq!(interval(1e14), Some(max));
        assert_eq!(interval(f64::INFINITY), Some(max));

        let mut pulses = MockPulses::new(HostClock::new(1.0), interval(1e14));
        assert!(!pulses.poll());
    }

    #[test]
    fn test_pulses_without_interval_never_fire() {
        let mut pulses = MockPulses::new(HostClock::new(1.0), None);
        assert!(!pulses.poll());
    }

    #[test]
    fn test_pulses_fire_on_schedule() {
        // a huge speed puts the first pulse in the past almost immediately
        let clock = HostClock::new(1_000_000.0);
        let mut pulses = MockPulses::new(clock, Some(Duration::from_secs(1)));
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(pulses.poll());
    }

    #[test]
    fn test_log_ring_tracks_frame() {
        let mut ring = LogRing::default();
        ring.set_segment(2, Rgb888::RED);
        assert_eq!(LogRing::pattern(&ring.frame), "..#.......");
        ring.clear();
        assert_eq!(LogRing::pattern(&ring.frame), "..........");
    }
}
