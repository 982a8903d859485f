//! Recording fakes for the capability traits, shared by the unit tests.

use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use embassy_time::{Duration, Instant};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::RgbColor;
use embedded_hal::delay::DelayNs;

use crate::io::{Clock, Display, EventSource, SEGMENT_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayCall {
    Fill(Rgb888),
    Segment(usize, Rgb888),
    StatusLamp(bool),
}

/// Display that keeps the current light state and every call made to it.
#[derive(Debug)]
pub struct RecordingDisplay {
    pub frame: [Rgb888; SEGMENT_COUNT],
    pub lamp: bool,
    pub calls: Vec<DisplayCall>,
}

impl Default for RecordingDisplay {
    fn default() -> Self {
        Self {
            frame: [Rgb888::BLACK; SEGMENT_COUNT],
            lamp: false,
            calls: Vec::new(),
        }
    }
}

impl RecordingDisplay {
    pub fn lit_count(&self) -> usize {
        self.frame.iter().filter(|c| **c != Rgb888::BLACK).count()
    }

    /// Number of times the status lamp was switched on.
    pub fn lamp_on_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == DisplayCall::StatusLamp(true))
            .count()
    }

    pub fn forget_calls(&mut self) {
        self.calls.clear();
    }
}

impl Display for RecordingDisplay {
    fn fill(&mut self, color: Rgb888) {
        self.frame = [color; SEGMENT_COUNT];
        self.calls.push(DisplayCall::Fill(color));
    }

    fn set_segment(&mut self, index: usize, color: Rgb888) {
        self.frame[index] = color;
        self.calls.push(DisplayCall::Segment(index, color));
    }

    fn set_status_lamp(&mut self, on: bool) {
        self.lamp = on;
        self.calls.push(DisplayCall::StatusLamp(on));
    }
}

/// Delay that returns immediately and adds up what it was asked to wait.
#[derive(Debug, Default)]
pub struct RecordingDelay {
    pub total_ns: u64,
}

impl RecordingDelay {
    pub fn total(&self) -> Duration {
        Duration::from_micros(self.total_ns / 1_000)
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.total_ns += u64::from(us) * 1_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ns += u64::from(ms) * 1_000_000;
    }
}

/// Event source fed from a shared queue; an empty queue polls as `false`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    queue: Rc<RefCell<VecDeque<bool>>>,
}

impl ScriptedSource {
    pub fn new(script: &[bool]) -> Self {
        Self {
            queue: Rc::new(RefCell::new(script.iter().copied().collect())),
        }
    }

    pub fn push(&self, fired: bool) {
        self.queue.borrow_mut().push_back(fired);
    }
}

impl EventSource for ScriptedSource {
    fn poll(&mut self) -> bool {
        self.queue.borrow_mut().pop_front().unwrap_or(false)
    }
}

/// Clock that only moves when told to; clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn at_secs(secs: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::from_secs(secs))),
        }
    }

    pub fn set_secs(&self, secs: u64) {
        self.now.set(Instant::from_secs(secs));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}
