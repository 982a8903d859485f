//! The gauge's control loop
//!
//! One tick reads the clock, redraws the gauge, polls the event input,
//! optionally plays the day total, expires old events, checks for the daily
//! reset and finally evaluates the goal celebration before sleeping.
//!
//! Everything the loop mutates lives in [`LoopState`], owned by the loop and
//! touched only from [`ControlLoop::tick`]. Display sequences (acknowledgment
//! flash, digit readout, celebration) block the tick; events that happen
//! while they play are not seen.

use embassy_time::Instant;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::celebration::{GoalCelebration, celebrate};
use crate::config::{EvictionPolicy, ValidConfig};
use crate::digits::show_total;
use crate::gauge;
use crate::io::{Clock, Display, EventSource, pause};
use crate::window::RollingWindow;

/// Color of the short full-ring flash confirming a recorded event.
pub const ACK_COLOR: Rgb888 = Rgb888::new(0, 20, 0);

/// Mutable state of the running gauge.
#[derive(Debug, Clone)]
pub struct LoopState {
    pub window: RollingWindow,
    /// Events since the last daily reset
    pub day_total: u32,
    pub goal: GoalCelebration,
    /// Start of the current day
    pub epoch: Instant,
}

impl LoopState {
    fn new(goal: GoalCelebration, epoch: Instant) -> Self {
        Self {
            window: RollingWindow::new(),
            day_total: 0,
            goal,
            epoch,
        }
    }

    /// Start a fresh day in place.
    fn reset(&mut self, now: Instant) {
        self.window.clear();
        self.day_total = 0;
        self.goal.rearm();
        self.epoch = now;
    }
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub event_recorded: bool,
    pub totals_shown: bool,
    pub daily_reset: bool,
    pub celebrated: bool,
}

/// Drives the gauge from its inputs to its display.
///
/// * `E` is the tracked event input
/// * `T` is the "show totals" input
pub struct ControlLoop<E, T, D, W, C> {
    config: ValidConfig,
    state: LoopState,
    events: E,
    totals: T,
    display: D,
    delay: W,
    clock: C,
}

impl<E, T, D, W, C> ControlLoop<E, T, D, W, C>
where
    E: EventSource,
    T: EventSource,
    D: Display,
    W: DelayNs,
    C: Clock,
{
    pub fn new(
        config: ValidConfig,
        events: E,
        totals: T,
        mut display: D,
        delay: W,
        clock: C,
    ) -> Self {
        display.clear();
        display.set_status_lamp(false);

        let epoch = clock.now();
        info!(
            "Gauge started: goal {} per {}s, intensity {}",
            config.goal(),
            config.record_period().as_secs(),
            config.gauge_intensity()
        );

        Self {
            state: LoopState::new(GoalCelebration::new(config.goal()), epoch),
            config,
            events,
            totals,
            display,
            delay,
            clock,
        }
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    pub fn config(&self) -> &ValidConfig {
        &self.config
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Run one iteration of the loop, including the trailing sleep.
    pub fn tick(&mut self) -> TickReport {
        let timings = *self.config.timings();
        let mut report = TickReport::default();
        let now = self.clock.now();

        let frame = gauge::render(
            self.state.window.size(),
            self.config.goal(),
            self.config.gauge_intensity(),
        );
        self.display.show_frame(&frame);

        if self.events.poll() {
            self.display.fill(ACK_COLOR);
            pause(&mut self.delay, timings.ack_flash);
            self.display.clear();

            self.state.window.record_event(now);
            self.state.day_total = self.state.day_total.saturating_add(1);
            debug!(
                "Event recorded: {} in window, {} today",
                self.state.window.size(),
                self.state.day_total
            );

            pause(&mut self.delay, timings.debounce);
            report.event_recorded = true;
        }

        if self.totals.poll() {
            info!("Showing day total {}", self.state.day_total);
            show_total(
                &mut self.display,
                &mut self.delay,
                self.state.day_total,
                self.config.palette(),
                &timings,
            );
            report.totals_shown = true;
        }

        let retention = self.config.record_period();
        match self.config.eviction() {
            EvictionPolicy::OnePerTick => {
                self.state.window.evict_expired(now, retention);
            }
            EvictionPolicy::Sweep => {
                self.state.window.evict_all_expired(now, retention);
            }
        }

        if now.saturating_duration_since(self.state.epoch) >= timings.day_length {
            info!("Daily reset after {} events", self.state.day_total);
            self.state.reset(now);
            report.daily_reset = true;
        }

        if self.state.goal.evaluate(self.state.window.size()) {
            info!("Goal of {} reached", self.config.goal());
            celebrate(&mut self.display, &mut self.delay, &timings);
            report.celebrated = true;
        }

        pause(&mut self.delay, timings.tick_interval);
        report
    }

    /// Tick forever.
    pub fn run(&mut self) -> ! {
        loop {
            self.tick();
        }
    }
}
