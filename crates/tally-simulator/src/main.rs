//! Desktop simulator for the tally event-rate gauge.
//!
//! Runs the real `tally_core` control loop against host stand-ins for the
//! device: a `std` clock and delay, and either
//!
//! * headless (default): synthetic pad pulses and totals requests on a fixed
//!   schedule, with the ring state written to the log (`RUST_LOG=debug`), or
//! * `--features window`: the light ring drawn in an SDL2 window via
//!   `embedded-graphics-simulator`, driven from the keyboard.
//!
//! Configuration comes from built-in defaults, then a `.env` file, then
//! `TALLY_*` environment variables, then command-line flags.

mod host;
#[cfg(not(feature = "window"))]
mod mock;
#[cfg(feature = "window")]
mod sdl;

use std::process::ExitCode;

use clap::Parser;
use embassy_time::{Duration, TICK_HZ};
use log::{error, info};
use tally_core::config::{
    DEFAULT_GAUGE_INTENSITY, DEFAULT_GOAL, DEFAULT_RECORD_PERIOD_SECS, EvictionPolicy,
};
use tally_core::{ControlLoop, TallyConfig, TriggerSource, ValidConfig};

use crate::host::HostClock;

/// Longest record period whose tick count still fits in a `u64`.
const MAX_RECORD_PERIOD_SECS: u64 = u64::MAX / TICK_HZ;

/// Longest synthetic input interval (about 136 years).
pub(crate) const MAX_INTERVAL_SECS: f64 = u32::MAX as f64;

/// Parse an interval flag, rejecting values the tick clock cannot hold.
fn parse_interval_secs(value: &str) -> Result<f64, String> {
    let secs: f64 = value
        .parse()
        .map_err(|e| format!("`{value}` is not a number: {e}"))?;
    if !secs.is_finite() || secs > MAX_INTERVAL_SECS {
        return Err(format!("must be at most {MAX_INTERVAL_SECS} seconds"));
    }
    Ok(secs)
}

/// Event-rate gauge simulator
#[derive(Parser, Debug)]
#[command(name = "tally-simulator")]
#[command(about = "Run the tally gauge control loop on a desktop host")]
#[command(version)]
struct Args {
    /// Events per record period that count as 100%
    #[arg(long, env = "TALLY_GOAL", default_value_t = DEFAULT_GOAL)]
    goal: u32,

    /// Seconds an event stays in the rolling window
    #[arg(
        long,
        env = "TALLY_RECORD_PERIOD_SECS",
        default_value_t = DEFAULT_RECORD_PERIOD_SECS,
        value_parser = clap::value_parser!(u64).range(0..=MAX_RECORD_PERIOD_SECS)
    )]
    record_period_secs: u64,

    /// Gauge brightness, 0.0 to 1.0
    #[arg(long, env = "TALLY_GAUGE_INTENSITY", default_value_t = DEFAULT_GAUGE_INTENSITY)]
    intensity: f32,

    /// Drop every expired event each tick instead of one per tick
    #[arg(long, env = "TALLY_SWEEP")]
    sweep: bool,

    /// Slide switch on: count with button A instead of the external pad
    #[arg(long, env = "TALLY_BUTTON_MODE")]
    button_mode: bool,

    /// Headless only: seconds of simulated time between synthetic events
    #[arg(long, default_value_t = 20.0, value_parser = parse_interval_secs)]
    pulse_every_secs: f64,

    /// Headless only: seconds between synthetic "show totals" presses, 0 = never
    #[arg(long, default_value_t = 0.0, value_parser = parse_interval_secs)]
    totals_every_secs: f64,

    /// Simulated seconds per real second
    #[arg(long, default_value_t = 1.0)]
    speed: f64,
}

impl Args {
    fn tally_config(&self) -> TallyConfig {
        TallyConfig {
            goal: self.goal,
            gauge_intensity: self.intensity,
            record_period: Duration::from_secs(self.record_period_secs),
            eviction: if self.sweep {
                EvictionPolicy::Sweep
            } else {
                EvictionPolicy::OnePerTick
            },
            ..TallyConfig::default()
        }
    }
}

#[cfg(not(feature = "window"))]
fn run(config: ValidConfig, args: &Args, clock: HostClock) -> ExitCode {
    use crate::host::HostDelay;
    use crate::mock::{LogRing, MockPulses, interval};

    let pulses = interval(args.pulse_every_secs);
    let trigger = TriggerSource::select(
        args.button_mode,
        MockPulses::new(clock, pulses),
        MockPulses::new(clock, pulses),
    );
    info!("Counting events from the {}", trigger.label());

    let totals = MockPulses::new(clock, interval(args.totals_every_secs));

    let mut gauge = ControlLoop::new(config, trigger, totals, LogRing::default(), HostDelay, clock);
    gauge.run()
}

#[cfg(feature = "window")]
fn run(config: ValidConfig, args: &Args, clock: HostClock) -> ExitCode {
    use crate::sdl::{Frontend, Key};

    let frontend = Frontend::open();
    let trigger = TriggerSource::select(
        args.button_mode,
        frontend.key(Key::Pad),
        frontend.key(Key::ButtonA),
    );
    info!("Counting events from the {}", trigger.label());

    let mut gauge = ControlLoop::new(
        config,
        trigger,
        frontend.key(Key::ButtonB),
        frontend.ring(),
        frontend.delay(),
        clock,
    );
    gauge.run()
}

fn main() -> ExitCode {
    // A missing .env file is fine; the environment and flags still apply.
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    info!("Starting tally simulator");

    let config = match args.tally_config().validate() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.speed <= 0.0 || !args.speed.is_finite() {
        error!("Invalid --speed {}: must be a positive number", args.speed);
        return ExitCode::FAILURE;
    }

    run(config, &args, HostClock::new(args.speed))
}
