//! Start-of-run configuration for the gauge
//!
//! Nothing here is mutable once the loop runs. [`TallyConfig::validate`] is
//! the only way to obtain a [`ValidConfig`], and the control loop only accepts
//! the validated form, so a zero goal can never reach the gauge math.

use core::num::NonZeroU32;

use embassy_time::Duration;
use embedded_graphics::pixelcolor::Rgb888;

use crate::error::ConfigError;

/// Events per record period the gauge counts as 100%.
pub const DEFAULT_GOAL: u32 = 120;

/// Dimmer applied to every gauge light.
pub const DEFAULT_GAUGE_INTENSITY: f32 = 0.20;

/// Record period in seconds (one hour).
pub const DEFAULT_RECORD_PERIOD_SECS: u64 = 60 * 60;

/// Day length used for the daily reset, in seconds.
pub const DAY_SECS: u64 = 60 * 60 * 24;

/// How stale timestamps leave the rolling window each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvictionPolicy {
    /// At most one expired timestamp is dropped per tick. With a coarse tick
    /// the window may briefly hold more entries than the record period implies.
    #[default]
    OnePerTick,
    /// Every expired timestamp is dropped each tick.
    Sweep,
}

/// Pauses and holds used by the display sequences and the loop cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Sleep at the end of every tick
    pub tick_interval: Duration,
    /// How long the acknowledgment flash stays lit
    pub ack_flash: Duration,
    /// Pause after a recorded event, suppresses counting a held signal twice
    pub debounce: Duration,
    /// Dark pause before the digit sequence starts
    pub digits_blank: Duration,
    /// How long each digit stays lit
    pub digit_hold: Duration,
    /// Length of each on and off phase of the zero placeholder blink
    pub blink_phase: Duration,
    /// Number of on/off cycles in one placeholder blink
    pub blink_count: u8,
    /// Pause between celebration sweep steps
    pub sweep_step: Duration,
    /// Elapsed time after which all counters start over
    pub day_length: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
            ack_flash: Duration::from_millis(100),
            debounce: Duration::from_millis(500),
            digits_blank: Duration::from_secs(1),
            digit_hold: Duration::from_secs(3),
            blink_phase: Duration::from_millis(750),
            blink_count: 3,
            sweep_step: Duration::from_millis(30),
            day_length: Duration::from_secs(DAY_SECS),
        }
    }
}

/// Colors used for each digit of the day total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitPalette {
    pub hundreds: Rgb888,
    pub tens: Rgb888,
    pub ones: Rgb888,
}

impl Default for DigitPalette {
    fn default() -> Self {
        Self {
            hundreds: Rgb888::new(0, 255, 0),
            tens: Rgb888::new(255, 255, 0),
            ones: Rgb888::new(255, 0, 0),
        }
    }
}

/// Raw, unchecked configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TallyConfig {
    /// Goal per record period, not per day
    pub goal: u32,
    /// Effectively a dimmer for the gauge, 0.0..=1.0
    pub gauge_intensity: f32,
    /// Events older than this are discarded from the rolling window
    pub record_period: Duration,
    pub eviction: EvictionPolicy,
    pub timings: Timings,
    pub palette: DigitPalette,
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            goal: DEFAULT_GOAL,
            gauge_intensity: DEFAULT_GAUGE_INTENSITY,
            record_period: Duration::from_secs(DEFAULT_RECORD_PERIOD_SECS),
            eviction: EvictionPolicy::default(),
            timings: Timings::default(),
            palette: DigitPalette::default(),
        }
    }
}

impl TallyConfig {
    /// Check the configuration and freeze it for the control loop.
    pub fn validate(self) -> Result<ValidConfig, ConfigError> {
        let goal = NonZeroU32::new(self.goal).ok_or(ConfigError::ZeroGoal)?;

        if self.record_period == Duration::from_ticks(0) {
            return Err(ConfigError::ZeroRecordPeriod);
        }

        if !self.gauge_intensity.is_finite() || !(0.0..=1.0).contains(&self.gauge_intensity) {
            return Err(ConfigError::IntensityOutOfRange(self.gauge_intensity));
        }

        Ok(ValidConfig {
            goal,
            gauge_intensity: self.gauge_intensity,
            record_period: self.record_period,
            eviction: self.eviction,
            timings: self.timings,
            palette: self.palette,
        })
    }
}

/// Configuration that passed [`TallyConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidConfig {
    goal: NonZeroU32,
    gauge_intensity: f32,
    record_period: Duration,
    eviction: EvictionPolicy,
    timings: Timings,
    palette: DigitPalette,
}

impl ValidConfig {
    pub fn goal(&self) -> NonZeroU32 {
        self.goal
    }

    pub fn gauge_intensity(&self) -> f32 {
        self.gauge_intensity
    }

    pub fn record_period(&self) -> Duration {
        self.record_period
    }

    pub fn eviction(&self) -> EvictionPolicy {
        self.eviction
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    pub fn palette(&self) -> &DigitPalette {
        &self.palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = TallyConfig::default().validate().unwrap();
        assert_eq!(config.goal().get(), 120);
        assert_eq!(config.record_period(), Duration::from_secs(3600));
        assert_eq!(config.eviction(), EvictionPolicy::OnePerTick);
        assert!((config.gauge_intensity() - 0.20).abs() < f32::EPSILON);
    }

    #[test]
    fn test_zero_goal_rejected() {
        let config = TallyConfig {
            goal: 0,
            ..TallyConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroGoal));
    }

    #[test]
    fn test_zero_record_period_rejected() {
        let config = TallyConfig {
            record_period: Duration::from_secs(0),
            ..TallyConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroRecordPeriod));
    }

    #[test]
    fn test_intensity_range() {
        for bad in [-0.1, 1.5, f32::INFINITY] {
            let config = TallyConfig {
                gauge_intensity: bad,
                ..TallyConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::IntensityOutOfRange(_))
            ));
        }

        let nan = TallyConfig {
            gauge_intensity: f32::NAN,
            ..TallyConfig::default()
        };
        assert!(nan.validate().is_err());

        for good in [0.0, 1.0] {
            let config = TallyConfig {
                gauge_intensity: good,
                ..TallyConfig::default()
            };
            assert!(config.validate().is_ok());
        }
    }
}
