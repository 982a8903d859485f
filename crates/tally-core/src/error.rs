//! Error types for the tally core

use thiserror_no_std::Error;

/// Invalid start-of-run configuration.
///
/// Configuration is checked once before the control loop is built; the loop
/// itself has no failure path.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("goal must be at least one event per record period")]
    ZeroGoal,
    #[error("record period must be longer than zero")]
    ZeroRecordPeriod,
    #[error("gauge intensity {0} is outside 0.0..=1.0")]
    IntensityOutOfRange(f32),
}
