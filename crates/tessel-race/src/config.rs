//! Race configuration, validation, and error types.

use std::error::Error;
use std::fmt;
use std::ops::Range;
use std::time::Duration;

use tessel_core::RaceError;

// ── RaceConfig ─────────────────────────────────────────────────────

/// Parameters shared by every race a [`RaceSimulator`](crate::RaceSimulator)
/// runs.
#[derive(Clone, Debug)]
pub struct RaceConfig {
    /// Position at which an entrant has finished. Default: 1000.0.
    pub finish_line: f64,
    /// Half-open range each entrant's fixed speed is drawn from.
    /// Default: `5.0..10.0`.
    pub speed_range: Range<f64>,
    /// Half-open range each inter-stride pause is drawn from. An empty
    /// range (`start == end`) pauses for exactly `start`. Must end at or
    /// before `poll_interval`: a stopped worker finishes its current pause
    /// before it can be joined. Default: `10ms..50ms`.
    pub pause_range: Range<Duration>,
    /// Upper bound on how long the supervisor waits between checks, and on
    /// how far past `max_duration` a timed-out race can run while its
    /// workers are joined. Default: 100 ms.
    pub poll_interval: Duration,
    /// Race time after which the supervisor gives up and reports
    /// [`RacePhase::TimedOut`](crate::RacePhase::TimedOut). Default: 120 s.
    pub max_duration: Duration,
    /// Base seed for speeds, strides and pauses. `None` draws a fresh seed
    /// per simulator. Default: `None`.
    pub seed: Option<u64>,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            finish_line: 1000.0,
            speed_range: 5.0..10.0,
            pause_range: Duration::from_millis(10)..Duration::from_millis(50),
            poll_interval: Duration::from_millis(100),
            max_duration: Duration::from_secs(120),
            seed: None,
        }
    }
}

impl RaceConfig {
    /// Upper bound on entrants per race; each one owns an OS thread.
    pub const MAX_ENTRANTS: usize = 1024;

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.finish_line.is_finite() || self.finish_line <= 0.0 {
            return Err(ConfigError::InvalidFinishLine {
                value: self.finish_line,
            });
        }
        let Range { start, end } = self.speed_range;
        if !start.is_finite() || !end.is_finite() || start < 0.0 || start >= end {
            return Err(ConfigError::InvalidSpeedRange { start, end });
        }
        if self.pause_range.start > self.pause_range.end {
            return Err(ConfigError::InvalidPauseRange {
                start: self.pause_range.start,
                end: self.pause_range.end,
            });
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.pause_range.end > self.poll_interval {
            return Err(ConfigError::PauseExceedsPollInterval {
                pause: self.pause_range.end,
                poll_interval: self.poll_interval,
            });
        }
        if self.max_duration.is_zero() {
            return Err(ConfigError::ZeroMaxDuration);
        }
        Ok(())
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`RaceConfig::validate()`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `finish_line` is not a positive finite number.
    InvalidFinishLine {
        /// The configured value.
        value: f64,
    },
    /// `speed_range` is empty, negative or non-finite.
    InvalidSpeedRange {
        /// Range start.
        start: f64,
        /// Range end.
        end: f64,
    },
    /// `pause_range` ends before it starts.
    InvalidPauseRange {
        /// Range start.
        start: Duration,
        /// Range end.
        end: Duration,
    },
    /// `poll_interval` is zero, which would turn the supervisor into a
    /// busy loop.
    ZeroPollInterval,
    /// `pause_range` ends after `poll_interval`, so joining a stopped race
    /// could outlast the poll interval.
    PauseExceedsPollInterval {
        /// End of the pause range.
        pause: Duration,
        /// The configured poll interval.
        poll_interval: Duration,
    },
    /// `max_duration` is zero.
    ZeroMaxDuration,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFinishLine { value } => {
                write!(f, "finish_line must be positive and finite, got {value}")
            }
            Self::InvalidSpeedRange { start, end } => {
                write!(f, "invalid speed range {start}..{end}")
            }
            Self::InvalidPauseRange { start, end } => {
                write!(f, "invalid pause range {start:?}..{end:?}")
            }
            Self::ZeroPollInterval => write!(f, "poll_interval must be non-zero"),
            Self::PauseExceedsPollInterval {
                pause,
                poll_interval,
            } => write!(
                f,
                "pause range ends at {pause:?}, past the poll interval of {poll_interval:?}"
            ),
            Self::ZeroMaxDuration => write!(f, "max_duration must be non-zero"),
        }
    }
}

impl Error for ConfigError {}

impl From<ConfigError> for RaceError {
    fn from(e: ConfigError) -> Self {
        RaceError::InvalidArgument {
            reason: e.to_string(),
        }
    }
}
