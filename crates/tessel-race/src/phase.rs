//! Race lifecycle phases.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Where a simulator's current race is in its lifecycle.
///
/// `Idle → Running → (Completed | Cancelled | TimedOut | Faulted)`, and
/// back to `Idle` on [`reset`](crate::RaceSimulator::reset).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RacePhase {
    /// No race has been started since construction or the last reset.
    Idle = 0,
    /// Workers are running.
    Running = 1,
    /// Every entrant crossed the finish line.
    Completed = 2,
    /// The race was cancelled before every entrant finished.
    Cancelled = 3,
    /// The race hit its maximum duration.
    TimedOut = 4,
    /// A worker panicked or reported a failure.
    Faulted = 5,
}

impl RacePhase {
    /// `true` for every phase a running race can end in.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Cancelled | Self::TimedOut | Self::Faulted
        )
    }

    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Running,
            2 => Self::Completed,
            3 => Self::Cancelled,
            4 => Self::TimedOut,
            5 => Self::Faulted,
            _ => Self::Idle,
        }
    }
}

impl fmt::Display for RacePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::TimedOut => "timed out",
            Self::Faulted => "faulted",
        };
        f.write_str(s)
    }
}

/// A [`RacePhase`] readable from any thread.
pub(crate) struct AtomicPhase(AtomicU8);

impl AtomicPhase {
    pub(crate) fn new(phase: RacePhase) -> Self {
        Self(AtomicU8::new(phase as u8))
    }

    pub(crate) fn load(&self) -> RacePhase {
        RacePhase::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn store(&self, phase: RacePhase) {
        self.0.store(phase as u8, Ordering::Release);
    }
}
