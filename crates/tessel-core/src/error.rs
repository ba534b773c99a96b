//! Error types for the Tessel workspace.
//!
//! Organized by component: [`RasterError`] for the nearest-site
//! partitioner and [`RaceError`] for the race simulator. Empty input is
//! deliberately absent from both: an empty site set or a zero-sized canvas
//! has defined fallback output rather than an error.

use std::error::Error;
use std::fmt;

use crate::id::{EntrantId, RaceId};

/// Errors from the nearest-site partitioner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RasterError {
    /// An argument failed validation at the call boundary: negative canvas
    /// dimensions, an unknown metric value, a zero random-site count.
    InvalidArgument {
        /// Human-readable description of the rejected argument.
        reason: String,
    },
    /// A computation is already in flight on this partitioner.
    AlreadyRunning,
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { reason } => write!(f, "invalid argument: {reason}"),
            Self::AlreadyRunning => write!(f, "a computation is already in flight"),
        }
    }
}

impl Error for RasterError {}

/// Errors from the race simulator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RaceError {
    /// An argument failed validation at the call boundary.
    InvalidArgument {
        /// Human-readable description of the rejected argument.
        reason: String,
    },
    /// A race is already running on this simulator.
    AlreadyRunning,
    /// The handle does not name the simulator's current race.
    UnknownRace {
        /// The handle that was passed in.
        race: RaceId,
    },
    /// Results were requested before the race reached a terminal phase.
    StillRunning {
        /// The race that is still running.
        race: RaceId,
    },
    /// A worker thread panicked or reported a failure.
    WorkerFault {
        /// The entrant whose worker failed.
        entrant: EntrantId,
        /// The entrant's name.
        name: String,
        /// Panic message or failure description.
        reason: String,
    },
    /// The race hit its maximum duration before every entrant finished.
    TimedOut {
        /// Race time elapsed when the supervisor gave up, in milliseconds.
        elapsed_ms: u64,
    },
    /// The supervisor thread terminated without producing a report.
    SupervisorLost,
    /// A worker or supervisor thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of which thread failed.
        reason: String,
    },
}

impl fmt::Display for RaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { reason } => write!(f, "invalid argument: {reason}"),
            Self::AlreadyRunning => write!(f, "race already running"),
            Self::UnknownRace { race } => write!(f, "unknown race {race}"),
            Self::StillRunning { race } => write!(f, "{race} is still running"),
            Self::WorkerFault {
                entrant,
                name,
                reason,
            } => write!(f, "worker for entrant {entrant} ('{name}') failed: {reason}"),
            Self::TimedOut { elapsed_ms } => {
                write!(f, "race timed out after {elapsed_ms}ms")
            }
            Self::SupervisorLost => write!(f, "race supervisor terminated without a report"),
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
        }
    }
}

impl Error for RaceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raster_error_messages() {
        let e = RasterError::InvalidArgument {
            reason: "width must be non-negative, got -1".into(),
        };
        assert_eq!(
            e.to_string(),
            "invalid argument: width must be non-negative, got -1"
        );
        assert_eq!(
            RasterError::AlreadyRunning.to_string(),
            "a computation is already in flight"
        );
    }

    #[test]
    fn worker_fault_names_entrant() {
        let e = RaceError::WorkerFault {
            entrant: EntrantId(2),
            name: "Myshko".into(),
            reason: "boom".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("entrant 2"));
        assert!(msg.contains("Myshko"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn timed_out_reports_elapsed() {
        let e = RaceError::TimedOut { elapsed_ms: 1500 };
        assert_eq!(e.to_string(), "race timed out after 1500ms");
    }
}
