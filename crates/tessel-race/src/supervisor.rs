//! The supervisor thread: waits for a race to end, then freezes it.
//!
//! The supervisor blocks on a wake channel with a timeout of one poll
//! interval. Workers send [`Wake::Exited`] when their thread ends (normally
//! or by unwinding) and the simulator sends [`Wake::Cancel`] on a cancel
//! request, so most transitions are seen immediately. The timeout bounds
//! the wait when nothing happens, e.g. a stalled worker approaching
//! `max_duration`.
//!
//! Once a terminal condition holds the supervisor records the race time,
//! raises the stop flag, joins every remaining worker, ranks the entrants and publishes the
//! terminal phase.

use std::any::Any;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::{debug, info, warn};

use tessel_core::{EntrantId, RaceError};

use crate::clock::Clock;
use crate::phase::RacePhase;
use crate::report::{rank, RaceReport};
use crate::state::RaceShared;
use crate::worker::WorkerFailure;

/// Messages that wake the supervisor early.
#[derive(Debug)]
pub(crate) enum Wake {
    /// A worker thread has ended.
    Exited(EntrantId),
    /// A caller asked to cancel the race.
    Cancel,
}

pub(crate) type WorkerHandle = JoinHandle<Result<(), WorkerFailure>>;

/// State owned by the supervisor thread.
pub(crate) struct Supervisor {
    pub(crate) shared: Arc<RaceShared>,
    pub(crate) workers: Vec<Option<WorkerHandle>>,
    pub(crate) wake: Receiver<Wake>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) poll_interval: Duration,
    pub(crate) max_duration: Duration,
}

impl Supervisor {
    /// Wait for the race to end and return its frozen report.
    pub(crate) fn run(mut self) -> RaceReport {
        let race = self.shared.race;
        let mut fault: Option<RaceError> = None;

        let phase = loop {
            if let Some(e) = &fault {
                warn!("{race}: {e}");
                break RacePhase::Faulted;
            }
            if self.shared.all_finished() {
                break RacePhase::Completed;
            }
            if self.shared.cancel_requested() {
                break RacePhase::Cancelled;
            }
            if self.elapsed() >= self.max_duration {
                break RacePhase::TimedOut;
            }

            // Never sleep past the deadline.
            let remaining = self.max_duration.saturating_sub(self.elapsed());
            match self.wake.recv_timeout(self.poll_interval.min(remaining)) {
                Ok(Wake::Exited(entrant)) => fault = self.reap(entrant),
                Ok(Wake::Cancel) | Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    // Every sender is gone, so no further wake can arrive.
                    if !self.shared.all_finished() && !self.shared.cancel_requested() {
                        fault = Some(RaceError::SupervisorLost);
                    }
                }
            }
        };

        // Race time is fixed when the terminal condition is seen, not after
        // the join below.
        let elapsed = self.elapsed();
        self.shared.stop();
        for i in 0..self.workers.len() {
            if let Some(e) = self.reap(EntrantId(i as u32)) {
                warn!("{race}: {e} after the race concluded");
            }
        }
        let workers_joined = self.workers.len();

        let error = match phase {
            RacePhase::TimedOut => {
                let e = RaceError::TimedOut {
                    elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                };
                warn!("{race}: {e}");
                Some(e)
            }
            RacePhase::Faulted => fault,
            _ => None,
        };
        let standings = rank(&self.shared);
        let finished_count = self.shared.finished_count();
        self.shared.conclude(phase, elapsed);

        match (phase, standings.first()) {
            (RacePhase::Completed, Some(w)) => info!(
                "{race} completed in {elapsed:?}: winner {} ('{}')",
                w.entrant, w.name
            ),
            _ => debug!("{race} {phase} after {elapsed:?}, {finished_count} finished"),
        }

        RaceReport {
            race,
            phase,
            standings,
            finished_count,
            elapsed,
            error,
            workers_joined,
        }
    }

    fn elapsed(&self) -> Duration {
        self.clock.now().saturating_sub(self.shared.started_at)
    }

    /// Join a worker that has exited. Returns the fault it represents, if
    /// any.
    fn reap(&mut self, entrant: EntrantId) -> Option<RaceError> {
        let handle = self.workers.get_mut(entrant.index())?.take()?;
        let name = self.shared.entrants[entrant.index()].name().to_string();
        let reason = match handle.join() {
            Ok(Ok(())) => return None,
            Ok(Err(failure)) => failure.reason,
            Err(payload) => panic_message(payload.as_ref()),
        };
        Some(RaceError::WorkerFault {
            entrant,
            name,
            reason,
        })
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}
