//! The per-entrant worker loop.

use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Sender;
use log::trace;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use tessel_core::EntrantId;

use crate::clock::Clock;
use crate::state::RaceShared;
use crate::stride::StrideModel;
use crate::supervisor::Wake;

/// Why a worker stopped early without panicking.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WorkerFailure {
    pub(crate) reason: String,
}

/// Everything one worker thread owns.
pub(crate) struct WorkerContext {
    pub(crate) index: usize,
    pub(crate) shared: Arc<RaceShared>,
    pub(crate) stride: Arc<dyn StrideModel>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) pause_range: Range<Duration>,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) wake: Sender<Wake>,
}

/// Tells the supervisor a worker has exited, including by unwinding.
struct ExitSignal {
    entrant: EntrantId,
    wake: Sender<Wake>,
}

impl Drop for ExitSignal {
    fn drop(&mut self) {
        // The supervisor may already be gone during teardown.
        let _ = self.wake.send(Wake::Exited(self.entrant));
    }
}

/// Run one entrant until it finishes, the race stops, or its stride model
/// misbehaves.
pub(crate) fn run(ctx: WorkerContext) -> Result<(), WorkerFailure> {
    let WorkerContext {
        index,
        shared,
        stride,
        clock,
        pause_range,
        mut rng,
        wake,
    } = ctx;
    let entrant = &shared.entrants[index];
    let _exit = ExitSignal {
        entrant: entrant.id(),
        wake,
    };

    loop {
        if shared.should_stop() {
            trace!("entrant {} stopped at {:.1}", entrant.id(), entrant.position());
            return Ok(());
        }

        let step = stride.stride(entrant.id(), entrant.speed(), &mut rng);
        if !step.is_finite() || step < 0.0 {
            return Err(WorkerFailure {
                reason: format!("stride model returned {step}"),
            });
        }

        let position = entrant.advance(step);
        if position >= shared.finish_line {
            let elapsed = clock.now().saturating_sub(shared.started_at);
            if entrant.record_finish(elapsed) {
                shared.mark_finished();
            }
            trace!(
                "entrant {} finished at {:.1} after {:?}",
                entrant.id(),
                position,
                elapsed
            );
            return Ok(());
        }

        clock.pause(sample_pause(&pause_range, &mut rng));
    }
}

fn sample_pause(range: &Range<Duration>, rng: &mut ChaCha8Rng) -> Duration {
    if range.start >= range.end {
        return range.start;
    }
    let lo = u64::try_from(range.start.as_nanos()).unwrap_or(u64::MAX);
    let hi = u64::try_from(range.end.as_nanos()).unwrap_or(u64::MAX);
    if lo >= hi {
        return range.start;
    }
    Duration::from_nanos(rng.gen_range(lo..hi))
}
