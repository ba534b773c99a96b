//! Shared race state, read by the supervisor and callers while workers
//! write it.
//!
//! Each [`EntrantState`] is written by exactly one worker. Floating-point
//! fields are stored as `f64` bits in `AtomicU64`, so readers see either the
//! old or the new value, never a torn one. The finished counter in
//! [`RaceShared`] is the only field more than one thread modifies.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use tessel_core::{EntrantId, RaceId};

use crate::phase::{AtomicPhase, RacePhase};

/// Sentinel for a time that has not been recorded yet.
pub(crate) const NOT_RECORDED: u64 = u64::MAX;

fn duration_to_nanos(d: Duration) -> u64 {
    // Keep clear of the sentinel.
    u64::try_from(d.as_nanos())
        .unwrap_or(NOT_RECORDED - 1)
        .min(NOT_RECORDED - 1)
}

fn nanos_to_duration(n: u64) -> Option<Duration> {
    (n != NOT_RECORDED).then(|| Duration::from_nanos(n))
}

// ── EntrantState ───────────────────────────────────────────────────

/// One entrant's live state, padded to its own cache line pair so
/// neighbouring workers do not contend.
#[repr(align(128))]
pub(crate) struct EntrantState {
    id: EntrantId,
    name: String,
    speed: f64,
    position: AtomicU64,
    acceleration: AtomicU64,
    finish_ns: AtomicU64,
}

// Compile-time assertion: EntrantState must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<EntrantState>();
};

impl EntrantState {
    pub(crate) fn new(id: EntrantId, name: String, speed: f64) -> Self {
        Self {
            id,
            name,
            speed,
            position: AtomicU64::new(0f64.to_bits()),
            acceleration: AtomicU64::new(0f64.to_bits()),
            finish_ns: AtomicU64::new(NOT_RECORDED),
        }
    }

    pub(crate) fn id(&self) -> EntrantId {
        self.id
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn speed(&self) -> f64 {
        self.speed
    }

    pub(crate) fn position(&self) -> f64 {
        f64::from_bits(self.position.load(Ordering::Acquire))
    }

    pub(crate) fn acceleration(&self) -> f64 {
        f64::from_bits(self.acceleration.load(Ordering::Acquire))
    }

    pub(crate) fn finish_time(&self) -> Option<Duration> {
        nanos_to_duration(self.finish_ns.load(Ordering::Acquire))
    }

    /// Store `stride` as the current acceleration and add it to the
    /// position. Owning worker only. Returns the new position.
    pub(crate) fn advance(&self, stride: f64) -> f64 {
        self.acceleration.store(stride.to_bits(), Ordering::Release);
        let position = self.position() + stride;
        self.position.store(position.to_bits(), Ordering::Release);
        position
    }

    /// Record the finish time if none is recorded yet. Returns `true` only
    /// for the call that recorded it.
    pub(crate) fn record_finish(&self, elapsed: Duration) -> bool {
        self.finish_ns
            .compare_exchange(
                NOT_RECORDED,
                duration_to_nanos(elapsed),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}

// ── RaceShared ─────────────────────────────────────────────────────

/// Everything the workers, the supervisor and the simulator share for one
/// race. Replaced wholesale when the next race starts.
pub(crate) struct RaceShared {
    pub(crate) race: RaceId,
    pub(crate) entrants: Box<[EntrantState]>,
    pub(crate) finish_line: f64,
    /// Clock reading when the race started.
    pub(crate) started_at: Duration,
    finished: AtomicUsize,
    /// Tells workers to stop at the top of their next step.
    stop: AtomicBool,
    /// Set only by a caller's cancel request.
    cancel_requested: AtomicBool,
    phase: AtomicPhase,
    elapsed_ns: AtomicU64,
}

impl RaceShared {
    pub(crate) fn new(
        race: RaceId,
        entrants: Vec<EntrantState>,
        finish_line: f64,
        started_at: Duration,
    ) -> Self {
        Self {
            race,
            entrants: entrants.into_boxed_slice(),
            finish_line,
            started_at,
            finished: AtomicUsize::new(0),
            stop: AtomicBool::new(false),
            cancel_requested: AtomicBool::new(false),
            phase: AtomicPhase::new(RacePhase::Running),
            elapsed_ns: AtomicU64::new(NOT_RECORDED),
        }
    }

    pub(crate) fn finished_count(&self) -> usize {
        self.finished.load(Ordering::Acquire)
    }

    pub(crate) fn mark_finished(&self) {
        self.finished.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn all_finished(&self) -> bool {
        self.finished_count() >= self.entrants.len()
    }

    pub(crate) fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    pub(crate) fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    pub(crate) fn request_cancel(&self) {
        self.cancel_requested.store(true, Ordering::Release);
    }

    pub(crate) fn cancel_requested(&self) -> bool {
        self.cancel_requested.load(Ordering::Acquire)
    }

    pub(crate) fn phase(&self) -> RacePhase {
        self.phase.load()
    }

    /// Freeze the race: record its elapsed time, then publish the terminal
    /// phase.
    pub(crate) fn conclude(&self, phase: RacePhase, elapsed: Duration) {
        self.elapsed_ns
            .store(duration_to_nanos(elapsed), Ordering::Release);
        self.phase.store(phase);
    }

    /// Elapsed race time, once the race has concluded.
    pub(crate) fn final_elapsed(&self) -> Option<Duration> {
        nanos_to_duration(self.elapsed_ns.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entrant() -> EntrantState {
        EntrantState::new(EntrantId(0), "Lucky".into(), 7.5)
    }

    #[test]
    fn fresh_entrant_is_at_the_start() {
        let e = entrant();
        assert_eq!(e.position(), 0.0);
        assert_eq!(e.acceleration(), 0.0);
        assert_eq!(e.finish_time(), None);
        assert_eq!(e.name(), "Lucky");
        assert_eq!(e.speed(), 7.5);
    }

    #[test]
    fn advance_accumulates() {
        let e = entrant();
        assert_eq!(e.advance(2.5), 2.5);
        assert_eq!(e.advance(1.0), 3.5);
        assert_eq!(e.acceleration(), 1.0);
    }

    #[test]
    fn finish_is_recorded_once() {
        let e = entrant();
        assert!(e.record_finish(Duration::from_millis(900)));
        assert!(!e.record_finish(Duration::from_millis(950)));
        assert_eq!(e.finish_time(), Some(Duration::from_millis(900)));
    }

    #[test]
    fn huge_durations_stay_below_sentinel() {
        let e = entrant();
        assert!(e.record_finish(Duration::MAX));
        assert!(e.finish_time().is_some());
    }

    #[test]
    fn conclude_publishes_phase_and_elapsed() {
        let shared = RaceShared::new(RaceId::next(), vec![entrant()], 10.0, Duration::ZERO);
        assert_eq!(shared.phase(), RacePhase::Running);
        assert_eq!(shared.final_elapsed(), None);
        assert!(!shared.all_finished());
        shared.mark_finished();
        assert!(shared.all_finished());
        shared.conclude(RacePhase::Completed, Duration::from_secs(3));
        assert_eq!(shared.phase(), RacePhase::Completed);
        assert_eq!(shared.final_elapsed(), Some(Duration::from_secs(3)));
    }

}
