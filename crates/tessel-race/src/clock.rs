//! Time sources for race pacing.
//!
//! Workers never call `thread::sleep` directly; every pause and every
//! elapsed-time reading goes through a [`Clock`]. [`SystemClock`] is real
//! time. [`VirtualClock`] makes each pause advance a shared counter and
//! return at once, so races that would take seconds finish in microseconds
//! with the same ordering logic.

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// A monotonic time source with a blocking pause.
pub trait Clock: Send + Sync {
    /// Time since the clock's origin.
    fn now(&self) -> Duration;

    /// Block the calling worker for `d` of this clock's time.
    fn pause(&self, d: Duration);
}

/// Wall-clock time; `pause` sleeps the OS thread.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// A clock whose origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn pause(&self, d: Duration) {
        if d.is_zero() {
            thread::yield_now();
        } else {
            thread::sleep(d);
        }
    }
}

/// Simulated time shared by every worker of a race.
///
/// `pause(d)` adds `d` to the shared time and yields. Concurrent pauses
/// accumulate, so virtual time runs ahead of any single worker's view;
/// only relative ordering and the timeout bound matter to the race.
#[derive(Debug, Default)]
pub struct VirtualClock {
    nanos: AtomicU64,
}

impl VirtualClock {
    /// A clock starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `d` without pausing.
    pub fn advance(&self, d: Duration) {
        let add = u64::try_from(d.as_nanos()).unwrap_or(u64::MAX);
        // fetch_update so the counter saturates instead of wrapping.
        let _ = self
            .nanos
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                Some(n.saturating_add(add))
            });
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::Acquire))
    }

    fn pause(&self, d: Duration) {
        self.advance(d);
        thread::yield_now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock::new();
        let a = clock.now();
        clock.pause(Duration::from_millis(2));
        assert!(clock.now() >= a + Duration::from_millis(2));
    }

    #[test]
    fn virtual_clock_advances_only_on_pause() {
        let clock = VirtualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
        clock.pause(Duration::from_millis(30));
        clock.pause(Duration::from_millis(12));
        assert_eq!(clock.now(), Duration::from_millis(42));
    }

    #[test]
    fn virtual_clock_saturates() {
        let clock = VirtualClock::new();
        clock.advance(Duration::MAX);
        clock.advance(Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::from_nanos(u64::MAX));
    }
}
