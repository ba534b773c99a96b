//! Strongly-typed identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Stable identity of a site within one partitioner.
///
/// Allocated from the partitioner's own monotonic counter when the site is
/// inserted and never reused, so `SiteId(n)` is the n-th insertion. Unlike a
/// site's position in the scan order, the id survives removal of earlier
/// sites.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SiteId(pub u64);

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SiteId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Counter for unique [`RaceId`] allocation.
static RACE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Handle naming one race started by a simulator.
///
/// Allocated from a process-wide monotonic counter via [`RaceId::next`], so
/// a stale handle from an earlier race can never address a newer one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RaceId(u64);

impl RaceId {
    /// Allocate a fresh, unique race id. Thread-safe.
    pub fn next() -> Self {
        Self(RACE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "race-{}", self.0)
    }
}

/// Index of an entrant within its race.
///
/// `EntrantId(n)` is the n-th name passed to the race at start and the
/// n-th slot of every position vector the race reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntrantId(pub u32);

impl EntrantId {
    /// The id as a slice index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntrantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for EntrantId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
