//! Read-only views of a race: live snapshots, the frozen report, and the
//! final ranking.

use std::cmp::Ordering;
use std::time::Duration;

use tessel_core::{EntrantId, RaceError, RaceId};

use crate::phase::RacePhase;
use crate::state::RaceShared;

/// A point-in-time copy of a race, safe to read while workers run.
///
/// Positions are read one entrant at a time, so a snapshot taken mid-race
/// is not a single instant across entrants; each value is whole.
#[derive(Clone, Debug, PartialEq)]
pub struct RaceSnapshot {
    /// The race this snapshot describes.
    pub race: RaceId,
    /// Lifecycle phase at the time of the read.
    pub phase: RacePhase,
    /// Entrant names, indexed by [`EntrantId`].
    pub names: Vec<String>,
    /// Positions, indexed by [`EntrantId`].
    pub positions: Vec<f64>,
    /// Most recent stride of each entrant.
    pub accelerations: Vec<f64>,
    /// Finish times of entrants that have crossed the line.
    pub finish_times: Vec<Option<Duration>>,
    /// Number of entrants that have finished.
    pub finished_count: usize,
    /// Race time so far, or the final race time once concluded.
    pub elapsed: Duration,
}

impl RaceSnapshot {
    pub(crate) fn capture(shared: &RaceShared, now: Duration) -> Self {
        // Phase first: a concluded phase guarantees the final elapsed time
        // and every worker's last write are visible.
        let phase = shared.phase();
        let elapsed = shared
            .final_elapsed()
            .unwrap_or_else(|| now.saturating_sub(shared.started_at));
        let n = shared.entrants.len();
        let mut snap = Self {
            race: shared.race,
            phase,
            names: Vec::with_capacity(n),
            positions: Vec::with_capacity(n),
            accelerations: Vec::with_capacity(n),
            finish_times: Vec::with_capacity(n),
            finished_count: shared.finished_count(),
            elapsed,
        };
        for e in shared.entrants.iter() {
            snap.names.push(e.name().to_string());
            snap.positions.push(e.position());
            snap.accelerations.push(e.acceleration());
            snap.finish_times.push(e.finish_time());
        }
        snap
    }
}

/// One entrant's place in the final ranking.
#[derive(Clone, Debug, PartialEq)]
pub struct Standing {
    /// 1-based rank.
    pub rank: usize,
    /// The entrant.
    pub entrant: EntrantId,
    /// The entrant's name.
    pub name: String,
    /// Position when the race froze.
    pub position: f64,
    /// Finish time, if the entrant crossed the line.
    pub finish_time: Option<Duration>,
}

/// Order standings: furthest first, then earliest finish, unfinished last.
/// Equal entries keep their entrant order.
fn compare(a: &Standing, b: &Standing) -> Ordering {
    b.position
        .total_cmp(&a.position)
        .then_with(|| match (a.finish_time, b.finish_time) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

/// Rank a frozen race.
pub(crate) fn rank(shared: &RaceShared) -> Vec<Standing> {
    let mut standings: Vec<Standing> = shared
        .entrants
        .iter()
        .map(|e| Standing {
            rank: 0,
            entrant: e.id(),
            name: e.name().to_string(),
            position: e.position(),
            finish_time: e.finish_time(),
        })
        .collect();
    standings.sort_by(compare);
    for (i, s) in standings.iter_mut().enumerate() {
        s.rank = i + 1;
    }
    standings
}

/// The frozen outcome of one race, produced by its supervisor.
#[derive(Clone, Debug, PartialEq)]
pub struct RaceReport {
    /// The race.
    pub race: RaceId,
    /// Terminal phase.
    pub phase: RacePhase,
    /// Every entrant, best first.
    pub standings: Vec<Standing>,
    /// Entrants that crossed the finish line.
    pub finished_count: usize,
    /// Race time at which the supervisor concluded.
    pub elapsed: Duration,
    /// The error behind a `TimedOut` or `Faulted` phase.
    pub error: Option<RaceError>,
    /// Worker threads joined by the supervisor.
    pub workers_joined: usize,
}

impl RaceReport {
    /// The winning standing, if any entrant took part.
    pub fn winner(&self) -> Option<&Standing> {
        self.standings.first()
    }
}

/// The ranking of a race that ended by completion or cancellation.
#[derive(Clone, Debug, PartialEq)]
pub struct RaceResult {
    /// Every entrant, best first.
    pub standings: Vec<Standing>,
    /// Rank 1, or `None` for a race with no entrants.
    pub winner: Option<Standing>,
}

impl TryFrom<&RaceReport> for RaceResult {
    type Error = RaceError;

    fn try_from(report: &RaceReport) -> Result<Self, RaceError> {
        match report.phase {
            RacePhase::Completed | RacePhase::Cancelled => Ok(Self {
                standings: report.standings.clone(),
                winner: report.winner().cloned(),
            }),
            RacePhase::Idle | RacePhase::Running => Err(RaceError::StillRunning {
                race: report.race,
            }),
            RacePhase::TimedOut | RacePhase::Faulted => {
                Err(report.error.clone().unwrap_or(RaceError::SupervisorLost))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::EntrantState;
    use proptest::prelude::*;

    fn shared_with(entries: &[(f64, Option<u64>)]) -> RaceShared {
        let entrants = entries
            .iter()
            .enumerate()
            .map(|(i, &(pos, finish))| {
                let e = EntrantState::new(EntrantId(i as u32), format!("h{i}"), 5.0);
                e.advance(pos);
                if let Some(ms) = finish {
                    e.record_finish(Duration::from_millis(ms));
                }
                e
            })
            .collect();
        RaceShared::new(RaceId::next(), entrants, 1000.0, Duration::ZERO)
    }

    #[test]
    fn furthest_first_then_fastest() {
        let shared = shared_with(&[
            (1002.0, Some(900)),
            (1005.0, Some(950)),
            (1002.0, Some(800)),
            (400.0, None),
        ]);
        let order: Vec<u32> = rank(&shared).iter().map(|s| s.entrant.0).collect();
        assert_eq!(order, vec![1, 2, 0, 3]);
    }

    #[test]
    fn unfinished_ranks_after_finished_at_equal_position() {
        let shared = shared_with(&[(1000.0, None), (1000.0, Some(500))]);
        let standings = rank(&shared);
        assert_eq!(standings[0].entrant, EntrantId(1));
        assert_eq!(standings[1].rank, 2);
    }

    #[test]
    fn full_ties_keep_entrant_order() {
        let shared = shared_with(&[(10.0, None), (10.0, None), (10.0, None)]);
        let order: Vec<u32> = rank(&shared).iter().map(|s| s.entrant.0).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn snapshot_reads_live_values() {
        let shared = shared_with(&[(12.5, None), (1001.0, Some(70))]);
        shared.mark_finished();
        let snap = RaceSnapshot::capture(&shared, Duration::from_millis(80));
        assert_eq!(snap.phase, RacePhase::Running);
        assert_eq!(snap.positions, vec![12.5, 1001.0]);
        assert_eq!(snap.finish_times[1], Some(Duration::from_millis(70)));
        assert_eq!(snap.finished_count, 1);
        assert_eq!(snap.elapsed, Duration::from_millis(80));
        assert_eq!(snap.names, vec!["h0".to_string(), "h1".to_string()]);
    }

    #[test]
    fn result_conversion_by_phase() {
        let mut report = RaceReport {
            race: RaceId::next(),
            phase: RacePhase::Completed,
            standings: Vec::new(),
            finished_count: 0,
            elapsed: Duration::ZERO,
            error: None,
            workers_joined: 0,
        };
        let result = RaceResult::try_from(&report).unwrap();
        assert_eq!(result.winner, None);

        report.phase = RacePhase::TimedOut;
        report.error = Some(RaceError::TimedOut { elapsed_ms: 5 });
        assert_eq!(
            RaceResult::try_from(&report),
            Err(RaceError::TimedOut { elapsed_ms: 5 })
        );
    }

    proptest! {
        #[test]
        fn ranking_is_sorted(
            entries in proptest::collection::vec(
                (0.0f64..1100.0, proptest::option::of(0u64..10_000)),
                0..12,
            )
        ) {
            let shared = shared_with(&entries);
            let standings = rank(&shared);
            prop_assert_eq!(standings.len(), entries.len());
            for pair in standings.windows(2) {
                prop_assert!(compare(&pair[0], &pair[1]) != Ordering::Greater);
            }
            for (i, s) in standings.iter().enumerate() {
                prop_assert_eq!(s.rank, i + 1);
            }
        }
    }
}
