//! Integration test: misbehaving workers surface as errors, never hangs.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tessel_core::{EntrantId, RaceError, RaceId};
use tessel_race::{RaceConfig, RacePhase, RaceResult, RaceSimulator, VirtualClock};
use tessel_test_utils::fast_race_config;
use tessel_test_utils::fixtures::{ConstStride, PanickingStride, StalledStride};

fn finish(sim: &mut RaceSimulator, race: RaceId) -> Result<RaceResult, RaceError> {
    sim.wait(race)?;
    sim.result(race)
}

#[test]
fn panicking_stride_is_a_worker_fault() {
    let model = Arc::new(PanickingStride::new(EntrantId(1), 3));
    let mut sim = RaceSimulator::new(fast_race_config())
        .unwrap()
        .with_stride_model(model.clone());
    let race = sim.start_count(3).unwrap();

    let report = sim.wait(race).unwrap().clone();
    assert_eq!(report.phase, RacePhase::Faulted);
    assert_eq!(report.workers_joined, 3);
    assert_eq!(model.victim_calls(), 4);

    match sim.result(race) {
        Err(RaceError::WorkerFault {
            entrant,
            name,
            reason,
        }) => {
            assert_eq!(entrant, EntrantId(1));
            assert_eq!(name, "Spirit");
            assert!(reason.contains("deliberate stride panic"), "{reason}");
        }
        other => panic!("expected WorkerFault, got {other:?}"),
    }
}

#[test]
fn non_finite_stride_is_a_worker_fault() {
    let mut sim = RaceSimulator::new(fast_race_config())
        .unwrap()
        .with_stride_model(Arc::new(ConstStride::new(f64::NAN)));
    let race = sim.start(["Flesh"]).unwrap();
    match finish(&mut sim, race) {
        Err(RaceError::WorkerFault { reason, .. }) => {
            assert!(reason.contains("stride model returned NaN"), "{reason}");
        }
        other => panic!("expected WorkerFault, got {other:?}"),
    }
}

#[test]
fn stalled_worker_times_out_on_virtual_clock() {
    let config = RaceConfig {
        max_duration: Duration::from_secs(2),
        ..fast_race_config()
    };
    let mut sim = RaceSimulator::new(config)
        .unwrap()
        .with_clock(Arc::new(VirtualClock::new()))
        .with_stride_model(Arc::new(StalledStride::new(EntrantId(2))));
    let race = sim.start_count(3).unwrap();

    let report = sim.wait(race).unwrap().clone();
    assert_eq!(report.phase, RacePhase::TimedOut);
    assert!(report.elapsed >= Duration::from_secs(2));
    assert_eq!(
        report.standings.last().map(|s| s.entrant),
        Some(EntrantId(2))
    );
    match sim.result(race) {
        Err(RaceError::TimedOut { elapsed_ms }) => assert!(elapsed_ms >= 2000),
        other => panic!("expected TimedOut, got {other:?}"),
    }
}

#[test]
fn timed_out_race_returns_within_one_poll_of_max_duration() {
    let max = Duration::from_millis(200);
    let poll = Duration::from_millis(50);
    let config = RaceConfig {
        finish_line: 1e12,
        pause_range: Duration::from_millis(40)..poll,
        poll_interval: poll,
        max_duration: max,
        ..fast_race_config()
    };
    let mut sim = RaceSimulator::new(config)
        .unwrap()
        .with_stride_model(Arc::new(StalledStride::new(EntrantId(0))));

    let started = Instant::now();
    let race = sim.start_count(2).unwrap();
    let report = sim.wait(race).unwrap().clone();
    let waited = started.elapsed();

    assert_eq!(report.phase, RacePhase::TimedOut);
    assert_eq!(report.workers_joined, 2);
    // Scheduling slack on top of the configured bound.
    let slack = Duration::from_millis(150);
    assert!(waited < max + poll + slack, "wait took {waited:?}");
    assert!(report.elapsed >= max);
    assert!(
        report.elapsed < max + slack,
        "race time {:?} includes the join",
        report.elapsed
    );
}
