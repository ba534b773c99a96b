//! User-facing [`RaceSimulator`] API.
//!
//! # Architecture
//!
//! ```text
//! Caller                     Supervisor                 Workers (N)
//!   |                            |                          |
//!   |--start()------------------ spawn -------------------->| stride, advance
//!   |                            | wake_rx.recv_timeout()   | clock.pause()
//!   |--poll()  (reads atomics)   |<--Wake::Exited(id)-------| finish: record once,
//!   |--cancel()--Wake::Cancel--->|                          |   finished += 1
//!   |                            | stop flag, join all ---->|
//!   |                            | rank, conclude(phase)    |
//!   |--wait()/result()---------->| JoinHandle<RaceReport>   |
//! ```

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use tessel_core::{EntrantId, RaceError, RaceId};

use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, RaceConfig};
use crate::phase::RacePhase;
use crate::report::{RaceReport, RaceResult, RaceSnapshot};
use crate::state::{EntrantState, RaceShared};
use crate::stride::{RandomStride, StrideModel};
use crate::supervisor::{Supervisor, Wake, WorkerHandle};
use crate::worker::{self, WorkerContext};

/// Names given to entrants by [`RaceSimulator::start_count`], in order.
/// Entrants past the end are called `Horse N`.
pub const DEFAULT_NAMES: [&str; 4] = ["Lucky", "Spirit", "Myshko", "Flesh"];

/// The first `n` default entrant names.
pub fn default_names(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| match DEFAULT_NAMES.get(i) {
            Some(name) => (*name).to_string(),
            None => format!("Horse {}", i + 1),
        })
        .collect()
}

fn entrant_seed(race_seed: u64, index: usize) -> u64 {
    race_seed ^ (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

// ── ActiveRace ─────────────────────────────────────────────────────

struct ActiveRace {
    shared: Arc<RaceShared>,
    wake: Sender<Wake>,
    supervisor: Option<JoinHandle<RaceReport>>,
    report: Option<RaceReport>,
}

impl ActiveRace {
    fn request_cancel(&self) {
        if self.shared.phase().is_terminal() {
            return;
        }
        self.shared.request_cancel();
        // A closed channel means the supervisor has already concluded.
        let _ = self.wake.send(Wake::Cancel);
    }

    /// Cancel if still running and join the supervisor.
    fn shut_down(mut self) {
        self.request_cancel();
        if let Some(handle) = self.supervisor.take() {
            if handle.join().is_err() {
                warn!("{}: supervisor panicked during shutdown", self.shared.race);
            }
        }
    }
}

// ── RaceSimulator ──────────────────────────────────────────────────

/// Runs one race at a time: one worker thread per entrant plus a
/// supervisor thread that decides when the race is over.
///
/// Callers drive the race through its [`RaceId`]: [`poll`](Self::poll) for
/// live positions, [`cancel`](Self::cancel) to stop early,
/// [`wait`](Self::wait) to block for the frozen report and
/// [`result`](Self::result) for the ranking. A handle from an earlier race
/// is rejected with [`RaceError::UnknownRace`].
///
/// Dropping the simulator cancels any running race and joins its threads.
pub struct RaceSimulator {
    config: RaceConfig,
    clock: Arc<dyn Clock>,
    stride: Arc<dyn StrideModel>,
    base_seed: u64,
    races_started: u64,
    current: Option<ActiveRace>,
}

impl RaceSimulator {
    /// Create a simulator with a validated configuration, the system clock
    /// and the default [`RandomStride`] model.
    pub fn new(config: RaceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let base_seed = config.seed.unwrap_or_else(rand::random);
        Ok(Self {
            config,
            clock: Arc::new(SystemClock::new()),
            stride: Arc::new(RandomStride),
            base_seed,
            races_started: 0,
            current: None,
        })
    }

    /// Use `clock` for pauses and race time in later races.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use `model` for entrant strides in later races.
    pub fn with_stride_model(mut self, model: Arc<dyn StrideModel>) -> Self {
        self.stride = model;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    /// Phase of the current race, or `Idle` if there is none.
    pub fn phase(&self) -> RacePhase {
        self.current
            .as_ref()
            .map_or(RacePhase::Idle, |a| a.shared.phase())
    }

    /// Handle of the current race, if any.
    pub fn current_race(&self) -> Option<RaceId> {
        self.current.as_ref().map(|a| a.shared.race)
    }

    /// Start a race between the named entrants and return its handle.
    ///
    /// A previous race that has ended is discarded. Fails with
    /// `AlreadyRunning` while a race is still running.
    pub fn start<I, S>(&mut self, names: I) -> Result<RaceId, RaceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.phase() == RacePhase::Running {
            return Err(RaceError::AlreadyRunning);
        }
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() > RaceConfig::MAX_ENTRANTS {
            return Err(RaceError::InvalidArgument {
                reason: format!(
                    "{} entrants exceeds maximum of {}",
                    names.len(),
                    RaceConfig::MAX_ENTRANTS
                ),
            });
        }
        if let Some(i) = names.iter().position(|n| n.trim().is_empty()) {
            return Err(RaceError::InvalidArgument {
                reason: format!("entrant {i} has an empty name"),
            });
        }
        if let Some(previous) = self.current.take() {
            previous.shut_down();
        }

        let race_seed = self.base_seed.wrapping_add(self.races_started);
        self.races_started += 1;
        let mut rng = ChaCha8Rng::seed_from_u64(race_seed);
        let entrants: Vec<EntrantState> = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let speed = rng.gen_range(self.config.speed_range.clone());
                EntrantState::new(EntrantId(i as u32), name, speed)
            })
            .collect();
        let n = entrants.len();

        let race = RaceId::next();
        let shared = Arc::new(RaceShared::new(
            race,
            entrants,
            self.config.finish_line,
            self.clock.now(),
        ));
        let (wake_tx, wake_rx) = crossbeam_channel::unbounded();

        let mut workers: Vec<Option<WorkerHandle>> = Vec::with_capacity(n);
        for i in 0..n {
            let ctx = WorkerContext {
                index: i,
                shared: Arc::clone(&shared),
                stride: Arc::clone(&self.stride),
                clock: Arc::clone(&self.clock),
                pause_range: self.config.pause_range.clone(),
                rng: ChaCha8Rng::seed_from_u64(entrant_seed(race_seed, i)),
                wake: wake_tx.clone(),
            };
            let spawned = thread::Builder::new()
                .name(format!("tessel-horse-{i}"))
                .spawn(move || worker::run(ctx));
            match spawned {
                Ok(handle) => workers.push(Some(handle)),
                Err(e) => {
                    abandon(&shared, workers);
                    return Err(RaceError::ThreadSpawnFailed {
                        reason: format!("worker {i}: {e}"),
                    });
                }
            }
        }

        let supervisor = Supervisor {
            shared: Arc::clone(&shared),
            workers,
            wake: wake_rx,
            clock: Arc::clone(&self.clock),
            poll_interval: self.config.poll_interval,
            max_duration: self.config.max_duration,
        };
        let handle = thread::Builder::new()
            .name("tessel-race-supervisor".into())
            .spawn(move || supervisor.run())
            .map_err(|e| {
                // The worker handles went down with the closure; stopped
                // workers exit on their own.
                shared.stop();
                RaceError::ThreadSpawnFailed {
                    reason: format!("supervisor: {e}"),
                }
            })?;

        debug!("{race} started: {n} entrants, seed {race_seed}");
        self.current = Some(ActiveRace {
            shared,
            wake: wake_tx,
            supervisor: Some(handle),
            report: None,
        });
        Ok(race)
    }

    /// Start a race between `n` entrants with the [`default_names`].
    pub fn start_count(&mut self, n: usize) -> Result<RaceId, RaceError> {
        self.start(default_names(n))
    }

    /// Live view of a race. Never blocks.
    pub fn poll(&self, race: RaceId) -> Result<RaceSnapshot, RaceError> {
        let active = self.active(race)?;
        Ok(RaceSnapshot::capture(&active.shared, self.clock.now()))
    }

    /// Ask a race to stop. Workers stop at the top of their next step; the
    /// supervisor is woken at once. A no-op for a race that has ended.
    pub fn cancel(&self, race: RaceId) -> Result<(), RaceError> {
        self.active(race)?.request_cancel();
        Ok(())
    }

    /// Block until the race concludes and return its report.
    pub fn wait(&mut self, race: RaceId) -> Result<&RaceReport, RaceError> {
        let active = self.active_mut(race)?;
        if active.report.is_none() {
            let handle = active.supervisor.take().ok_or(RaceError::SupervisorLost)?;
            let report = handle.join().map_err(|_| RaceError::SupervisorLost)?;
            active.report = Some(report);
        }
        active.report.as_ref().ok_or(RaceError::SupervisorLost)
    }

    /// Final ranking of a race that completed or was cancelled.
    ///
    /// Fails with `StillRunning` before the race concludes, and with the
    /// race's own `TimedOut` or `WorkerFault` error if it ended that way.
    pub fn result(&mut self, race: RaceId) -> Result<RaceResult, RaceError> {
        if !self.active(race)?.shared.phase().is_terminal() {
            return Err(RaceError::StillRunning { race });
        }
        RaceResult::try_from(self.wait(race)?)
    }

    /// Cancel any running race, join its threads and return to `Idle`.
    pub fn reset(&mut self) {
        if let Some(active) = self.current.take() {
            active.shut_down();
        }
    }

    fn active(&self, race: RaceId) -> Result<&ActiveRace, RaceError> {
        match &self.current {
            Some(active) if active.shared.race == race => Ok(active),
            _ => Err(RaceError::UnknownRace { race }),
        }
    }

    fn active_mut(&mut self, race: RaceId) -> Result<&mut ActiveRace, RaceError> {
        match &mut self.current {
            Some(active) if active.shared.race == race => Ok(active),
            _ => Err(RaceError::UnknownRace { race }),
        }
    }
}

impl Drop for RaceSimulator {
    fn drop(&mut self) {
        self.reset();
    }
}

/// Stop and join workers spawned before a failed spawn.
fn abandon(shared: &RaceShared, workers: Vec<Option<WorkerHandle>>) {
    shared.stop();
    for handle in workers.into_iter().flatten() {
        // Only the spawn failure is reported.
        let _ = handle.join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::VirtualClock;
    use std::time::Duration;

    fn fast_config() -> RaceConfig {
        RaceConfig {
            finish_line: 100.0,
            pause_range: Duration::from_millis(1)..Duration::from_millis(5),
            poll_interval: Duration::from_millis(5),
            seed: Some(11),
            ..Default::default()
        }
    }

    fn virtual_sim() -> RaceSimulator {
        RaceSimulator::new(fast_config())
            .unwrap()
            .with_clock(Arc::new(VirtualClock::new()))
    }

    #[test]
    fn default_names_extend_past_the_stable() {
        assert_eq!(
            default_names(6),
            vec!["Lucky", "Spirit", "Myshko", "Flesh", "Horse 5", "Horse 6"]
        );
    }

    #[test]
    fn entrant_seeds_differ() {
        assert_ne!(entrant_seed(1, 0), entrant_seed(1, 1));
        assert_ne!(entrant_seed(1, 0), entrant_seed(2, 0));
    }

    #[test]
    fn idle_until_started() {
        let sim = virtual_sim();
        assert_eq!(sim.phase(), RacePhase::Idle);
        assert_eq!(sim.current_race(), None);
    }

    #[test]
    fn race_completes_with_virtual_clock() {
        let mut sim = virtual_sim();
        let race = sim.start_count(4).unwrap();
        let report = sim.wait(race).unwrap().clone();
        assert_eq!(report.phase, RacePhase::Completed);
        assert_eq!(report.finished_count, 4);
        assert_eq!(report.workers_joined, 4);
        let result = sim.result(race).unwrap();
        assert_eq!(result.winner, report.standings.first().cloned());
    }

    #[test]
    fn stale_handle_is_unknown() {
        let mut sim = virtual_sim();
        let first = sim.start_count(2).unwrap();
        sim.wait(first).unwrap();
        let second = sim.start_count(2).unwrap();
        assert_ne!(first, second);
        assert_eq!(
            sim.poll(first).unwrap_err(),
            RaceError::UnknownRace { race: first }
        );
        sim.wait(second).unwrap();
    }

    #[test]
    fn empty_name_rejected() {
        let mut sim = virtual_sim();
        assert!(matches!(
            sim.start(["Lucky", "  "]),
            Err(RaceError::InvalidArgument { .. })
        ));
        assert_eq!(sim.phase(), RacePhase::Idle);
    }

    #[test]
    fn invalid_config_rejected() {
        let cfg = RaceConfig {
            poll_interval: Duration::ZERO,
            ..Default::default()
        };
        assert!(matches!(
            RaceSimulator::new(cfg),
            Err(ConfigError::ZeroPollInterval)
        ));
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut sim = virtual_sim();
        let race = sim.start_count(3).unwrap();
        sim.reset();
        assert_eq!(sim.phase(), RacePhase::Idle);
        assert!(sim.poll(race).is_err());
    }
}
