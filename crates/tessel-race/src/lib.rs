//! Concurrent race simulation for Tessel.
//!
//! A [`RaceSimulator`] runs every entrant on its own worker thread. Each
//! worker mutates only its own entrant; the workers share exactly one
//! read-modify-write field, the finished counter, and one cooperative stop
//! flag. A supervisor thread waits in bounded intervals until every entrant
//! has finished, the race is cancelled, a worker faults, or the race runs
//! past its maximum duration, then joins the workers and freezes a
//! [`RaceReport`].
//!
//! Pacing goes through a [`Clock`] and movement through a [`StrideModel`],
//! both injectable, so tests can run whole races on a [`VirtualClock`] with
//! scripted strides.
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tessel_race::{RaceConfig, RacePhase, RaceSimulator, VirtualClock};
//!
//! let config = RaceConfig {
//!     finish_line: 50.0,
//!     pause_range: Duration::from_millis(1)..Duration::from_millis(5),
//!     poll_interval: Duration::from_millis(5),
//!     seed: Some(1),
//!     ..Default::default()
//! };
//! let mut sim = RaceSimulator::new(config)
//!     .unwrap()
//!     .with_clock(Arc::new(VirtualClock::new()));
//! let race = sim.start(["Lucky", "Spirit", "Myshko"]).unwrap();
//! let report = sim.wait(race).unwrap();
//! assert_eq!(report.phase, RacePhase::Completed);
//! assert_eq!(report.finished_count, 3);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod clock;
pub mod config;
pub mod phase;
pub mod report;
pub mod simulator;
pub mod stride;

mod state;
mod supervisor;
mod worker;

pub use clock::{Clock, SystemClock, VirtualClock};
pub use config::{ConfigError, RaceConfig};
pub use phase::RacePhase;
pub use report::{RaceReport, RaceResult, RaceSnapshot, Standing};
pub use simulator::{default_names, RaceSimulator, DEFAULT_NAMES};
pub use stride::{RandomStride, StrideModel};
