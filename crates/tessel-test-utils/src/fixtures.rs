//! Reusable stride-model fixtures.
//!
//! Four models for driving races deterministically:
//!
//! - [`ConstStride`]: every entrant moves the same fixed distance.
//! - [`ScriptedStride`]: each entrant moves its own fixed distance, which
//!   fixes the finishing order.
//! - [`PanickingStride`]: one entrant's worker panics after N steps.
//! - [`StalledStride`]: one entrant never moves, the rest use
//!   [`RandomStride`].

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::RngCore;
use tessel_core::EntrantId;
use tessel_race::{RandomStride, StrideModel};

/// Moves every entrant `step` per stride.
pub struct ConstStride {
    pub step: f64,
}

impl ConstStride {
    pub fn new(step: f64) -> Self {
        Self { step }
    }
}

impl StrideModel for ConstStride {
    fn stride(&self, _entrant: EntrantId, _speed: f64, _rng: &mut dyn RngCore) -> f64 {
        self.step
    }
}

/// Moves entrant `i` by `steps[i]` per stride; entrants past the end of
/// the script use `fallback`.
pub struct ScriptedStride {
    pub steps: Vec<f64>,
    pub fallback: f64,
}

impl ScriptedStride {
    pub fn new(steps: Vec<f64>) -> Self {
        Self {
            steps,
            fallback: 1.0,
        }
    }
}

impl StrideModel for ScriptedStride {
    fn stride(&self, entrant: EntrantId, _speed: f64, _rng: &mut dyn RngCore) -> f64 {
        self.steps
            .get(entrant.index())
            .copied()
            .unwrap_or(self.fallback)
    }
}

/// Panics on the `victim`'s stride after it has taken `after` normal
/// strides. Other entrants move `step` per stride.
pub struct PanickingStride {
    pub victim: EntrantId,
    pub after: usize,
    pub step: f64,
    victim_calls: AtomicUsize,
}

impl PanickingStride {
    pub fn new(victim: EntrantId, after: usize) -> Self {
        Self {
            victim,
            after,
            step: 1.0,
            victim_calls: AtomicUsize::new(0),
        }
    }

    /// Strides requested for the victim so far, including the fatal one.
    pub fn victim_calls(&self) -> usize {
        self.victim_calls.load(Ordering::Relaxed)
    }
}

impl StrideModel for PanickingStride {
    fn stride(&self, entrant: EntrantId, _speed: f64, _rng: &mut dyn RngCore) -> f64 {
        if entrant == self.victim {
            let n = self.victim_calls.fetch_add(1, Ordering::Relaxed);
            if n >= self.after {
                panic!("deliberate stride panic for entrant {entrant}");
            }
        }
        self.step
    }
}

/// The `victim` never advances; everyone else uses [`RandomStride`].
pub struct StalledStride {
    pub victim: EntrantId,
}

impl StalledStride {
    pub fn new(victim: EntrantId) -> Self {
        Self { victim }
    }
}

impl StrideModel for StalledStride {
    fn stride(&self, entrant: EntrantId, speed: f64, rng: &mut dyn RngCore) -> f64 {
        if entrant == self.victim {
            0.0
        } else {
            RandomStride.stride(entrant, speed, rng)
        }
    }
}
