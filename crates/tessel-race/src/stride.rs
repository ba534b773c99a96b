//! Per-step movement models.

use rand::{Rng, RngCore};
use tessel_core::EntrantId;

/// Produces the distance an entrant covers in one step.
///
/// Called only from that entrant's own worker thread, with the worker's
/// private generator. The returned stride becomes the entrant's current
/// acceleration and is added to its position. A negative or non-finite
/// stride stops the worker with a fault.
pub trait StrideModel: Send + Sync {
    /// Distance covered by `entrant`, whose fixed speed is `speed`, in its
    /// next step.
    fn stride(&self, entrant: EntrantId, speed: f64, rng: &mut dyn RngCore) -> f64;
}

/// The default model: `speed * u * 0.8 + 0.7` with `u` uniform in `[0, 1)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomStride;

impl RandomStride {
    /// Multiplier applied to `speed * u`.
    pub const SCALE: f64 = 0.8;
    /// Constant floor added to every stride.
    pub const BASE: f64 = 0.7;
}

impl StrideModel for RandomStride {
    fn stride(&self, _entrant: EntrantId, speed: f64, rng: &mut dyn RngCore) -> f64 {
        let u: f64 = rng.gen();
        speed * u * Self::SCALE + Self::BASE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    proptest! {
        #[test]
        fn random_stride_is_bounded(speed in 5.0f64..10.0, seed in any::<u64>()) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            for _ in 0..32 {
                let s = RandomStride.stride(EntrantId(0), speed, &mut rng);
                prop_assert!(s >= RandomStride::BASE);
                prop_assert!(s < speed * RandomStride::SCALE + RandomStride::BASE);
            }
        }
    }

    #[test]
    fn same_seed_same_strides() {
        let mut a = ChaCha8Rng::seed_from_u64(9);
        let mut b = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..10 {
            assert_eq!(
                RandomStride.stride(EntrantId(1), 7.0, &mut a),
                RandomStride.stride(EntrantId(1), 7.0, &mut b)
            );
        }
    }
}
