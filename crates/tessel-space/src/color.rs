//! Deterministic per-site colouring.
//!
//! Each site's region colour is a pure function of a 64-bit key. The key is
//! fed to a ChaCha8 generator seeded with `key * 1000` and three channels are
//! drawn uniformly from `[100, 255)`, so regions are never darker than the
//! site markers drawn over them.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Lowest channel value a site colour can take (inclusive).
pub const SITE_CHANNEL_MIN: u8 = 100;
/// Upper bound for site colour channels (exclusive).
pub const SITE_CHANNEL_MAX: u8 = 255;

/// An opaque RGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Opaque white, the default canvas background.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black, the default site marker colour.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Build a colour from its channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// RGBA8 bytes with full alpha.
    #[inline]
    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    /// Read the RGB channels back out of an RGBA8 pixel.
    #[inline]
    pub const fn from_rgba(px: [u8; 4]) -> Self {
        Self::rgb(px[0], px[1], px[2])
    }
}

/// Derive the region colour for a site key.
///
/// Identical keys always yield identical colours within and across runs of
/// the same build. Channels lie in
/// [`SITE_CHANNEL_MIN`]`..`[`SITE_CHANNEL_MAX`].
pub fn site_color(key: u64) -> Color {
    let mut rng = ChaCha8Rng::seed_from_u64(key.wrapping_mul(1000));
    let r = rng.gen_range(SITE_CHANNEL_MIN..SITE_CHANNEL_MAX);
    let g = rng.gen_range(SITE_CHANNEL_MIN..SITE_CHANNEL_MAX);
    let b = rng.gen_range(SITE_CHANNEL_MIN..SITE_CHANNEL_MAX);
    Color::rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn same_key_same_color() {
        for key in [0, 1, 17, 4096, u64::MAX] {
            assert_eq!(site_color(key), site_color(key));
        }
    }

    #[test]
    fn neighbouring_keys_spread_out() {
        let distinct: HashSet<Color> = (0..64).map(site_color).collect();
        assert!(
            distinct.len() >= 60,
            "only {} distinct colours for 64 keys",
            distinct.len()
        );
    }

    #[test]
    fn rgba_round_trip_keeps_channels() {
        let c = Color::rgb(12, 34, 56);
        assert_eq!(c.to_rgba(), [12, 34, 56, 255]);
        assert_eq!(Color::from_rgba(c.to_rgba()), c);
    }

    proptest! {
        #[test]
        fn channels_stay_in_range(key in any::<u64>()) {
            let c = site_color(key);
            for ch in [c.r, c.g, c.b] {
                prop_assert!((SITE_CHANNEL_MIN..SITE_CHANNEL_MAX).contains(&ch));
            }
        }
    }
}
