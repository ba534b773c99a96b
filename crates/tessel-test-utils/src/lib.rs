//! Test utilities and fixtures for Tessel development.
//!
//! Site layouts for raster tests live here; stride models that stall,
//! panic or follow a script live in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tessel_race::RaceConfig;
use tessel_space::Point;

/// `cols * rows` sites on a regular lattice with `spacing` between
/// neighbours, offset by half a spacing from the origin.
pub fn grid_sites(cols: usize, rows: usize, spacing: f64) -> Vec<Point> {
    let mut out = Vec::with_capacity(cols * rows);
    for r in 0..rows {
        for c in 0..cols {
            out.push(Point::new(
                (c as f64 + 0.5) * spacing,
                (r as f64 + 0.5) * spacing,
            ));
        }
    }
    out
}

/// `count` sites with real-valued coordinates inside `width x height`,
/// reproducible from `seed`.
pub fn scattered_sites(count: usize, width: f64, height: f64, seed: u64) -> Vec<Point> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| Point::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height)))
        .collect()
}

/// Two sites equidistant from `(5, 0)` under every metric.
pub fn tie_pair() -> [Point; 2] {
    [Point::new(0.0, 0.0), Point::new(10.0, 0.0)]
}

/// Duplicate coordinates, so every query ties between the two sites.
pub fn coincident_pair(at: Point) -> [Point; 2] {
    [at, at]
}

/// A race config tuned for tests: short track, short pauses, fast polling,
/// fixed seed.
pub fn fast_race_config() -> RaceConfig {
    RaceConfig {
        finish_line: 100.0,
        pause_range: Duration::from_millis(1)..Duration::from_millis(3),
        poll_interval: Duration::from_millis(10),
        max_duration: Duration::from_secs(30),
        seed: Some(0x7E55E1),
        ..Default::default()
    }
}
