//! Benchmark profiles and utilities for Tessel.
//!
//! Provides pre-built partitioners for benchmarks and the demo:
//!
//! - [`reference_profile`]: 64 random sites on a 640x480 canvas
//! - [`stress_profile`]: 512 random sites on a 1920x1080 canvas
//! - [`demo_race_config`]: a seeded race on the default track

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::time::Duration;

use tessel_race::RaceConfig;
use tessel_raster::{CanvasSize, PartitionerConfig, SpatialPartitioner};
use tessel_space::DistanceMetric;

/// Canvas used by [`reference_profile`].
pub const REFERENCE_CANVAS: (usize, usize) = (640, 480);
/// Canvas used by [`stress_profile`].
pub const STRESS_CANVAS: (usize, usize) = (1920, 1080);

fn scattered(
    sites: usize,
    (w, h): (usize, usize),
    metric: DistanceMetric,
    seed: u64,
    config: PartitionerConfig,
) -> (SpatialPartitioner, CanvasSize) {
    let size = CanvasSize::from_unsigned(w, h).expect("profile canvas fits in memory");
    let mut p = SpatialPartitioner::with_config(config).expect("profile config is valid");
    p.set_metric(metric);
    p.scatter_random(sites, size, seed)
        .expect("profile site count is non-zero");
    (p, size)
}

/// Build the reference benchmark profile: 64 sites on 640x480 (307K pixels).
///
/// # Panics
///
/// If `config` fails validation.
pub fn reference_profile(
    metric: DistanceMetric,
    seed: u64,
    config: PartitionerConfig,
) -> (SpatialPartitioner, CanvasSize) {
    scattered(64, REFERENCE_CANVAS, metric, seed, config)
}

/// Build the stress profile: 512 sites on 1920x1080 (~2M pixels).
///
/// Same layout rules as [`reference_profile`] at roughly 50x the work.
pub fn stress_profile(
    metric: DistanceMetric,
    seed: u64,
    config: PartitionerConfig,
) -> (SpatialPartitioner, CanvasSize) {
    scattered(512, STRESS_CANVAS, metric, seed, config)
}

/// Race configuration for the demo: default track and pacing, a fixed seed
/// and a short poll interval for smoother progress output.
pub fn demo_race_config(seed: u64) -> RaceConfig {
    RaceConfig {
        poll_interval: Duration::from_millis(50),
        seed: Some(seed),
        ..Default::default()
    }
}
