//! Tessel: parallel nearest-site rasterization and a concurrent race
//! simulator.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Tessel sub-crates. For most users, adding `tessel` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tessel::prelude::*;
//!
//! // Two sites, rendered on both paths.
//! let mut p = SpatialPartitioner::new();
//! p.add_site(Point::new(8.0, 8.0)).unwrap();
//! p.add_site(Point::new(24.0, 8.0)).unwrap();
//! p.set_metric(DistanceMetric::Manhattan);
//! let seq = p.compute_dims(32, 16, false).unwrap();
//! let par = p.compute_dims(32, 16, true).unwrap();
//! assert_eq!(seq.pixels, par.pixels);
//! assert_eq!(seq.pixels.pixel(8, 8), Some(Color::BLACK));
//!
//! // A race on simulated time.
//! let config = RaceConfig {
//!     finish_line: 40.0,
//!     pause_range: Duration::from_millis(1)..Duration::from_millis(5),
//!     poll_interval: Duration::from_millis(5),
//!     ..Default::default()
//! };
//! let mut sim = RaceSimulator::new(config)
//!     .unwrap()
//!     .with_clock(Arc::new(VirtualClock::new()));
//! let race = sim.start_count(2).unwrap();
//! sim.wait(race).unwrap();
//! let result = sim.result(race).unwrap();
//! assert_eq!(result.standings.len(), 2);
//! assert!(result.winner.is_some());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tessel-core` | IDs and error types |
//! | [`space`] | `tessel-space` | Points, distance metrics, sites, colours |
//! | [`raster`] | `tessel-raster` | The partitioner and its two raster paths |
//! | [`race`] | `tessel-race` | The race simulator, clocks, stride models |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Identifiers and error types (`tessel-core`).
pub use tessel_core as types;

/// Planar geometry (`tessel-space`).
///
/// [`space::Point`], [`space::DistanceMetric`], [`space::Site`] and the
/// deterministic [`space::site_color`].
pub use tessel_space as space;

/// Nearest-site rasterization (`tessel-raster`).
///
/// [`raster::SpatialPartitioner`] renders [`raster::Frame`]s on either
/// [`raster::ExecutionMode`].
pub use tessel_raster as raster;

/// Concurrent race simulation (`tessel-race`).
///
/// [`race::RaceSimulator`] with injectable [`race::Clock`] and
/// [`race::StrideModel`].
pub use tessel_race as race;

/// Common imports for typical Tessel usage.
///
/// ```rust
/// use tessel::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use tessel_core::{EntrantId, RaceError, RaceId, RasterError, SiteId};

    // Geometry
    pub use tessel_space::{distance, site_color, Color, DistanceMetric, Point, Site};

    // Raster
    pub use tessel_raster::{
        CanvasSize, ColorKeying, ExecutionMode, Frame, FrameMetrics, PartitionerConfig,
        PixelBuffer, SpatialPartitioner,
    };

    // Race
    pub use tessel_race::{
        Clock, RaceConfig, RacePhase, RaceReport, RaceResult, RaceSimulator, RaceSnapshot,
        Standing, StrideModel, SystemClock, VirtualClock,
    };
}
