//! Nearest-site rasterization for Tessel.
//!
//! [`SpatialPartitioner`] owns an ordered site set and a
//! [`DistanceMetric`](tessel_space::DistanceMetric) and renders a
//! [`PixelBuffer`] in which every pixel carries the colour of its nearest
//! site, with a filled marker over each site.
//!
//! Two execution paths produce byte-identical buffers:
//!
//! - [`ExecutionMode::SingleThreaded`]: one scan over every row on the
//!   calling thread.
//! - [`ExecutionMode::MultiThreaded`]: rows are cut into contiguous
//!   [`RowBand`]s, one per worker, shaded on scoped threads that each own a
//!   disjoint slice of the buffer, then joined before markers are drawn.
//!
//! Every frame comes back with [`FrameMetrics`] holding its wall-clock and
//! process CPU time.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bands;
pub mod buffer;
pub mod canvas;
pub mod config;
pub mod metrics;
pub mod partitioner;

pub use bands::{row_bands, BandList, RowBand};
pub use buffer::{PixelBuffer, BYTES_PER_PIXEL};
pub use canvas::CanvasSize;
pub use config::{ColorKeying, ConfigError, PartitionerConfig};
pub use metrics::{ExecutionMode, FrameMetrics};
pub use partitioner::{Frame, SpatialPartitioner};
