//! Planar geometry for Tessel.
//!
//! This crate holds everything the partitioner needs to reason about sites
//! independently of any raster: the [`Point`] type, the selectable
//! [`DistanceMetric`], the [`Site`] record with its nearest-site scan, and
//! the deterministic per-site [`Color`] derivation.
//!
//! # Metrics
//!
//! - [`DistanceMetric::Euclidean`]: `sqrt(dx² + dy²)`
//! - [`DistanceMetric::Manhattan`]: `|dx| + |dy|`
//!
//! Both are exposed as the pure function [`distance`] so they can be tested
//! without a partitioner.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod color;
pub mod error;
pub mod metric;
pub mod point;
pub mod site;

pub use color::{site_color, Color};
pub use error::SpaceError;
pub use metric::{distance, DistanceMetric};
pub use point::Point;
pub use site::{nearest_index, Site};
