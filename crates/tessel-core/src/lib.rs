//! Core types for the Tessel workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! identifiers shared by the raster and race crates ([`SiteId`], [`RaceId`],
//! [`EntrantId`]) and the error taxonomy both components report through.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;

pub use error::{RaceError, RasterError};
pub use id::{EntrantId, RaceId, SiteId};
