//! Error types for geometry parsing and validation.

use std::fmt;

use tessel_core::RasterError;

/// Errors arising from metric selection or point validation.
#[derive(Debug, Clone, PartialEq)]
pub enum SpaceError {
    /// A metric name or index does not name a known metric.
    UnknownMetric {
        /// The rejected input, rendered as text.
        value: String,
    },
    /// A point has a NaN or infinite coordinate.
    NonFinitePoint {
        /// The offending x coordinate.
        x: f64,
        /// The offending y coordinate.
        y: f64,
    },
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMetric { value } => write!(f, "unknown distance metric '{value}'"),
            Self::NonFinitePoint { x, y } => {
                write!(f, "point ({x}, {y}) has a non-finite coordinate")
            }
        }
    }
}

impl std::error::Error for SpaceError {}

impl From<SpaceError> for RasterError {
    fn from(e: SpaceError) -> Self {
        RasterError::InvalidArgument {
            reason: e.to_string(),
        }
    }
}
