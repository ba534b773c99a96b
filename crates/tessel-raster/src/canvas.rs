//! Canvas dimensions, validated at the call boundary.

use tessel_core::RasterError;

use crate::buffer::BYTES_PER_PIXEL;

/// Width and height of a raster, in pixels.
///
/// Either dimension may be zero, which yields an empty buffer. The total
/// byte size is guaranteed to fit in `usize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CanvasSize {
    width: usize,
    height: usize,
}

impl CanvasSize {
    /// Build a size from signed dimensions, as callers that compute them
    /// from window geometry usually hold them.
    ///
    /// Returns `InvalidArgument` if either dimension is negative or the
    /// RGBA8 buffer would not fit in memory addressing.
    pub fn new(width: i64, height: i64) -> Result<Self, RasterError> {
        let width = usize::try_from(width).map_err(|_| RasterError::InvalidArgument {
            reason: format!("width must be non-negative, got {width}"),
        })?;
        let height = usize::try_from(height).map_err(|_| RasterError::InvalidArgument {
            reason: format!("height must be non-negative, got {height}"),
        })?;
        Self::from_unsigned(width, height)
    }

    /// Build a size from unsigned dimensions.
    pub fn from_unsigned(width: usize, height: usize) -> Result<Self, RasterError> {
        width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
            .ok_or_else(|| RasterError::InvalidArgument {
                reason: format!("canvas {width}x{height} is too large"),
            })?;
        Ok(Self { width, height })
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// `true` if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_dimensions_rejected() {
        assert!(matches!(
            CanvasSize::new(-1, 10),
            Err(RasterError::InvalidArgument { .. })
        ));
        assert!(matches!(
            CanvasSize::new(10, -5),
            Err(RasterError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn zero_is_allowed_and_empty() {
        let s = CanvasSize::new(0, 480).unwrap();
        assert!(s.is_empty());
        assert_eq!(s.pixel_count(), 0);
    }

    #[test]
    fn overflow_rejected() {
        assert!(CanvasSize::from_unsigned(usize::MAX, 2).is_err());
    }

    #[test]
    fn accessors() {
        let s = CanvasSize::new(640, 480).unwrap();
        assert_eq!((s.width(), s.height()), (640, 480));
        assert_eq!(s.pixel_count(), 307_200);
        assert!(!s.is_empty());
    }
}
