//! A point in the continuous plane.

use crate::error::SpaceError;

/// A 2D point with real-valued coordinates.
///
/// Pixel `(x, y)` of a raster is queried at `Point { x, y }` exactly, not
/// at the pixel centre.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// Horizontal coordinate, growing rightwards.
    pub x: f64,
    /// Vertical coordinate, growing downwards.
    pub y: f64,
}

impl Point {
    /// Create a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Return the point unchanged if both coordinates are finite.
    pub fn finite(self) -> Result<Self, SpaceError> {
        if self.x.is_finite() && self.y.is_finite() {
            Ok(self)
        } else {
            Err(SpaceError::NonFinitePoint {
                x: self.x,
                y: self.y,
            })
        }
    }

    /// The pixel this point falls on, truncating each coordinate toward zero.
    pub fn pixel(self) -> (i64, i64) {
        (self.x as i64, self.y as i64)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_accepts_ordinary_points() {
        assert_eq!(Point::new(1.5, -2.0).finite(), Ok(Point::new(1.5, -2.0)));
    }

    #[test]
    fn finite_rejects_nan_and_infinity() {
        assert!(Point::new(f64::NAN, 0.0).finite().is_err());
        assert!(Point::new(0.0, f64::INFINITY).finite().is_err());
    }

    #[test]
    fn pixel_truncates_toward_zero() {
        assert_eq!(Point::new(3.9, 7.2).pixel(), (3, 7));
        assert_eq!(Point::new(-0.5, 0.5).pixel(), (0, 0));
    }

    #[test]
    fn from_tuple() {
        let p: Point = (4.0, 5.0).into();
        assert_eq!(p, Point::new(4.0, 5.0));
    }
}
