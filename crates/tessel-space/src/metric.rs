//! Distance metrics for nearest-site queries.

use std::fmt;
use std::str::FromStr;

use crate::error::SpaceError;
use crate::point::Point;

/// The distance function used uniformly for every nearest-site query.
///
/// Changing the metric on a partitioner invalidates no stored state; the
/// next computation simply scans with the new function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DistanceMetric {
    /// Straight-line (L2) distance: `sqrt(dx² + dy²)`.
    #[default]
    Euclidean,
    /// Taxicab (L1) distance: `|dx| + |dy|`.
    Manhattan,
}

impl DistanceMetric {
    /// Every metric, in selector-index order.
    pub const ALL: [Self; 2] = [Self::Euclidean, Self::Manhattan];

    /// Distance between `a` and `b` under this metric.
    #[inline]
    pub fn distance(self, a: Point, b: Point) -> f64 {
        let dx = a.x - b.x;
        let dy = a.y - b.y;
        match self {
            Self::Euclidean => (dx * dx + dy * dy).sqrt(),
            Self::Manhattan => dx.abs() + dy.abs(),
        }
    }

    /// Lower-case name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Euclidean => "euclidean",
            Self::Manhattan => "manhattan",
        }
    }
}

/// Distance between `a` and `b` under `metric`.
///
/// Free-function form of [`DistanceMetric::distance`], independent of any
/// partitioner state.
///
/// # Examples
///
/// ```
/// use tessel_space::{distance, DistanceMetric, Point};
///
/// let a = Point::new(0.0, 0.0);
/// let b = Point::new(3.0, 4.0);
/// assert_eq!(distance(DistanceMetric::Euclidean, a, b), 5.0);
/// assert_eq!(distance(DistanceMetric::Manhattan, a, b), 7.0);
/// ```
#[inline]
pub fn distance(metric: DistanceMetric, a: Point, b: Point) -> f64 {
    metric.distance(a, b)
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Selector index: `0` is Euclidean, `1` is Manhattan.
impl TryFrom<u8> for DistanceMetric {
    type Error = SpaceError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(v as usize)
            .copied()
            .ok_or_else(|| SpaceError::UnknownMetric {
                value: v.to_string(),
            })
    }
}

impl FromStr for DistanceMetric {
    type Err = SpaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euclidean" | "l2" => Ok(Self::Euclidean),
            "manhattan" | "taxicab" | "l1" => Ok(Self::Manhattan),
            _ => Err(SpaceError::UnknownMetric {
                value: s.to_string(),
            }),
        }
    }
}
