//! Sites and the nearest-site scan.

use tessel_core::SiteId;

use crate::metric::DistanceMetric;
use crate::point::Point;

/// A site: an immutable position tagged with its stable id.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Site {
    id: SiteId,
    position: Point,
}

impl Site {
    /// Create a site. Callers are expected to have validated `position`.
    pub fn new(id: SiteId, position: Point) -> Self {
        Self { id, position }
    }

    /// Stable id assigned at insertion.
    pub fn id(&self) -> SiteId {
        self.id
    }

    /// Position in the plane.
    pub fn position(&self) -> Point {
        self.position
    }
}

/// Index of the site nearest to `p` under `metric`.
///
/// Scans `sites` once in order and keeps a candidate only when it is
/// strictly closer than the best so far, so on ties the site that comes
/// first in scan order wins. Returns `None` for an empty slice.
#[inline]
pub fn nearest_index(sites: &[Site], metric: DistanceMetric, p: Point) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, site) in sites.iter().enumerate() {
        let d = metric.distance(p, site.position);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}
