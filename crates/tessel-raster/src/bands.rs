//! Row-band partitioning for the multi-threaded raster path.

use std::ops::Range;

use smallvec::SmallVec;

/// A contiguous half-open range of rows `[start, end)` owned by one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowBand {
    /// First row (inclusive).
    pub start: usize,
    /// One past the last row.
    pub end: usize,
}

impl RowBand {
    /// Number of rows in the band.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// `true` if the band holds no rows.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The band as a row range.
    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Band list; inline for typical core counts.
pub type BandList = SmallVec<[RowBand; 16]>;

/// Split `[0, height)` into `workers` contiguous bands.
///
/// Every band holds `height / workers` rows except the last, which absorbs
/// the remainder. When `workers > height` the leading bands are empty.
/// A worker count of zero is treated as one.
pub fn row_bands(height: usize, workers: usize) -> BandList {
    let workers = workers.max(1);
    let per_band = height / workers;
    let mut bands = BandList::with_capacity(workers);
    for i in 0..workers {
        let start = i * per_band;
        let end = if i + 1 == workers {
            height
        } else {
            start + per_band
        };
        bands.push(RowBand { start, end });
    }
    bands
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn last_band_takes_remainder() {
        let bands = row_bands(10, 3);
        let lens: Vec<usize> = bands.iter().map(RowBand::len).collect();
        assert_eq!(lens, vec![3, 3, 4]);
        assert_eq!(bands[2].rows(), 6..10);
    }

    #[test]
    fn more_workers_than_rows() {
        let bands = row_bands(2, 4);
        assert_eq!(bands.len(), 4);
        assert!(bands[..3].iter().all(RowBand::is_empty));
        assert_eq!(bands[3].rows(), 0..2);
    }

    #[test]
    fn zero_workers_means_one_band() {
        let bands = row_bands(5, 0);
        assert_eq!(bands.as_slice(), &[RowBand { start: 0, end: 5 }]);
    }

    #[test]
    fn zero_height() {
        assert!(row_bands(0, 8).iter().all(RowBand::is_empty));
    }

    proptest! {
        #[test]
        fn bands_cover_every_row_once(height in 0usize..2000, workers in 0usize..300) {
            let bands = row_bands(height, workers);
            prop_assert_eq!(bands.len(), workers.max(1));
            let mut next = 0;
            for band in &bands {
                prop_assert_eq!(band.start, next);
                prop_assert!(band.end >= band.start);
                next = band.end;
            }
            prop_assert_eq!(next, height);
        }
    }
}
