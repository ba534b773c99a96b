//! The nearest-site partitioner: site set, metric, and both raster paths.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use log::debug;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use tessel_core::{RasterError, SiteId};
use tessel_space::{nearest_index, site_color, Color, DistanceMetric, Point, Site};

use crate::bands::row_bands;
use crate::buffer::{PixelBuffer, BYTES_PER_PIXEL};
use crate::canvas::CanvasSize;
use crate::config::{ColorKeying, ConfigError, PartitionerConfig};
use crate::metrics::{ExecutionMode, FrameMetrics, FrameTimer};

/// One computed frame: the pixels and how long they took.
#[derive(Clone, Debug)]
pub struct Frame {
    /// The rendered RGBA8 buffer, owned by the caller.
    pub pixels: PixelBuffer,
    /// Timing for this computation.
    pub metrics: FrameMetrics,
}

// ── InFlight guard ─────────────────────────────────────────────────

/// Holds the partitioner's in-flight flag for the duration of a compute.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, RasterError> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| RasterError::AlreadyRunning)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// ── SpatialPartitioner ─────────────────────────────────────────────

/// Owns an ordered site set and a distance metric, and rasterizes the
/// nearest-site map on demand.
///
/// Site mutation takes `&mut self` and computation takes `&self`, so the
/// site set cannot change while a frame is being shaded. Two computations
/// racing on a shared partitioner are rejected with
/// [`RasterError::AlreadyRunning`].
///
/// # Examples
///
/// ```
/// use tessel_raster::{CanvasSize, ExecutionMode, SpatialPartitioner};
/// use tessel_space::{Color, Point};
///
/// let mut p = SpatialPartitioner::new();
/// p.add_site(Point::new(10.0, 10.0)).unwrap();
/// p.add_site(Point::new(50.0, 30.0)).unwrap();
///
/// let size = CanvasSize::new(64, 48).unwrap();
/// let seq = p.compute(size, ExecutionMode::SingleThreaded).unwrap();
/// let par = p.compute(size, ExecutionMode::MultiThreaded).unwrap();
/// assert_eq!(seq.pixels, par.pixels);
/// assert_eq!(seq.pixels.pixel(10, 10), Some(Color::BLACK));
/// ```
#[derive(Debug)]
pub struct SpatialPartitioner {
    sites: Vec<Site>,
    metric: DistanceMetric,
    next_id: u64,
    config: PartitionerConfig,
    workers: usize,
    in_flight: AtomicBool,
}

impl Default for SpatialPartitioner {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialPartitioner {
    /// An empty partitioner with the default configuration and the
    /// Euclidean metric.
    pub fn new() -> Self {
        let config = PartitionerConfig::default();
        let workers = config.resolved_worker_count();
        Self {
            sites: Vec::new(),
            metric: DistanceMetric::default(),
            next_id: 0,
            config,
            workers,
            in_flight: AtomicBool::new(false),
        }
    }

    /// An empty partitioner with a validated configuration.
    pub fn with_config(config: PartitionerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let workers = config.resolved_worker_count();
        Ok(Self {
            config,
            workers,
            ..Self::new()
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &PartitionerConfig {
        &self.config
    }

    /// Number of bands the multi-threaded path splits rows into.
    pub fn worker_count(&self) -> usize {
        self.workers
    }

    // ── Site set ───────────────────────────────────────────────

    /// Append a site at `point` and return its id.
    ///
    /// Duplicate coordinates are allowed; the earlier site wins every tie.
    pub fn add_site(&mut self, point: Point) -> Result<SiteId, RasterError> {
        let point = point.finite()?;
        let id = SiteId(self.next_id);
        self.next_id += 1;
        self.sites.push(Site::new(id, point));
        Ok(id)
    }

    /// Remove and return the site nearest to `point` under the active
    /// metric. Returns `Ok(None)` and leaves the set untouched when empty.
    pub fn remove_nearest(&mut self, point: Point) -> Result<Option<Site>, RasterError> {
        let point = point.finite()?;
        Ok(nearest_index(&self.sites, self.metric, point).map(|i| self.sites.remove(i)))
    }

    /// Replace the site set with `count` sites at uniformly random integer
    /// coordinates inside `size`, drawn from a generator seeded with `seed`.
    pub fn scatter_random(
        &mut self,
        count: usize,
        size: CanvasSize,
        seed: u64,
    ) -> Result<(), RasterError> {
        if count == 0 {
            return Err(RasterError::InvalidArgument {
                reason: "random site count must be at least 1".into(),
            });
        }
        if size.is_empty() {
            return Err(RasterError::InvalidArgument {
                reason: format!(
                    "cannot scatter sites on an empty {}x{} canvas",
                    size.width(),
                    size.height()
                ),
            });
        }
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.sites.clear();
        self.sites.reserve(count);
        for _ in 0..count {
            let x = rng.gen_range(0..size.width()) as f64;
            let y = rng.gen_range(0..size.height()) as f64;
            self.add_site(Point::new(x, y))?;
        }
        debug!("scattered {count} sites on {}x{}", size.width(), size.height());
        Ok(())
    }

    /// Remove every site. Ids are not reused afterwards.
    pub fn clear(&mut self) {
        self.sites.clear();
    }

    /// Sites in scan order.
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// Number of sites.
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// `true` if there are no sites.
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Switch the metric used by later computations and removals.
    pub fn set_metric(&mut self, metric: DistanceMetric) {
        self.metric = metric;
    }

    /// The active metric.
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Scan index of the site nearest to `point`, or `None` when empty.
    pub fn nearest_index(&self, point: Point) -> Option<usize> {
        nearest_index(&self.sites, self.metric, point)
    }

    /// Region colour of the site at scan position `index`.
    pub fn site_color_at(&self, index: usize) -> Option<Color> {
        self.sites
            .get(index)
            .map(|site| site_color(self.color_key(index, site)))
    }

    fn color_key(&self, index: usize, site: &Site) -> u64 {
        match self.config.color_keying {
            ColorKeying::StableId => site.id().0,
            ColorKeying::ScanIndex => index as u64,
        }
    }

    fn palette(&self) -> Vec<Color> {
        self.sites
            .iter()
            .enumerate()
            .map(|(i, site)| site_color(self.color_key(i, site)))
            .collect()
    }

    // ── Computation ────────────────────────────────────────────

    /// Render the nearest-site map for `size` on the chosen path.
    pub fn compute(&self, size: CanvasSize, mode: ExecutionMode) -> Result<Frame, RasterError> {
        let _guard = InFlight::acquire(&self.in_flight)?;
        let timer = FrameTimer::start();
        let mut pixels = PixelBuffer::filled(size, self.config.background);

        let mut workers = 1;
        if !size.is_empty() && !self.sites.is_empty() {
            let palette = self.palette();
            workers = match mode {
                ExecutionMode::SingleThreaded => {
                    let width = size.width();
                    shade_rows(pixels.bytes_mut(), 0, width, &self.sites, self.metric, &palette);
                    1
                }
                ExecutionMode::MultiThreaded => self.shade_banded(&mut pixels, &palette),
            };
            for site in &self.sites {
                let (x, y) = site.position().pixel();
                pixels.fill_disk(x, y, self.config.marker_radius, self.config.marker_color);
            }
        }

        let metrics = timer.finish(mode, workers, self.sites.len(), size.pixel_count());
        debug!(
            "{} frame {}x{}: {} sites, {} workers, wall {:.2}ms, cpu {:.2}ms",
            mode,
            size.width(),
            size.height(),
            metrics.sites,
            metrics.workers,
            metrics.wall_ms(),
            metrics.cpu_ms(),
        );
        Ok(Frame { pixels, metrics })
    }

    /// Render on the calling thread.
    pub fn compute_single_threaded(&self, size: CanvasSize) -> Result<Frame, RasterError> {
        self.compute(size, ExecutionMode::SingleThreaded)
    }

    /// Render with rows split across [`worker_count`](Self::worker_count)
    /// scoped threads. Output is byte-identical to the single-threaded path.
    pub fn compute_multi_threaded(&self, size: CanvasSize) -> Result<Frame, RasterError> {
        self.compute(size, ExecutionMode::MultiThreaded)
    }

    /// Render from raw signed dimensions. Negative values are rejected.
    pub fn compute_dims(
        &self,
        width: i64,
        height: i64,
        parallel: bool,
    ) -> Result<Frame, RasterError> {
        let size = CanvasSize::new(width, height)?;
        self.compute(size, ExecutionMode::from_parallel(parallel))
    }

    /// Shade the buffer band by band. Returns the number of threads spawned.
    fn shade_banded(&self, pixels: &mut PixelBuffer, palette: &[Color]) -> usize {
        let width = pixels.width();
        let stride = pixels.row_stride();
        let bands = row_bands(pixels.height(), self.workers);
        let sites = self.sites.as_slice();
        let metric = self.metric;

        thread::scope(|scope| {
            let mut rest = pixels.bytes_mut();
            let mut handles = Vec::with_capacity(bands.len());
            for (i, band) in bands.iter().enumerate() {
                let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(band.len() * stride);
                rest = tail;
                if band.is_empty() {
                    continue;
                }
                let first_row = band.start;
                let handle = thread::Builder::new()
                    .name(format!("tessel-raster-{i}"))
                    .spawn_scoped(scope, move || {
                        shade_rows(chunk, first_row, width, sites, metric, palette)
                    })
                    .expect("failed to spawn raster worker");
                handles.push(handle);
            }
            let spawned = handles.len();
            for handle in handles {
                if let Err(payload) = handle.join() {
                    std::panic::resume_unwind(payload);
                }
            }
            spawned
        })
    }
}

/// Colour every pixel of `rows` (starting at `first_row`) with its nearest
/// site's palette entry. `width` must be non-zero.
fn shade_rows(
    rows: &mut [u8],
    first_row: usize,
    width: usize,
    sites: &[Site],
    metric: DistanceMetric,
    palette: &[Color],
) {
    for (r, row) in rows.chunks_exact_mut(width * BYTES_PER_PIXEL).enumerate() {
        let y = (first_row + r) as f64;
        for (x, px) in row.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
            if let Some(i) = nearest_index(sites, metric, Point::new(x as f64, y)) {
                px.copy_from_slice(&palette[i].to_rgba());
            }
        }
    }
}
