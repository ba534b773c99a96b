//! Per-frame timing metrics for the partitioner.
//!
//! [`FrameMetrics`] pairs the wall-clock time of one computation with the
//! CPU time the whole process accumulated over the same interval. On the
//! multi-threaded path CPU time exceeds wall time by roughly the number of
//! busy workers.

use std::fmt;
use std::time::{Duration, Instant};

use cpu_time::ProcessTime;
use log::warn;

/// Which raster path produced a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExecutionMode {
    /// One scan over every row on the calling thread.
    #[default]
    SingleThreaded,
    /// Rows split into bands shaded on scoped worker threads.
    MultiThreaded,
}

impl ExecutionMode {
    /// `MultiThreaded` if `parallel`, else `SingleThreaded`.
    pub fn from_parallel(parallel: bool) -> Self {
        if parallel {
            Self::MultiThreaded
        } else {
            Self::SingleThreaded
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleThreaded => write!(f, "single-threaded"),
            Self::MultiThreaded => write!(f, "multi-threaded"),
        }
    }
}

/// Timing and size data for one computed frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameMetrics {
    /// Path that produced the frame.
    pub mode: ExecutionMode,
    /// Wall-clock time from start of computation to return.
    pub wall: Duration,
    /// Process CPU time accumulated over the same interval. Zero if the
    /// platform could not report it.
    pub cpu: Duration,
    /// Threads that shaded rows (1 on the single-threaded path).
    pub workers: usize,
    /// Sites scanned per pixel.
    pub sites: usize,
    /// Pixels in the frame.
    pub pixels: usize,
}

impl FrameMetrics {
    /// Wall-clock time in milliseconds.
    pub fn wall_ms(&self) -> f64 {
        self.wall.as_secs_f64() * 1000.0
    }

    /// Process CPU time in milliseconds.
    pub fn cpu_ms(&self) -> f64 {
        self.cpu.as_secs_f64() * 1000.0
    }

    /// CPU time over wall time; `None` for frames too fast to measure.
    pub fn parallelism(&self) -> Option<f64> {
        if self.wall.is_zero() {
            None
        } else {
            Some(self.cpu.as_secs_f64() / self.wall.as_secs_f64())
        }
    }
}

/// Captures start times for one frame.
pub(crate) struct FrameTimer {
    wall: Instant,
    cpu: Option<ProcessTime>,
}

impl FrameTimer {
    pub(crate) fn start() -> Self {
        let cpu = match ProcessTime::try_now() {
            Ok(t) => Some(t),
            Err(e) => {
                warn!("process CPU time unavailable: {e}");
                None
            }
        };
        Self {
            wall: Instant::now(),
            cpu,
        }
    }

    pub(crate) fn finish(
        self,
        mode: ExecutionMode,
        workers: usize,
        sites: usize,
        pixels: usize,
    ) -> FrameMetrics {
        let wall = self.wall.elapsed();
        let cpu = match self.cpu.map(|t| t.try_elapsed()) {
            Some(Ok(d)) => d,
            Some(Err(e)) => {
                warn!("process CPU time unavailable: {e}");
                Duration::ZERO
            }
            None => Duration::ZERO,
        };
        FrameMetrics {
            mode,
            wall,
            cpu,
            workers,
            sites,
            pixels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = FrameMetrics::default();
        assert_eq!(m.mode, ExecutionMode::SingleThreaded);
        assert_eq!(m.wall_ms(), 0.0);
        assert_eq!(m.cpu_ms(), 0.0);
        assert_eq!(m.parallelism(), None);
    }

    #[test]
    fn millisecond_conversions() {
        let m = FrameMetrics {
            wall: Duration::from_micros(2500),
            cpu: Duration::from_millis(10),
            ..Default::default()
        };
        assert!((m.wall_ms() - 2.5).abs() < 1e-9);
        assert!((m.cpu_ms() - 10.0).abs() < 1e-9);
        assert!((m.parallelism().unwrap() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn timer_records_shape() {
        let timer = FrameTimer::start();
        let m = timer.finish(ExecutionMode::MultiThreaded, 4, 10, 100);
        assert_eq!(m.mode, ExecutionMode::MultiThreaded);
        assert_eq!((m.workers, m.sites, m.pixels), (4, 10, 100));
    }

    #[test]
    fn mode_from_flag() {
        assert_eq!(ExecutionMode::from_parallel(true), ExecutionMode::MultiThreaded);
        assert_eq!(ExecutionMode::from_parallel(false), ExecutionMode::SingleThreaded);
        assert_eq!(ExecutionMode::MultiThreaded.to_string(), "multi-threaded");
    }
}
