//! Partitioner configuration, validation, and error types.

use std::error::Error;
use std::fmt;

use tessel_core::RasterError;
use tessel_space::Color;

// ── ColorKeying ────────────────────────────────────────────────────

/// What a site's region colour is derived from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorKeying {
    /// Key colours by the site's stable [`SiteId`](tessel_core::SiteId).
    /// Removing a site never recolours the others.
    #[default]
    StableId,
    /// Key colours by the site's current position in scan order. Removing a
    /// site shifts every later site down one slot and with it their colours.
    ScanIndex,
}

// ── PartitionerConfig ──────────────────────────────────────────────

/// Configuration for a [`SpatialPartitioner`](crate::SpatialPartitioner).
#[derive(Clone, Debug)]
pub struct PartitionerConfig {
    /// Number of row bands for the multi-threaded path. `None` = auto-detect
    /// (`available_parallelism`).
    pub worker_count: Option<usize>,
    /// Fill colour for an empty site set. Default: white.
    pub background: Color,
    /// Colour of the disk drawn over each site. Default: black.
    pub marker_color: Color,
    /// Radius of the site marker disk in pixels. `0` draws a single pixel.
    /// Default: 3.
    pub marker_radius: u32,
    /// Source of each site's region colour. Default: [`ColorKeying::StableId`].
    pub color_keying: ColorKeying,
}

impl Default for PartitionerConfig {
    fn default() -> Self {
        Self {
            worker_count: None,
            background: Color::WHITE,
            marker_color: Color::BLACK,
            marker_radius: 3,
            color_keying: ColorKeying::StableId,
        }
    }
}

impl PartitionerConfig {
    /// Upper bound on explicit worker counts.
    pub const MAX_WORKERS: usize = 256;
    /// Upper bound on the marker radius.
    pub const MAX_MARKER_RADIUS: u32 = 64;

    /// Resolve the actual worker count, applying auto-detection if `None`.
    ///
    /// Explicit values are clamped to `[1, MAX_WORKERS]`. If the platform
    /// cannot report its parallelism the count falls back to 4.
    pub fn resolved_worker_count(&self) -> usize {
        match self.worker_count {
            Some(n) => n.clamp(1, Self::MAX_WORKERS),
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
                .min(Self::MAX_WORKERS),
        }
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(n) = self.worker_count {
            if n == 0 {
                return Err(ConfigError::ZeroWorkers);
            }
            if n > Self::MAX_WORKERS {
                return Err(ConfigError::TooManyWorkers {
                    configured: n,
                    max: Self::MAX_WORKERS,
                });
            }
        }
        if self.marker_radius > Self::MAX_MARKER_RADIUS {
            return Err(ConfigError::MarkerRadiusTooLarge {
                radius: self.marker_radius,
                max: Self::MAX_MARKER_RADIUS,
            });
        }
        Ok(())
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`PartitionerConfig::validate()`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `worker_count` was `Some(0)`.
    ZeroWorkers,
    /// `worker_count` exceeds [`PartitionerConfig::MAX_WORKERS`].
    TooManyWorkers {
        /// The configured count.
        configured: usize,
        /// The allowed maximum.
        max: usize,
    },
    /// `marker_radius` exceeds [`PartitionerConfig::MAX_MARKER_RADIUS`].
    MarkerRadiusTooLarge {
        /// The configured radius.
        radius: u32,
        /// The allowed maximum.
        max: u32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroWorkers => write!(f, "worker_count must be at least 1"),
            Self::TooManyWorkers { configured, max } => {
                write!(f, "worker_count {configured} exceeds maximum of {max}")
            }
            Self::MarkerRadiusTooLarge { radius, max } => {
                write!(f, "marker_radius {radius} exceeds maximum of {max}")
            }
        }
    }
}

impl Error for ConfigError {}

impl From<ConfigError> for RasterError {
    fn from(e: ConfigError) -> Self {
        RasterError::InvalidArgument {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(PartitionerConfig::default().validate(), Ok(()));
    }

    #[test]
    fn auto_worker_count_is_positive() {
        assert!(PartitionerConfig::default().resolved_worker_count() >= 1);
    }

    #[test]
    fn explicit_worker_count_is_clamped() {
        let cfg = PartitionerConfig {
            worker_count: Some(10_000),
            ..Default::default()
        };
        assert_eq!(cfg.resolved_worker_count(), PartitionerConfig::MAX_WORKERS);
        let cfg = PartitionerConfig {
            worker_count: Some(3),
            ..Default::default()
        };
        assert_eq!(cfg.resolved_worker_count(), 3);
    }

    #[test]
    fn zero_workers_rejected() {
        let cfg = PartitionerConfig {
            worker_count: Some(0),
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroWorkers));
    }

    #[test]
    fn oversized_marker_rejected() {
        let cfg = PartitionerConfig {
            marker_radius: 65,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::MarkerRadiusTooLarge { radius: 65, .. })
        ));
    }

    #[test]
    fn config_error_converts_to_raster_error() {
        let err = RasterError::from(ConfigError::ZeroWorkers);
        assert_eq!(
            err,
            RasterError::InvalidArgument {
                reason: ConfigError::ZeroWorkers.to_string()
            }
        );
    }
}
