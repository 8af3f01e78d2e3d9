//! Typed sections of the configuration file.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::map_overlay::DEFAULT_INITIAL_SPAN_M;
use crate::path_tracker::{
    DEFAULT_CLOSURE_MIN_POINTS, DEFAULT_CLOSURE_THRESHOLD_M, DEFAULT_MIN_SPACING_M,
    DEFAULT_SAMPLE_INTERVAL,
};
use crate::transform::{Converter, Gcj02, Identity};

/// `[tracking]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingSettings {
    /// Admission tick interval in milliseconds.
    pub sample_interval_ms: u64,
    /// Minimum spacing between path points in meters.
    pub min_spacing_m: f64,
    /// Loop closure distance in meters.
    pub closure_threshold_m: f64,
    /// Minimum points before closure is checked.
    pub closure_min_points: usize,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL.as_millis() as u64,
            min_spacing_m: DEFAULT_MIN_SPACING_M,
            closure_threshold_m: DEFAULT_CLOSURE_THRESHOLD_M,
            closure_min_points: DEFAULT_CLOSURE_MIN_POINTS,
        }
    }
}

/// Coordinate frame the map provider draws in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateSystem {
    /// Shifted frame used by maps inside mainland China.
    #[default]
    Gcj02,
    /// Raw GPS frame.
    Wgs84,
}

impl CoordinateSystem {
    /// Converter from raw GPS points into this frame.
    pub fn converter(self) -> Arc<dyn Converter> {
        match self {
            CoordinateSystem::Gcj02 => Arc::new(Gcj02),
            CoordinateSystem::Wgs84 => Arc::new(Identity),
        }
    }
}

impl FromStr for CoordinateSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gcj02" | "gcj-02" => Ok(CoordinateSystem::Gcj02),
            "wgs84" | "wgs-84" => Ok(CoordinateSystem::Wgs84),
            other => Err(format!("unknown coordinate system '{}'", other)),
        }
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateSystem::Gcj02 => f.write_str("gcj02"),
            CoordinateSystem::Wgs84 => f.write_str("wgs84"),
        }
    }
}

/// `[map]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    /// Frame of the map tiles.
    pub coordinate_system: CoordinateSystem,
    /// Camera span for the first centering, in meters.
    pub initial_span_m: f64,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            coordinate_system: CoordinateSystem::default(),
            initial_span_m: DEFAULT_INITIAL_SPAN_M,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
