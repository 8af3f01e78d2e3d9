//! Path tracker configuration.

use std::time::Duration;

/// Default interval between admission ticks (one sample every 2 seconds).
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_secs(2);

/// Default minimum distance between consecutive path points in meters.
///
/// A candidate must be strictly farther than this from the last point.
pub const DEFAULT_MIN_SPACING_M: f64 = 10.0;

/// Default distance between endpoint and anchor that counts as a closed loop.
pub const DEFAULT_CLOSURE_THRESHOLD_M: f64 = 30.0;

/// Default minimum number of points before a loop may be considered closed.
///
/// Prevents a path that has barely left its anchor from closing immediately.
pub const DEFAULT_CLOSURE_MIN_POINTS: usize = 10;

/// Configuration for a [`PathTracker`](super::PathTracker).
#[derive(Debug, Clone, PartialEq)]
pub struct PathTrackerConfig {
    /// Cadence of admission ticks when driven by [`PathTrackerDriver`](super::PathTrackerDriver).
    pub sample_interval: Duration,
    /// Minimum spacing between consecutive points in meters.
    pub min_spacing_m: f64,
    /// Maximum endpoint-to-anchor distance for loop closure in meters.
    pub closure_threshold_m: f64,
    /// Minimum path length (in points) before closure is checked.
    pub closure_min_points: usize,
}

impl Default for PathTrackerConfig {
    fn default() -> Self {
        Self {
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            min_spacing_m: DEFAULT_MIN_SPACING_M,
            closure_threshold_m: DEFAULT_CLOSURE_THRESHOLD_M,
            closure_min_points: DEFAULT_CLOSURE_MIN_POINTS,
        }
    }
}

impl PathTrackerConfig {
    /// Set the admission tick interval.
    pub fn with_sample_interval(mut self, interval: Duration) -> Self {
        self.sample_interval = interval;
        self
    }

    /// Set the minimum spacing in meters.
    pub fn with_min_spacing_m(mut self, meters: f64) -> Self {
        self.min_spacing_m = meters;
        self
    }

    /// Set the loop closure parameters.
    pub fn with_closure(mut self, threshold_m: f64, min_points: usize) -> Self {
        self.closure_threshold_m = threshold_m;
        self.closure_min_points = min_points;
        self
    }
}
