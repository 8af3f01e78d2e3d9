//! Bounding rectangle of the GCJ-02 jurisdiction.

use crate::coord::GeoPoint;

/// An axis-aligned latitude/longitude rectangle, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionBounds {
    /// Minimum (southernmost) latitude
    pub min_lat: f64,
    /// Maximum (northernmost) latitude
    pub max_lat: f64,
    /// Minimum (westernmost) longitude
    pub min_lon: f64,
    /// Maximum (easternmost) longitude
    pub max_lon: f64,
}

impl RegionBounds {
    /// Create a new bounding rectangle.
    pub const fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Whether the point lies inside the rectangle (edges included).
    #[inline]
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.longitude >= self.min_lon
            && point.longitude <= self.max_lon
            && point.latitude >= self.min_lat
            && point.latitude <= self.max_lat
    }
}

/// Coarse rectangle around mainland China.
///
/// Not a border polygon: parts of neighbouring countries fall inside and some
/// outlying territory falls outside.
pub const GCJ02_REGION: RegionBounds = RegionBounds::new(3.86, 53.55, 73.66, 135.05);
