//! Coordinate primitives
//!
//! Provides the [`GeoPoint`] value type, range validation and the
//! great-circle distance used for path spacing and loop closure.

mod types;

pub use types::{CoordError, GeoPoint, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

use geo::{Distance, Haversine, Point};

/// Great-circle distance between two points in meters.
///
/// This is the single distance primitive of the crate: the path tracker uses
/// it for minimum spacing and for closed-loop detection.
#[inline]
pub fn distance_meters(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let from = Point::new(a.longitude, a.latitude);
    let to = Point::new(b.longitude, b.latitude);
    Haversine::distance(from, to)
}
