//! WGS-84 to GCJ-02 coordinate transform
//!
//! Raw GPS fixes are WGS-84. Map tiles served inside mainland China are drawn
//! in GCJ-02, a deliberately shifted frame, so a GPS path drawn without
//! correction appears hundreds of meters away from the roads it follows.
//!
//! # Design
//!
//! - Pure functions, no state: [`convert`] and [`convert_all`]
//! - Identity outside [`GCJ02_REGION`] (coarse rectangle, see [`is_in_region`])
//! - [`Converter`] lets callers pick between [`Gcj02`] and [`Identity`]
//!   depending on the frame their map provider uses
//!
//! # Example
//!
//! ```ignore
//! use earthlord::coord::GeoPoint;
//! use earthlord::transform;
//!
//! let beijing = GeoPoint::new(39.9042, 116.4074)?;
//! let shifted = transform::convert(beijing);
//! ```

mod polynomial;
mod region;

pub use polynomial::{correction_lat, correction_lon, ECCENTRICITY_SQ, SEMI_MAJOR_AXIS};
pub use region::{RegionBounds, GCJ02_REGION};

use crate::coord::GeoPoint;
use polynomial::{scale_offset, ORIGIN_LAT, ORIGIN_LON};

/// Whether the point falls inside the GCJ-02 bounding rectangle.
#[inline]
pub fn is_in_region(point: &GeoPoint) -> bool {
    GCJ02_REGION.contains(point)
}

/// Convert a WGS-84 point to GCJ-02.
///
/// Points outside the region are returned unchanged.
pub fn convert(point: GeoPoint) -> GeoPoint {
    if !is_in_region(&point) {
        return point;
    }

    let x = point.longitude - ORIGIN_LON;
    let y = point.latitude - ORIGIN_LAT;
    let (d_lat, d_lon) = scale_offset(correction_lat(x, y), correction_lon(x, y), point.latitude);

    GeoPoint::new_unchecked(point.latitude + d_lat, point.longitude + d_lon)
}

/// Convert a sequence of points, preserving order and length.
pub fn convert_all(points: &[GeoPoint]) -> Vec<GeoPoint> {
    points.iter().copied().map(convert).collect()
}

/// A coordinate frame conversion applied before rendering.
pub trait Converter: Send + Sync {
    /// Convert a single point.
    fn convert(&self, point: GeoPoint) -> GeoPoint;

    /// Convert a sequence of points, preserving order and length.
    fn convert_all(&self, points: &[GeoPoint]) -> Vec<GeoPoint> {
        points.iter().map(|p| self.convert(*p)).collect()
    }

    /// Short name for logs and config (`gcj02`, `wgs84`).
    fn name(&self) -> &'static str;
}

/// GCJ-02 conversion for maps that draw in the shifted frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gcj02;

impl Converter for Gcj02 {
    fn convert(&self, point: GeoPoint) -> GeoPoint {
        convert(point)
    }

    fn convert_all(&self, points: &[GeoPoint]) -> Vec<GeoPoint> {
        convert_all(points)
    }

    fn name(&self) -> &'static str {
        "gcj02"
    }
}

/// No-op conversion for maps that already draw WGS-84.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Converter for Identity {
    fn convert(&self, point: GeoPoint) -> GeoPoint {
        point
    }

    fn name(&self) -> &'static str {
        "wgs84"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_reference_points() {
        assert!(is_in_region(&GeoPoint::new_unchecked(35.0, 105.0)));
        assert!(!is_in_region(&GeoPoint::new_unchecked(0.0, 0.0)));
    }

    #[test]
    fn test_outside_region_is_identity() {
        let points = [
            GeoPoint::new_unchecked(0.0, 0.0),
            GeoPoint::new_unchecked(40.7128, -74.0060),
            GeoPoint::new_unchecked(51.5074, -0.1278),
            GeoPoint::new_unchecked(-33.8688, 151.2093),
            GeoPoint::new_unchecked(60.0, 100.0),
        ];
        for p in points {
            assert_eq!(convert(p), p, "{} should be unchanged", p);
        }
    }

    #[test]
    fn test_beijing_offset() {
        let wgs = GeoPoint::new_unchecked(39.9042, 116.4074);
        let gcj = convert(wgs);

        assert!(
            (gcj.latitude - 39.905603).abs() < 1e-5,
            "Latitude: {}",
            gcj.latitude
        );
        assert!(
            (gcj.longitude - 116.413642).abs() < 1e-5,
            "Longitude: {}",
            gcj.longitude
        );
    }

    #[test]
    fn test_beijing_is_deterministic() {
        let wgs = GeoPoint::new_unchecked(39.9042, 116.4074);
        let first = convert(wgs);
        for _ in 0..10 {
            let again = convert(wgs);
            assert_eq!(first.latitude.to_bits(), again.latitude.to_bits());
            assert_eq!(first.longitude.to_bits(), again.longitude.to_bits());
        }
    }

    #[test]
    fn test_shanghai_offset() {
        let gcj = convert(GeoPoint::new_unchecked(31.2304, 121.4737));
        assert!((gcj.latitude - 31.228458).abs() < 1e-5);
        assert!((gcj.longitude - 121.478223).abs() < 1e-5);
    }

    #[test]
    fn test_convert_all_preserves_order_and_length() {
        let input = vec![
            GeoPoint::new_unchecked(39.9042, 116.4074),
            GeoPoint::new_unchecked(0.0, 0.0),
            GeoPoint::new_unchecked(31.2304, 121.4737),
        ];
        let snapshot = input.clone();
        let output = convert_all(&input);

        assert_eq!(input, snapshot);
        assert_eq!(output.len(), 3);
        assert_eq!(output[0], convert(input[0]));
        assert_eq!(output[1], input[1]);
        assert_eq!(output[2], convert(input[2]));
    }

    #[test]
    fn test_convert_all_empty() {
        assert!(convert_all(&[]).is_empty());
    }

    #[test]
    fn test_converter_trait_objects() {
        let beijing = GeoPoint::new_unchecked(39.9042, 116.4074);
        let converters: Vec<Box<dyn Converter>> = vec![Box::new(Gcj02), Box::new(Identity)];

        assert_eq!(converters[0].convert(beijing), convert(beijing));
        assert_eq!(converters[1].convert(beijing), beijing);
        assert_eq!(converters[0].name(), "gcj02");
        assert_eq!(converters[1].name(), "wgs84");
        assert_eq!(converters[1].convert_all(&[beijing]), vec![beijing]);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_identity_south_of_region(
                lat in -90.0..3.85_f64,
                lon in -180.0..180.0_f64
            ) {
                let p = GeoPoint::new_unchecked(lat, lon);
                prop_assert_eq!(convert(p), p);
            }

            #[test]
            fn test_identity_west_of_region(
                lat in -90.0..90.0_f64,
                lon in -180.0..73.65_f64
            ) {
                let p = GeoPoint::new_unchecked(lat, lon);
                prop_assert_eq!(convert(p), p);
            }

            #[test]
            fn test_offset_bounded_inside_region(
                lat in 3.86..53.55_f64,
                lon in 73.66..135.05_f64
            ) {
                let p = GeoPoint::new_unchecked(lat, lon);
                let q = convert(p);

                // The GCJ-02 shift never exceeds a few hundred meters.
                prop_assert!((q.latitude - p.latitude).abs() < 0.02);
                prop_assert!((q.longitude - p.longitude).abs() < 0.02);
                prop_assert!(q.latitude != p.latitude || q.longitude != p.longitude);
            }
        }
    }
}
