//! Offset polynomials of the GCJ-02 transform.
//!
//! Both functions take `x = lon - 105.0` and `y = lat - 35.0` and return an
//! offset in meters-like units that is later scaled by the local radius of
//! curvature. The coefficients are fixed by the published algorithm and must
//! not be tuned.

use std::f64::consts::PI;

/// Semi-major axis of the Krasovsky 1940 ellipsoid in meters.
pub const SEMI_MAJOR_AXIS: f64 = 6378245.0;

/// First eccentricity squared of the Krasovsky 1940 ellipsoid.
pub const ECCENTRICITY_SQ: f64 = 0.00669342162296594323;

/// Longitude of the polynomial origin.
pub const ORIGIN_LON: f64 = 105.0;

/// Latitude of the polynomial origin.
pub const ORIGIN_LAT: f64 = 35.0;

/// Latitude offset polynomial.
pub fn correction_lat(x: f64, y: f64) -> f64 {
    let mut ret = -100.0 + 2.0 * x + 3.0 * y + 0.2 * y * y + 0.1 * x * y + 0.2 * x.abs().sqrt();
    ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    ret += (20.0 * (y * PI).sin() + 40.0 * (y / 3.0 * PI).sin()) * 2.0 / 3.0;
    ret += (160.0 * (y / 12.0 * PI).sin() + 320.0 * (y * PI / 30.0).sin()) * 2.0 / 3.0;
    ret
}

/// Longitude offset polynomial.
///
/// The square-root term uses 0.1, matching the reference implementations of
/// the algorithm.
pub fn correction_lon(x: f64, y: f64) -> f64 {
    let mut ret = 300.0 + x + 2.0 * y + 0.1 * x * x + 0.1 * x * y + 0.1 * x.abs().sqrt();
    ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    ret += (20.0 * (x * PI).sin() + 40.0 * (x / 3.0 * PI).sin()) * 2.0 / 3.0;
    ret += (150.0 * (x / 12.0 * PI).sin() + 300.0 * (x / 30.0 * PI).sin()) * 2.0 / 3.0;
    ret
}

/// Scale raw polynomial offsets into degrees at the given latitude.
///
/// Returns `(d_lat, d_lon)` in degrees.
pub fn scale_offset(d_lat: f64, d_lon: f64, latitude: f64) -> (f64, f64) {
    let rad_lat = latitude / 180.0 * PI;
    let sin_lat = rad_lat.sin();
    let magic = 1.0 - ECCENTRICITY_SQ * sin_lat * sin_lat;
    let sqrt_magic = magic.sqrt();

    let d_lat = (d_lat * 180.0)
        / ((SEMI_MAJOR_AXIS * (1.0 - ECCENTRICITY_SQ)) / (magic * sqrt_magic) * PI);
    let d_lon = (d_lon * 180.0) / (SEMI_MAJOR_AXIS / sqrt_magic * rad_lat.cos() * PI);

    (d_lat, d_lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polynomials_at_origin() {
        // All sine terms vanish at x = y = 0.
        assert!((correction_lat(0.0, 0.0) - (-100.0)).abs() < 1e-12);
        assert!((correction_lon(0.0, 0.0) - 300.0).abs() < 1e-12);
    }

    #[test]
    fn test_lon_sqrt_term_is_point_one() {
        // At x = 1, y = 0 every sine with an integer multiple of PI is ~0,
        // leaving the polynomial part plus the 1/3 and 1/12, 1/30 harmonics.
        let x: f64 = 1.0;
        let harmonics = (40.0 * (x / 3.0 * PI).sin()) * 2.0 / 3.0
            + (150.0 * (x / 12.0 * PI).sin() + 300.0 * (x / 30.0 * PI).sin()) * 2.0 / 3.0;
        let expected = 300.0 + 1.0 + 0.1 + 0.1 + harmonics;
        assert!(
            (correction_lon(1.0, 0.0) - expected).abs() < 1e-9,
            "Expected {}, got {}",
            expected,
            correction_lon(1.0, 0.0)
        );
    }

    #[test]
    fn test_scale_offset_at_equator() {
        // One unit of offset is roughly one meter: ~9e-6 degrees.
        let (d_lat, d_lon) = scale_offset(1.0, 1.0, 0.0);
        assert!(d_lat > 8.0e-6 && d_lat < 1.0e-5, "d_lat = {}", d_lat);
        assert!(d_lon > 8.0e-6 && d_lon < 1.0e-5, "d_lon = {}", d_lon);
    }
}
