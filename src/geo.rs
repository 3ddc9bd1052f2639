//! ECEF <-> WGS84 geodetic conversion, great-circle distance and bearing.

use crate::constants::{EARTH_RADIUS_KM, ECEF_LAT_MAX_ITERATIONS, ECEF_LAT_TOLERANCE_RAD, WGS84_A, WGS84_E2};

/// A geodetic position, WGS84 latitude/longitude in degrees and altitude
/// in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticPosition {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub alt_m: f64,
}

/// Converts an ECEF position (metres) to WGS84 geodetic coordinates via
/// fixed-point iteration on latitude, matching spec.md §4.E exactly:
/// semi-major axis 6 378 137 m, first-eccentricity-squared
/// 6.69437999014e-3, iterate to 1e-11 rad.
pub fn ecef_to_geodetic(x: f64, y: f64, z: f64) -> GeodeticPosition {
    let lon = y.atan2(x);
    let p = (x * x + y * y).sqrt();

    if p < 1e-9 {
        // On the polar axis: longitude is undefined, altitude is |z| - a*(1-f).
        let lat = if z >= 0.0 { 90.0 } else { -90.0 };
        let b = WGS84_A * (1.0 - WGS84_E2).sqrt();
        return GeodeticPosition {
            lat_deg: lat,
            lon_deg: 0.0,
            alt_m: z.abs() - b,
        };
    }

    let mut lat = (z / p).atan2(1.0 - WGS84_E2);
    for _ in 0..ECEF_LAT_MAX_ITERATIONS {
        let sin_lat = lat.sin();
        let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        let next_lat = (z + WGS84_E2 * n * sin_lat).atan2(p);
        if (next_lat - lat).abs() < ECEF_LAT_TOLERANCE_RAD {
            lat = next_lat;
            break;
        }
        lat = next_lat;
    }

    let sin_lat = lat.sin();
    let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    let alt = p / lat.cos() - n;

    GeodeticPosition {
        lat_deg: lat.to_degrees(),
        lon_deg: lon.to_degrees(),
        alt_m: alt,
    }
}

/// Converts WGS84 geodetic coordinates (degrees, metres) to ECEF,
/// used only by the round-trip test.
#[cfg(test)]
fn geodetic_to_ecef(lat_deg: f64, lon_deg: f64, alt_m: f64) -> (f64, f64, f64) {
    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();
    let sin_lat = lat.sin();
    let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    let x = (n + alt_m) * lat.cos() * lon.cos();
    let y = (n + alt_m) * lat.cos() * lon.sin();
    let z = (n * (1.0 - WGS84_E2) + alt_m) * sin_lat;
    (x, y, z)
}

/// Great-circle distance between two WGS84 points, kilometres.
pub fn haversine_km(lat1_deg: f64, lon1_deg: f64, lat2_deg: f64, lon2_deg: f64) -> f64 {
    let lat1 = lat1_deg.to_radians();
    let lat2 = lat2_deg.to_radians();
    let dlat = (lat2_deg - lat1_deg).to_radians();
    let dlon = (lon2_deg - lon1_deg).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    EARTH_RADIUS_KM * c
}

/// Initial bearing (forward azimuth) from point 1 to point 2, degrees in
/// `[0, 360)`.
pub fn initial_bearing_deg(lat1_deg: f64, lon1_deg: f64, lat2_deg: f64, lon2_deg: f64) -> f64 {
    let lat1 = lat1_deg.to_radians();
    let lat2 = lat2_deg.to_radians();
    let dlon = (lon2_deg - lon1_deg).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    let bearing = y.atan2(x).to_degrees();
    (bearing + 360.0) % 360.0
}
