//! Spherical earth math for leg geometry and label placement.

use crate::models::{GeoPos, ScreenPoint};
use std::f64::consts::{FRAC_PI_4, PI};

/// Mean earth radius used for all great circle and rhumb line math.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

pub const METERS_PER_NM: f64 = 1852.0;

/// Calculate distance between two points in meters using Haversine formula.
///
/// This is the standard formula for calculating great-circle distance
/// between two points on a sphere given their latitudes and longitudes.
pub fn haversine_distance(from: GeoPos, to: GeoPos) -> f64 {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let dphi = (to.lat - from.lat).to_radians();
    let dlambda = (to.lon - from.lon).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Great circle distance in nautical miles.
pub fn distance_nm(from: GeoPos, to: GeoPos) -> f64 {
    haversine_distance(from, to) / METERS_PER_NM
}

/// Normalize a course to `[0, 360)`.
pub fn normalize_course(course_deg: f64) -> f64 {
    let course = course_deg.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if course >= 360.0 {
        0.0
    } else {
        course
    }
}

/// Initial great circle bearing from `from` to `to` in degrees, 0 = north.
pub fn initial_bearing(from: GeoPos, to: GeoPos) -> f64 {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let delta_lambda = (to.lon - from.lon).to_radians();

    let x = delta_lambda.sin() * phi2.cos();
    let y = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    normalize_course(x.atan2(y).to_degrees())
}

/// Great circle bearing on arrival at `to` in degrees.
pub fn final_bearing(from: GeoPos, to: GeoPos) -> f64 {
    normalize_course(initial_bearing(to, from) + 180.0)
}

/// Circular mean of two courses.
///
/// Plain averaging breaks across north (350 and 10 would give 180).
/// Opposite courses have no defined mean and fall back to the arithmetic one.
pub fn mean_course(a_deg: f64, b_deg: f64) -> f64 {
    let (sa, ca) = a_deg.to_radians().sin_cos();
    let (sb, cb) = b_deg.to_radians().sin_cos();
    let (s, c) = (sa + sb, ca + cb);
    if s.abs() < 1e-12 && c.abs() < 1e-12 {
        return normalize_course((a_deg + b_deg) / 2.0);
    }
    normalize_course(s.atan2(c).to_degrees())
}

/// Point on the great circle between `from` and `to`.
///
/// `fraction` 0 returns `from`, 1 returns `to`.
pub fn interpolate(from: GeoPos, to: GeoPos, fraction: f64) -> GeoPos {
    let phi1 = from.lat.to_radians();
    let lambda1 = from.lon.to_radians();
    let phi2 = to.lat.to_radians();
    let lambda2 = to.lon.to_radians();

    let angular_distance = haversine_distance(from, to) / EARTH_RADIUS_M;
    let sin_d = angular_distance.sin();
    if sin_d.abs() <= f64::EPSILON {
        // Same or antipodal points, the path is undefined
        return from;
    }

    let a = ((1.0 - fraction) * angular_distance).sin() / sin_d;
    let b = (fraction * angular_distance).sin() / sin_d;

    let x = a * phi1.cos() * lambda1.cos() + b * phi2.cos() * lambda2.cos();
    let y = a * phi1.cos() * lambda1.sin() + b * phi2.cos() * lambda2.sin();
    let z = a * phi1.sin() + b * phi2.sin();

    let lat = z.atan2((x * x + y * y).sqrt());
    let lon = y.atan2(x);
    GeoPos::new(lon.to_degrees(), lat.to_degrees())
}

/// Difference in longitude in radians, taking the short way around.
fn delta_lambda(from: GeoPos, to: GeoPos) -> f64 {
    let mut dl = (to.lon - from.lon).to_radians();
    if dl.abs() > PI {
        dl = if dl > 0.0 { -(2.0 * PI - dl) } else { 2.0 * PI + dl };
    }
    dl
}

/// Projected latitude difference used by the rhumb line formulas.
fn delta_psi(from: GeoPos, to: GeoPos) -> f64 {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    ((FRAC_PI_4 + phi2 / 2.0).tan() / (FRAC_PI_4 + phi1 / 2.0).tan()).ln()
}

/// Constant true course from `from` to `to` in degrees.
pub fn rhumb_course(from: GeoPos, to: GeoPos) -> f64 {
    let dl = delta_lambda(from, to);
    let dpsi = delta_psi(from, to);
    normalize_course(dl.atan2(dpsi).to_degrees())
}

/// Offset a position by distance and bearing.
///
/// # Arguments
/// * `pos` - Starting position
/// * `distance_m` - Distance in meters
/// * `bearing_deg` - True bearing in degrees (0 = north, 90 = east)
pub fn offset_by_bearing(pos: GeoPos, distance_m: f64, bearing_deg: f64) -> GeoPos {
    if distance_m.abs() <= f64::EPSILON {
        return pos;
    }

    let lat1 = pos.lat.to_radians();
    let lon1 = pos.lon.to_radians();
    let bearing_rad = bearing_deg.to_radians();
    let angular_distance = distance_m / EARTH_RADIUS_M;

    let sin_lat1 = lat1.sin();
    let cos_lat1 = lat1.cos();
    let sin_ad = angular_distance.sin();
    let cos_ad = angular_distance.cos();

    let sin_lat2 = sin_lat1 * cos_ad + cos_lat1 * sin_ad * bearing_rad.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();

    let y = bearing_rad.sin() * sin_ad * cos_lat1;
    let x = cos_ad - sin_lat1 * sin_lat2;
    let mut lon2 = lon1 + y.atan2(x);
    lon2 = (lon2 + PI).rem_euclid(2.0 * PI) - PI;

    GeoPos::new(lon2.to_degrees(), lat2.to_degrees())
}

/// Euclidean distance between two screen points in pixels.
pub fn screen_distance(p1: ScreenPoint, p2: ScreenPoint) -> f64 {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    (dx * dx + dy * dy).sqrt()
}

/// Angle of the screen line from `p1` to `p2`, clockwise from the x axis.
pub fn screen_angle(p1: ScreenPoint, p2: ScreenPoint) -> f64 {
    (p2.y - p1.y).atan2(p2.x - p1.x).to_degrees()
}
