//! Conversion between geographic coordinates and a local planar frame in meters.
//!
//! The local frame is an equirectangular approximation anchored at a caller-chosen origin:
//! longitude deltas are scaled by [`METERS_PER_DEG_LNG`] × cos(origin latitude), latitude deltas by
//! [`METERS_PER_DEG_LAT`]. This is not geodesically exact. For site-scale extents (< 5 km) at
//! inhabited latitudes the error stays below ~0.5 %, which is all the engine needs.
//! Great-circle helpers ([`haversine_distance`], [`bearing`], [`destination`]) use a spherical Earth.

use crate::geometry::primitives::{GeoPoint, LocalPoint};

/// Meters per degree of longitude at the equator
pub const METERS_PER_DEG_LNG: f64 = 111_320.0;
/// Meters per degree of latitude
pub const METERS_PER_DEG_LAT: f64 = 110_540.0;
/// Mean Earth radius used by the spherical formulas
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
/// Floor for cos(latitude), keeps the longitude scale from collapsing at the poles
const MIN_COS_LAT: f64 = 1e-6;

fn lng_scale(origin: &GeoPoint) -> f64 {
    METERS_PER_DEG_LNG * origin.latitude.to_radians().cos().max(MIN_COS_LAT)
}

pub fn project_point(point: &GeoPoint, origin: &GeoPoint) -> LocalPoint {
    LocalPoint::new(
        (point.longitude - origin.longitude) * lng_scale(origin),
        (point.latitude - origin.latitude) * METERS_PER_DEG_LAT,
    )
}

pub fn unproject_point(point: &LocalPoint, origin: &GeoPoint) -> GeoPoint {
    GeoPoint::new(
        origin.latitude + point.y / METERS_PER_DEG_LAT,
        origin.longitude + point.x / lng_scale(origin),
    )
}

/// Projects every vertex into the local frame anchored at `origin`.
pub fn project(polygon: &[GeoPoint], origin: &GeoPoint) -> Vec<LocalPoint> {
    polygon.iter().map(|p| project_point(p, origin)).collect()
}

/// Inverse of [`project`] for the same `origin`.
pub fn unproject(points: &[LocalPoint], origin: &GeoPoint) -> Vec<GeoPoint> {
    points.iter().map(|p| unproject_point(p, origin)).collect()
}

/// Great-circle distance in meters
pub fn haversine_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let (phi_a, phi_b) = (a.latitude.to_radians(), b.latitude.to_radians());
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi_a.cos() * phi_b.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).max(0.0).sqrt())
}

/// Initial bearing from `a` towards `b` in degrees, 0° = north, clockwise, in [0, 360).
/// Identical points yield 0°.
pub fn bearing(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let (phi_a, phi_b) = (a.latitude.to_radians(), b.latitude.to_radians());
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let y = d_lambda.sin() * phi_b.cos();
    let x = phi_a.cos() * phi_b.sin() - phi_a.sin() * phi_b.cos() * d_lambda.cos();
    normalize_bearing(y.atan2(x).to_degrees())
}

/// Point reached by travelling `distance_m` from `origin` along the initial bearing `bearing_deg`.
pub fn destination(origin: &GeoPoint, distance_m: f64, bearing_deg: f64) -> GeoPoint {
    let delta = distance_m / EARTH_RADIUS_M;
    let theta = bearing_deg.to_radians();
    let phi_1 = origin.latitude.to_radians();
    let lambda_1 = origin.longitude.to_radians();

    let sin_phi_2 = phi_1.sin() * delta.cos() + phi_1.cos() * delta.sin() * theta.cos();
    let phi_2 = sin_phi_2.clamp(-1.0, 1.0).asin();
    let lambda_2 = lambda_1
        + (theta.sin() * delta.sin() * phi_1.cos()).atan2(delta.cos() - phi_1.sin() * sin_phi_2);

    GeoPoint::new(
        phi_2.to_degrees(),
        (lambda_2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0,
    )
}

/// Wraps any angle in degrees into [0, 360)
pub fn normalize_bearing(deg: f64) -> f64 {
    let b = deg.rem_euclid(360.0);
    //rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if b >= 360.0 { 0.0 } else { b }
}

/// Compass bearing (0° = north, clockwise) of a direction vector in the local frame
pub fn local_bearing(dx: f64, dy: f64) -> f64 {
    normalize_bearing(dx.atan2(dy).to_degrees())
}

/// Smallest absolute difference between two bearings, in [0, 180]
pub fn bearing_difference(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    if d > 180.0 { 360.0 - d } else { d }
}
