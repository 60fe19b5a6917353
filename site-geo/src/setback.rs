//! Buildable area of a site: the boundary pulled inwards by its setbacks.
//!
//! The default ([`directional_inset`]) is an approximation. The four directional distances are averaged and
//! every vertex moves towards the centroid by that amount ([`uniform_inset`]); edges are not offset individually.
//! A per-edge offset exists as an explicit opt-in ([`per_edge_inset`], [`SetbackMode::PerEdge`]).

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::compliance;
use crate::geometry::primitives::{GeoPoint, LocalEdge, LocalLine, LocalPoint};
use crate::geometry::projection;
use crate::metrics;
use crate::util::{FPA, SetbackMode};

/// Fraction of a vertex's distance to the centroid it may travel at most, prevents collapse of small sites
pub const MAX_INSET_FRACTION: f64 = 0.9;

/// Required clearance between the site boundary and any building, per side, in meters.
/// Sides are named as seen from inside the site looking out through the front.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
#[serde(default)]
pub struct SetbackSpec {
    pub front: f64,
    pub rear: f64,
    pub side_left: f64,
    pub side_right: f64,
}

impl SetbackSpec {
    pub fn uniform(distance_m: f64) -> Self {
        SetbackSpec {
            front: distance_m,
            rear: distance_m,
            side_left: distance_m,
            side_right: distance_m,
        }
    }

    /// Arithmetic mean of the four distances, negative (or NaN) ones counting as 0
    pub fn mean(&self) -> f64 {
        [self.front, self.rear, self.side_left, self.side_right]
            .iter()
            .map(|d| non_negative(*d))
            .sum::<f64>()
            / 4.0
    }

    /// Distance of the side an edge with the given outward bearing faces, relative to `front_bearing_deg`
    pub fn for_outward_bearing(&self, outward_bearing_deg: f64, front_bearing_deg: f64) -> f64 {
        //signed angle in (-180, 180], positive = clockwise from the front
        let rel = (outward_bearing_deg - front_bearing_deg + 180.0).rem_euclid(360.0) - 180.0;
        let d = match rel.abs() {
            a if a <= 45.0 => self.front,
            a if a >= 135.0 => self.rear,
            _ if rel > 0.0 => self.side_right,
            _ => self.side_left,
        };
        non_negative(d)
    }
}

fn non_negative(d: f64) -> f64 {
    if d > 0.0 { d } else { 0.0 }
}

/// Buildable area in the local frame of `origin` (the centroid of the boundary it was derived from).
/// Empty when derived from a boundary with fewer than 3 vertices.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct BuildableArea {
    pub origin: GeoPoint,
    pub points: Vec<LocalPoint>,
}

impl BuildableArea {
    fn empty() -> Self {
        BuildableArea::default()
    }

    pub fn is_empty(&self) -> bool {
        self.points.len() < 3
    }

    pub fn area_m2(&self) -> f64 {
        match self.is_empty() {
            true => 0.0,
            false => metrics::signed_area(&self.points).abs(),
        }
    }

    /// The buildable area in geographic coordinates
    pub fn to_geo(&self) -> Vec<GeoPoint> {
        projection::unproject(&self.points, &self.origin)
    }
}

/// Moves every vertex towards the centroid by `distance_m`, capped at [`MAX_INSET_FRACTION`] of
/// the vertex's own distance to the centroid.
///
/// For convex (or centroid-star-shaped) boundaries the result lies inside the boundary and,
/// for `distance_m > 0`, has a strictly smaller area.
pub fn uniform_inset(polygon: &[GeoPoint], distance_m: f64) -> BuildableArea {
    if polygon.len() < 3 {
        return BuildableArea::empty();
    }
    let origin = metrics::centroid(polygon);
    let local = projection::project(polygon, &origin);
    BuildableArea {
        origin,
        points: inset_towards_centroid(&local, non_negative(distance_m)),
    }
}

fn inset_towards_centroid(points: &[LocalPoint], distance_m: f64) -> Vec<LocalPoint> {
    let c = LocalPoint::mean(points);
    points
        .iter()
        .map(|p| {
            let dist = p.distance(&c);
            if dist == 0.0 {
                return *p;
            }
            let step = f64::min(distance_m, MAX_INSET_FRACTION * dist);
            p.lerp(&c, step / dist)
        })
        .collect()
}

/// Directional setbacks resolved to their mean and applied with [`uniform_inset`].
///
/// `orientation_deg` does not influence the result: the edges are not offset by their own directional distance.
/// Use [`per_edge_inset`] for that.
pub fn directional_inset(
    polygon: &[GeoPoint],
    setbacks: &SetbackSpec,
    orientation_deg: f64,
) -> BuildableArea {
    let mean = setbacks.mean();
    debug!("[SETBACK] averaged inset of {mean:.2}m (orientation {orientation_deg:.1}° not applied per edge)");
    uniform_inset(polygon, mean)
}

/// Offsets every edge inwards by the setback of the side it faces and intersects consecutive offset lines.
///
/// Edge sides are classified by their outward normal relative to `front_bearing_deg`
/// (within 45° = front, beyond 135° = rear, otherwise left or right side).
/// Intended for convex boundaries. If the offset collapses the polygon (winding flips, area vanishes or a
/// vertex ends up more than [`compliance::BOUNDARY_TOLERANCE_M`] outside the boundary) the result falls back to
/// [`directional_inset`]. Vertices of zero setback sides stay on the boundary and are accepted.
pub fn per_edge_inset(
    polygon: &[GeoPoint],
    setbacks: &SetbackSpec,
    front_bearing_deg: f64,
) -> BuildableArea {
    if polygon.len() < 3 {
        return BuildableArea::empty();
    }
    let origin = metrics::centroid(polygon);
    let mut local = projection::project(polygon, &origin);
    local.dedup();
    if local.len() > 1 && local.first() == local.last() {
        local.pop();
    }

    let boundary_area = metrics::signed_area(&local);
    let offset = match local.len() >= 3 && !FPA(boundary_area).is_zero() {
        true => offset_edges(&local, boundary_area > 0.0, setbacks, front_bearing_deg),
        false => None,
    };

    match offset {
        Some(points)
            if metrics::signed_area(&points) * boundary_area > 0.0
                && points.iter().all(|p| compliance::locate_in_ring(p, &local).is_inside()) =>
        {
            BuildableArea { origin, points }
        }
        _ => {
            warn!("[SETBACK] per-edge inset collapsed the boundary, falling back to the averaged inset");
            directional_inset(polygon, setbacks, front_bearing_deg)
        }
    }
}

fn offset_edges(
    points: &[LocalPoint],
    ccw: bool,
    setbacks: &SetbackSpec,
    front_bearing_deg: f64,
) -> Option<Vec<LocalPoint>> {
    //interior lies on the left of each edge for counterclockwise rings
    let inward_sign = if ccw { 1.0 } else { -1.0 };
    let lines = LocalEdge::ring(points)
        .map(|e| {
            let line = LocalLine::from_edge(&e)?;
            let (dx, dy) = line.dir;
            let outward_bearing = projection::local_bearing(dy * inward_sign, -dx * inward_sign);
            let d = setbacks.for_outward_bearing(outward_bearing, front_bearing_deg);
            Some(line.shifted_left(inward_sign * d))
        })
        .collect::<Option<Vec<_>>>()?;

    let n = points.len();
    let offset = (0..n)
        .map(|i| {
            let (prev, next) = (&lines[(i + n - 1) % n], &lines[i]);
            //(nearly) collinear consecutive edges: the offset vertex lies on the next line
            prev.intersection(next)
                .unwrap_or_else(|| next.project(&points[i]))
        })
        .collect();
    Some(offset)
}

/// Buildable area for the given [`SetbackMode`].
/// `bearing_deg` is the orientation passed to [`directional_inset`], or the front bearing for [`per_edge_inset`].
pub fn buildable_area(
    polygon: &[GeoPoint],
    setbacks: &SetbackSpec,
    bearing_deg: f64,
    mode: SetbackMode,
) -> BuildableArea {
    match mode {
        SetbackMode::Averaged => directional_inset(polygon, setbacks, bearing_deg),
        SetbackMode::PerEdge => per_edge_inset(polygon, setbacks, bearing_deg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::geo_enums::GeoPosition;
    use crate::geometry::projection::{METERS_PER_DEG_LAT, METERS_PER_DEG_LNG};
    use crate::util::assertions;
    use float_cmp::approx_eq;

    const LAT: f64 = -33.8688;
    const LNG: f64 = 151.2093;

    fn offset(east_m: f64, north_m: f64) -> GeoPoint {
        GeoPoint::new(
            LAT + north_m / METERS_PER_DEG_LAT,
            LNG + east_m / (METERS_PER_DEG_LNG * LAT.to_radians().cos()),
        )
    }

    fn rectangle(width: f64, height: f64) -> Vec<GeoPoint> {
        vec![
            offset(0.0, 0.0),
            offset(width, 0.0),
            offset(width, height),
            offset(0.0, height),
        ]
    }

    #[test]
    fn uniform_inset_shrinks_inside_boundary() {
        let site = rectangle(20.0, 20.0);
        let inset = uniform_inset(&site, 2.0);
        assert_eq!(inset.points.len(), 4);
        assert!(inset.area_m2() < metrics::area(&site));
        let boundary = projection::project(&site, &inset.origin);
        assert!(assertions::inset_within_boundary(&boundary, &inset.points));

        //each corner travels exactly 2m along its diagonal
        for (p, q) in boundary.iter().zip(inset.points.iter()) {
            assert!(approx_eq!(f64, p.distance(q), 2.0, epsilon = 1e-9));
        }
    }

    #[test]
    fn uniform_inset_is_capped() {
        let site = rectangle(20.0, 20.0);
        let inset = uniform_inset(&site, 1000.0);
        let ratio = inset.area_m2() / metrics::area(&site);
        assert!(approx_eq!(f64, ratio, 0.01, epsilon = 1e-4), "ratio {ratio}");
    }

    #[test]
    fn zero_and_negative_setbacks_keep_the_boundary() {
        let site = rectangle(12.0, 8.0);
        for d in [0.0, -3.0] {
            let inset = uniform_inset(&site, d);
            let boundary = projection::project(&site, &inset.origin);
            assert_eq!(inset.points, boundary);
        }
    }

    #[test]
    fn directional_inset_uses_the_mean() {
        let site = rectangle(30.0, 18.0);
        let setbacks = SetbackSpec {
            front: 6.0,
            rear: 2.0,
            side_left: 1.0,
            side_right: 3.0,
        };
        assert_eq!(setbacks.mean(), 3.0);
        assert_eq!(directional_inset(&site, &setbacks, 42.0), uniform_inset(&site, 3.0));
    }

    #[test]
    fn degenerate_boundary_has_empty_buildable_area() {
        let inset = uniform_inset(&rectangle(10.0, 10.0)[..2], 1.0);
        assert!(inset.is_empty());
        assert_eq!(inset.area_m2(), 0.0);
        assert!(inset.to_geo().is_empty());
    }

    #[test]
    fn side_classification() {
        let setbacks = SetbackSpec {
            front: 6.0,
            rear: 3.0,
            side_left: 1.0,
            side_right: 2.0,
        };
        assert_eq!(setbacks.for_outward_bearing(180.0, 180.0), 6.0);
        assert_eq!(setbacks.for_outward_bearing(0.0, 180.0), 3.0);
        assert_eq!(setbacks.for_outward_bearing(270.0, 180.0), 2.0);
        assert_eq!(setbacks.for_outward_bearing(90.0, 180.0), 1.0);
        assert_eq!(setbacks.for_outward_bearing(10.0, 350.0), 6.0);
    }

    #[test]
    fn per_edge_inset_offsets_each_side() {
        //south-facing front, west is the right-hand side when looking out through the front
        let site = rectangle(40.0, 20.0);
        let setbacks = SetbackSpec {
            front: 6.0,
            rear: 3.0,
            side_left: 1.0,
            side_right: 2.0,
        };
        for poly in [site.clone(), site.iter().rev().copied().collect()] {
            let inset = per_edge_inset(&poly, &setbacks, 180.0);
            assert_eq!(inset.points.len(), 4);
            let a = inset.area_m2();
            assert!((a - 37.0 * 11.0).abs() < 0.5, "area {a}");

            let boundary = projection::project(&poly, &inset.origin);
            let min_y = boundary.iter().map(|p| p.y).fold(f64::MAX, f64::min);
            let min_x = boundary.iter().map(|p| p.x).fold(f64::MAX, f64::min);
            assert!(inset.points.iter().all(|p| p.y >= min_y + 6.0 - 1e-6));
            assert!(inset.points.iter().all(|p| p.x >= min_x + 2.0 - 1e-6));
        }
    }

    #[test]
    fn per_edge_inset_falls_back_on_collapse() {
        let site = rectangle(10.0, 10.0);
        let setbacks = SetbackSpec {
            front: 8.0,
            rear: 8.0,
            side_left: 0.0,
            side_right: 0.0,
        };
        assert_eq!(
            per_edge_inset(&site, &setbacks, 180.0),
            directional_inset(&site, &setbacks, 180.0)
        );
        assert_eq!(
            buildable_area(&site, &setbacks, 180.0, SetbackMode::PerEdge),
            directional_inset(&site, &setbacks, 180.0)
        );
    }

    #[test]
    fn zero_side_setbacks_keep_the_per_edge_inset() {
        let site = rectangle(40.0, 20.0);
        let setbacks = SetbackSpec {
            front: 6.0,
            rear: 0.0,
            side_left: 0.0,
            side_right: 0.0,
        };
        let inset = per_edge_inset(&site, &setbacks, 180.0);
        assert_eq!(inset.points.len(), 4);
        assert_ne!(inset, directional_inset(&site, &setbacks, 180.0));
        let a = inset.area_m2();
        assert!((a - 560.0).abs() < 0.5, "area {a}");

        let boundary = projection::project(&site, &inset.origin);
        assert!(assertions::inset_within_boundary(&boundary, &inset.points));
        let on_boundary = inset
            .points
            .iter()
            .filter(|p| compliance::locate_in_ring(p, &boundary) == GeoPosition::Boundary)
            .count();
        assert_eq!(on_boundary, 4);
    }
}
