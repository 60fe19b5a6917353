//! Metric facts about a site boundary.
//!
//! All functions accept polygons with any number of vertices. Fewer than 3 vertices is not a polygon:
//! areas and lengths are then 0, centroid and bounds are zero-valued and the edge list is empty.

mod orientation;

#[doc(inline)]
pub use orientation::PrincipalAxis;
#[doc(inline)]
pub use orientation::axis_bearing;
#[doc(inline)]
pub use orientation::principal_axis;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::geometry::primitives::{GeoBounds, GeoPoint, LocalPoint, SiteEdge};
use crate::geometry::projection;
use crate::setback::{self, BuildableArea, SetbackSpec};

/// Derived, read-only snapshot of a site boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteMetrics {
    pub area_m2: f64,
    pub perimeter_m: f64,
    pub centroid: GeoPoint,
    /// Bearing of the principal axis in [0, 180)
    pub orientation_deg: f64,
    pub bounds: GeoBounds,
    pub edges: Vec<SiteEdge>,
    pub vertex_count: usize,
    /// Buildable area after applying the setbacks
    pub setback_polygon: BuildableArea,
}

/// Computes every metric of `polygon`.
/// The buildable area is the averaged directional inset, see [`setback::directional_inset`].
pub fn site_metrics(polygon: &[GeoPoint], setbacks: &SetbackSpec) -> SiteMetrics {
    let orientation_deg = orientation(polygon);
    SiteMetrics {
        area_m2: area(polygon),
        perimeter_m: perimeter(polygon),
        centroid: centroid(polygon),
        orientation_deg,
        bounds: bounds(polygon),
        edges: edges(polygon),
        vertex_count: polygon.len(),
        setback_polygon: setback::directional_inset(polygon, setbacks, orientation_deg),
    }
}

/// Area in m², independent of winding and starting vertex.
/// The vertices are projected around the first vertex to keep the local distortion small.
pub fn area(polygon: &[GeoPoint]) -> f64 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let local = projection::project(polygon, &polygon[0]);
    signed_area(&local).abs()
}

//https://en.wikipedia.org/wiki/Shoelace_formula
//counterclockwise = positive area, clockwise = negative area
pub fn signed_area(points: &[LocalPoint]) -> f64 {
    let mut sigma = 0.0;
    for i in 0..points.len() {
        //next point
        let j = (i + 1) % points.len();

        let (x_i, y_i) = points[i].into();
        let (x_j, y_j) = points[j].into();

        sigma += (y_i + y_j) * (x_i - x_j)
    }

    0.5 * sigma
}

/// Sum of the great-circle lengths of all edges, closing edge included.
pub fn perimeter(polygon: &[GeoPoint]) -> f64 {
    edges(polygon).iter().map(|e| e.length_m).sum()
}

/// Arithmetic mean of the vertices
pub fn centroid(polygon: &[GeoPoint]) -> GeoPoint {
    if polygon.len() < 3 {
        return GeoPoint::default();
    }
    let n = polygon.len() as f64;
    let (lat, lng) = polygon.iter().fold((0.0, 0.0), |(lat, lng), p| {
        (lat + p.latitude, lng + p.longitude)
    });
    GeoPoint::new(lat / n, lng / n)
}

pub fn bounds(polygon: &[GeoPoint]) -> GeoBounds {
    match polygon.len() < 3 {
        true => GeoBounds::default(),
        false => GeoBounds::from_points(polygon),
    }
}

/// One [`SiteEdge`] per side, the last one running from the final vertex back to the first.
pub fn edges(polygon: &[GeoPoint]) -> Vec<SiteEdge> {
    if polygon.len() < 3 {
        return vec![];
    }
    polygon
        .iter()
        .circular_tuple_windows::<(_, _)>()
        .enumerate()
        .map(|(i, (start, end))| SiteEdge::new(i, *start, *end))
        .collect()
}

/// Longest edge of the polygon, the first one in case of a tie.
pub fn longest_edge(polygon: &[GeoPoint]) -> Option<SiteEdge> {
    edges(polygon)
        .into_iter()
        .reduce(|best, e| if e.length_m > best.length_m { e } else { best })
}

/// Compass bearing in [0, 180) of the polygon's principal axis, 0° for degenerate input.
///
/// The vertices are projected around the centroid and the major eigenvector of their covariance
/// matrix is taken as the axis, see [`principal_axis`].
/// Near-circular or near-square polygons have no stable principal axis: the result is valid but
/// may flip under tiny perturbations of the vertices. This is a property of the shape, not an error.
pub fn orientation(polygon: &[GeoPoint]) -> f64 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let local = projection::project(polygon, &centroid(polygon));
    principal_axis(&local).bearing_deg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::projection::{METERS_PER_DEG_LAT, METERS_PER_DEG_LNG};
    use float_cmp::approx_eq;

    const LAT: f64 = 48.8566;
    const LNG: f64 = 2.3522;

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
    fn ten_meter_square_area() {
        let a = area(&rectangle(10.0, 10.0));
        assert!((a - 100.0).abs() / 100.0 < 0.02, "area {a}");
    }

    #[test]
    fn area_invariant_under_rotation_and_reversal() {
        let poly = vec![
            offset(0.0, 0.0),
            offset(30.0, 2.0),
            offset(34.0, 25.0),
            offset(12.0, 31.0),
            offset(-3.0, 14.0),
        ];
        let reference = area(&poly);
        assert!(reference > 0.0);
        for k in 0..poly.len() {
            let mut rotated = poly.clone();
            rotated.rotate_left(k);
            assert!(approx_eq!(f64, area(&rotated), reference, epsilon = 1e-6));
            rotated.reverse();
            assert!(approx_eq!(f64, area(&rotated), reference, epsilon = 1e-6));
        }
    }

    #[test]
    fn perimeter_and_edges() {
        let poly = rectangle(20.0, 10.0);
        let p = perimeter(&poly);
        assert!((p - 60.0).abs() < 0.6, "perimeter {p}");

        let e = edges(&poly);
        assert_eq!(e.len(), 4);
        assert_eq!(e[3].start, poly[3]);
        assert_eq!(e[3].end, poly[0]);
        assert_eq!(e.iter().map(|e| e.index).collect_vec(), vec![0, 1, 2, 3]);
        assert_eq!(longest_edge(&poly).map(|e| e.index), Some(0));
    }

    #[test]
    fn centroid_and_bounds() {
        let poly = rectangle(20.0, 10.0);
        let c = centroid(&poly);
        let center = offset(10.0, 5.0);
        assert!(projection::haversine_distance(&c, &center) < 1e-3);

        let b = bounds(&poly);
        assert_eq!(b.south, LAT);
        assert_eq!(b.west, LNG);
        assert!(b.north > b.south && b.east > b.west);
        assert!(b.contains(&c));
    }

    #[test]
    fn orientation_of_elongated_sites() {
        let east_west = rectangle(60.0, 15.0);
        assert!(approx_eq!(f64, orientation(&east_west), 90.0, epsilon = 1e-3));
        let north_south = rectangle(15.0, 60.0);
        let o = orientation(&north_south);
        assert!(o < 1e-3 || o > 180.0 - 1e-3, "orientation {o}");
    }

    #[test]
    fn degenerate_polygons_yield_sentinels() {
        for poly in [vec![], vec![offset(0.0, 0.0)], vec![offset(0.0, 0.0), offset(5.0, 5.0)]] {
            assert_eq!(area(&poly), 0.0);
            assert_eq!(perimeter(&poly), 0.0);
            assert_eq!(centroid(&poly), GeoPoint::default());
            assert_eq!(bounds(&poly), GeoBounds::default());
            assert_eq!(orientation(&poly), 0.0);
            assert!(edges(&poly).is_empty());
        }
    }

    #[test]
    fn site_metrics_snapshot() {
        let poly = rectangle(40.0, 20.0);
        let m = site_metrics(&poly, &SetbackSpec::uniform(2.0));
        assert_eq!(m.vertex_count, 4);
        assert_eq!(m.edges.len(), 4);
        assert!((m.area_m2 - 800.0).abs() < 1.0);
        assert_eq!(m.setback_polygon.points.len(), 4);
        assert!(m.setback_polygon.area_m2() < m.area_m2);
    }
}
