//! Containment tests of points and building footprints against a site boundary.

use itertools::Itertools;
use log::{debug, warn};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::geometry::geo_enums::GeoPosition;
use crate::geometry::geo_traits::{CollidesWith, DistanceTo};
use crate::geometry::primitives::{GeoPoint, LocalEdge, LocalPoint};
use crate::geometry::projection;
use crate::metrics;
use crate::util::assertions;

/// Points closer than this to an edge of the boundary (in meters) are on the boundary
pub const BOUNDARY_TOLERANCE_M: f64 = 1e-3;

/// Outcome of validating a footprint against a boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// No errors and every footprint vertex inside (or on) the boundary
    pub is_valid: bool,
    pub outside_vertices: Vec<OutsideVertex>,
    /// Share of footprint vertices inside the boundary, in [0, 100]
    pub compliance_percentage: f64,
    /// Structural problems with the input itself
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutsideVertex {
    /// Index of the vertex in the footprint
    pub index: usize,
    pub vertex: GeoPoint,
    pub message: String,
}

/// Closest point of a polygon's perimeter to some query point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NearestPoint {
    pub point: GeoPoint,
    pub distance_m: f64,
    /// Index of the edge (by start vertex) the point lies on
    pub edge_index: usize,
}

/// A footprint after per-vertex correction, with the reports before and after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootprintCorrection {
    pub footprint: Vec<GeoPoint>,
    pub before: ComplianceReport,
    pub after: ComplianceReport,
    /// Indices of the vertices that were moved onto the boundary
    pub corrected_indices: Vec<usize>,
    /// Set when the corrected footprint is not a simple polygon: crossing or overlapping edges, or a footprint
    /// collapsed onto the boundary (repeated vertices, no area). It is returned as is, repairing it is up to the caller.
    pub self_intersecting: bool,
}

/// Crossing-number test on raw longitude/latitude, O(n).
/// Points exactly on an edge may resolve either way, see [`locate_point`] for a boundary-aware test.
pub fn point_in_polygon(point: &GeoPoint, polygon: &[GeoPoint]) -> bool {
    ray_cast(point.longitude, point.latitude, polygon, |p| {
        (p.longitude, p.latitude)
    })
}

/// Crossing-number test in a local frame
pub fn point_in_ring(point: &LocalPoint, ring: &[LocalPoint]) -> bool {
    ray_cast(point.x, point.y, ring, |p| (p.x, p.y))
}

//https://en.wikipedia.org/wiki/Point_in_polygon#Ray_casting_algorithm
fn ray_cast<T>(x: f64, y: f64, ring: &[T], coords: impl Fn(&T) -> (f64, f64)) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    for (a, b) in ring.iter().circular_tuple_windows::<(_, _)>() {
        let ((x_a, y_a), (x_b, y_b)) = (coords(a), coords(b));
        //half-open interval on y avoids counting shared vertices twice
        if (y_a > y) != (y_b > y) && x < (x_b - x_a) * (y - y_a) / (y_b - y_a) + x_a {
            inside = !inside;
        }
    }
    inside
}

/// Boundary projected around its centroid, reused for all queries against it
struct BoundaryFrame {
    origin: GeoPoint,
    ring: Vec<LocalPoint>,
}

impl BoundaryFrame {
    fn new(boundary: &[GeoPoint]) -> Self {
        let origin = metrics::centroid(boundary);
        BoundaryFrame {
            origin,
            ring: projection::project(boundary, &origin),
        }
    }

    fn locate(&self, point: &GeoPoint) -> GeoPosition {
        locate_in_ring(&projection::project_point(point, &self.origin), &self.ring)
    }
}

/// [`locate_point`] in a local frame
pub fn locate_in_ring(point: &LocalPoint, ring: &[LocalPoint]) -> GeoPosition {
    if ring.len() < 3 {
        GeoPosition::Exterior
    } else if LocalEdge::ring(ring).any(|e| e.distance_to(point) <= BOUNDARY_TOLERANCE_M) {
        GeoPosition::Boundary
    } else if point_in_ring(point, ring) {
        GeoPosition::Interior
    } else {
        GeoPosition::Exterior
    }
}

/// Position of `point` relative to `polygon`: on the boundary when within [`BOUNDARY_TOLERANCE_M`] of an edge,
/// otherwise decided by ray casting. Polygons with fewer than 3 vertices contain nothing.
pub fn locate_point(point: &GeoPoint, polygon: &[GeoPoint]) -> GeoPosition {
    BoundaryFrame::new(polygon).locate(point)
}

/// Checks whether every vertex of `footprint` lies inside (or on) `boundary`.
pub fn validate_footprint_inside_boundary(
    footprint: &[GeoPoint],
    boundary: &[GeoPoint],
) -> ComplianceReport {
    let mut errors = vec![];
    if footprint.len() < 3 {
        errors.push(format!(
            "footprint has {} vertices, at least 3 are required",
            footprint.len()
        ));
    }
    if boundary.len() < 3 {
        errors.push(format!(
            "boundary has {} vertices, at least 3 are required",
            boundary.len()
        ));
    }

    let frame = BoundaryFrame::new(boundary);
    let outside_vertices = footprint
        .iter()
        .enumerate()
        .filter(|(_, v)| !frame.locate(v).is_inside())
        .map(|(index, vertex)| {
            let message = match nearest_point_on_polygon(vertex, boundary) {
                Some(n) if boundary.len() >= 3 => format!(
                    "vertex {index} lies {:.2}m outside the boundary",
                    n.distance_m
                ),
                _ => format!("vertex {index} lies outside the boundary"),
            };
            OutsideVertex {
                index,
                vertex: *vertex,
                message,
            }
        })
        .collect_vec();

    let compliance_percentage = match footprint.is_empty() {
        true => 0.0,
        false => {
            let inside = footprint.len() - outside_vertices.len();
            inside as f64 / footprint.len() as f64 * 100.0
        }
    };

    let report = ComplianceReport {
        is_valid: errors.is_empty() && outside_vertices.is_empty(),
        outside_vertices,
        compliance_percentage,
        errors,
    };
    debug!(
        "[COMPL] {}/{} footprint vertices inside ({:.1}%)",
        footprint.len() - report.outside_vertices.len(),
        footprint.len(),
        report.compliance_percentage
    );
    debug_assert!(assertions::compliance_report_is_consistent(
        &report,
        footprint.len()
    ));
    report
}

/// Closest point to `p` on the segment from `a` to `b`, the projection parameter clamped to [0, 1].
pub fn nearest_point_on_segment(p: &LocalPoint, a: &LocalPoint, b: &LocalPoint) -> LocalPoint {
    LocalEdge::new(*a, *b).closest_point_on_edge(p)
}

/// Closest point to `point` on the perimeter of `polygon`, over all edges (closing edge included).
/// Returns `None` for an empty polygon.
pub fn nearest_point_on_polygon(point: &GeoPoint, polygon: &[GeoPoint]) -> Option<NearestPoint> {
    //projecting around the query point keeps the distortion minimal where it matters
    let ring = projection::project(polygon, point);
    LocalEdge::ring(&ring)
        .enumerate()
        .map(|(i, e)| (i, e.closest_point_on_edge(&LocalPoint::ORIGIN)))
        .min_by_key(|(_, p)| OrderedFloat(p.norm()))
        .map(|(edge_index, p)| NearestPoint {
            point: projection::unproject_point(&p, point),
            distance_m: p.norm(),
            edge_index,
        })
}

/// Moves every footprint vertex outside `boundary` to its nearest point on the boundary.
/// Vertices inside are left untouched. This is a per-vertex correction, not a polygon clip:
/// the result may self-intersect, see [`correct_footprint`].
pub fn clip_footprint_to_boundary(footprint: &[GeoPoint], boundary: &[GeoPoint]) -> Vec<GeoPoint> {
    if boundary.len() < 3 {
        return footprint.to_vec();
    }
    let frame = BoundaryFrame::new(boundary);
    footprint
        .iter()
        .map(|v| match frame.locate(v).is_inside() {
            true => *v,
            false => nearest_point_on_polygon(v, boundary).map_or(*v, |n| n.point),
        })
        .collect()
}

/// [`clip_footprint_to_boundary`] with bookkeeping: reports before and after, the moved vertices and
/// whether the corrected footprint is still a simple polygon.
pub fn correct_footprint(footprint: &[GeoPoint], boundary: &[GeoPoint]) -> FootprintCorrection {
    let before = validate_footprint_inside_boundary(footprint, boundary);
    let corrected = clip_footprint_to_boundary(footprint, boundary);
    let after = validate_footprint_inside_boundary(&corrected, boundary);
    let corrected_indices = match boundary.len() < 3 {
        true => vec![],
        false => before.outside_vertices.iter().map(|o| o.index).collect(),
    };
    let self_intersecting = !is_simple(&corrected);

    debug!(
        "[COMPL] corrected {} vertices, compliance {:.1}% -> {:.1}%",
        corrected_indices.len(),
        before.compliance_percentage,
        after.compliance_percentage
    );
    if self_intersecting {
        warn!("[COMPL] corrected footprint self-intersects");
    }

    FootprintCorrection {
        footprint: corrected,
        before,
        after,
        corrected_indices,
        self_intersecting,
    }
}

/// True if the polygon is a proper simple polygon: at least 3 vertices, all further than
/// [`BOUNDARY_TOLERANCE_M`] apart, a non-vanishing area, no edge folding back onto its neighbour and no
/// two non-adjacent edges crossing, touching or overlapping.
/// A closing vertex equal to the first one is ignored.
pub fn is_simple(polygon: &[GeoPoint]) -> bool {
    let polygon = match polygon.len() > 1 && polygon.first() == polygon.last() {
        true => &polygon[..polygon.len() - 1],
        false => polygon,
    };
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let tol = BOUNDARY_TOLERANCE_M;
    let ring = projection::project(polygon, &metrics::centroid(polygon));
    if ring.iter().tuple_combinations().any(|(p, q)| p.distance(q) <= tol) {
        debug!("[COMPL] polygon has repeated vertices");
        return false;
    }
    if metrics::signed_area(&ring).abs() <= tol * tol {
        debug!("[COMPL] polygon has no area");
        return false;
    }
    let edges = LocalEdge::ring(&ring).collect_vec();

    //consecutive edges may only share their common vertex
    let folds = (0..n).any(|i| {
        let (a, b) = (&edges[i], &edges[(i + 1) % n]);
        a.distance_to(&b.end) <= tol || b.distance_to(&a.start) <= tol
    });
    let touches = |a: &LocalEdge, b: &LocalEdge| {
        a.collides_with(b)
            || [a.start, a.end].iter().any(|p| b.distance_to(p) <= tol)
            || [b.start, b.end].iter().any(|p| a.distance_to(p) <= tol)
    };
    !folds
        && (0..n)
            .tuple_combinations::<(usize, usize)>()
            .filter(|&(i, j)| j != i + 1 && !(i == 0 && j == n - 1))
            .all(|(i, j)| !touches(&edges[i], &edges[j]))
}
