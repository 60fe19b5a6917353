//! Noise reduction for digitised site boundaries.
//!
//! [`simplify_polygon`] removes vertices with a Douglas-Peucker pass over the closed ring and then
//! straightens near-right corners with [`preserve_right_angles`].

use itertools::Itertools;
use log::{debug, warn};
use ordered_float::OrderedFloat;

use crate::geometry::primitives::{GeoPoint, LocalEdge, LocalLine, LocalPoint};
use crate::geometry::projection;
use crate::metrics;
use crate::util::{SimplifyConfig, assertions};

/// Meters per degree used to turn the tolerance into degrees
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Corners closer than this (in degrees) to a right angle are considered exact
const RIGHT_ANGLE_EPSILON_DEG: f64 = 1e-6;

/// Simplifies a site boundary.
///
/// The ring is opened at vertex 0 and closed with a duplicate of it, simplified with [`douglas_peucker`]
/// (tolerance converted from meters to degrees) and the duplicate is dropped again.
/// Right-angle snapping follows when [`SimplifyConfig::right_angle_threshold_deg`] is set.
///
/// Never returns fewer than 3 vertices for a valid polygon: if the simplification would,
/// the original boundary is returned unchanged. Input with fewer than 3 vertices is returned as is.
pub fn simplify_polygon(polygon: &[GeoPoint], config: &SimplifyConfig) -> Vec<GeoPoint> {
    if polygon.len() < 3 {
        return polygon.to_vec();
    }
    let tolerance_deg = config.tolerance_m.max(0.0) / METERS_PER_DEGREE;

    let closed = polygon.iter().chain(polygon.first()).copied().collect_vec();
    let mut simplified = douglas_peucker(&closed, tolerance_deg);
    simplified.pop();

    if simplified.len() < 3 {
        warn!(
            "[SIMPL] simplification left {} vertices, keeping the original {}",
            simplified.len(),
            polygon.len()
        );
        return polygon.to_vec();
    }

    let simplified = match config.right_angle_threshold_deg {
        Some(threshold_deg) => preserve_right_angles(&simplified, threshold_deg),
        None => simplified,
    };

    debug!(
        "[SIMPL] {} -> {} vertices (tolerance {}m)",
        polygon.len(),
        simplified.len(),
        config.tolerance_m
    );
    debug_assert!(assertions::simplification_is_valid(polygon, &simplified));
    simplified
}

/// Ramer-Douglas-Peucker on an open polyline in longitude/latitude space.
/// Both endpoints are always kept; intermediate vertices are kept when they lie further than
/// `tolerance_deg` from the chord of the span they belong to.
pub fn douglas_peucker(points: &[GeoPoint], tolerance_deg: f64) -> Vec<GeoPoint> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;
    dp_recursive(points, tolerance_deg, 0, points.len() - 1, &mut keep);

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

fn dp_recursive(points: &[GeoPoint], tolerance: f64, start: usize, end: usize, keep: &mut [bool]) {
    if end <= start + 1 {
        return;
    }
    let (a, b) = (&points[start], &points[end]);
    let farthest = (start + 1..end)
        .map(|i| (i, segment_distance_deg(&points[i], a, b)))
        .max_by_key(|(_, d)| OrderedFloat(*d));

    if let Some((i_max, d_max)) = farthest
        && d_max > tolerance
    {
        keep[i_max] = true;
        dp_recursive(points, tolerance, start, i_max, keep);
        dp_recursive(points, tolerance, i_max, end, keep);
    }
}

/// Planar distance in degrees between `p` and the segment `a`-`b`, longitude as x and latitude as y.
fn segment_distance_deg(p: &GeoPoint, a: &GeoPoint, b: &GeoPoint) -> f64 {
    let (dx, dy) = (b.longitude - a.longitude, b.latitude - a.latitude);
    let len_sq = dx * dx + dy * dy;
    let t = match len_sq == 0.0 {
        true => 0.0,
        false => (((p.longitude - a.longitude) * dx + (p.latitude - a.latitude) * dy) / len_sq)
            .clamp(0.0, 1.0),
    };
    let (cx, cy) = (a.longitude + t * dx, a.latitude + t * dy);
    ((p.longitude - cx).powi(2) + (p.latitude - cy).powi(2)).sqrt()
}

/// Straightens corners that are within `threshold_deg` of a right angle (interior 90° or 270°).
///
/// Only right corners take part: those within the threshold ("near-right") and those already within 1e-6°
/// of a right angle ("exact"). Every other vertex keeps its position.
/// Consecutive right corners form chains of edges, bounded by the other vertices (or closing on themselves).
/// Each chain is fitted to a rectilinear grid: the one spanned by the edges of its exact corners, or
/// the length-weighted circular mean of all its edge directions modulo 90° when it has none.
/// Every chain edge is rotated onto the nearest grid direction, around the bounding vertex it touches
/// (or its midpoint), and the right corners become the intersection of their two edge lines.
/// Near-right corners therefore end up exactly perpendicular, and exact corners stay exact: they are
/// only moved when one of their edges is rotated, and then re-intersected.
pub fn preserve_right_angles(polygon: &[GeoPoint], threshold_deg: f64) -> Vec<GeoPoint> {
    let n = polygon.len();
    if n < 3 || threshold_deg <= 0.0 || threshold_deg.is_nan() {
        return polygon.to_vec();
    }
    let origin = metrics::centroid(polygon);
    let local = projection::project(polygon, &origin);
    let edges = LocalEdge::ring(&local).collect_vec();
    let corners = (0..n)
        .map(|i| {
            let off_right = right_angle_offset_deg(&local[(i + n - 1) % n], &local[i], &local[(i + 1) % n]);
            Corner::classify(off_right, threshold_deg)
        })
        .collect_vec();

    //edges rotated onto the grid of their chain, `None` if their direction is kept
    let mut grid_lines: Vec<Option<LocalLine>> = vec![None; n];
    for chain in corner_chains(&corners) {
        let grid_angle = chain.grid_angle(&edges, &corners);
        for &e in &chain.edges {
            let edge = &edges[e];
            let deviation = grid_deviation(edge.angle(), grid_angle);
            if edge.length() == 0.0 || deviation.abs() < RIGHT_ANGLE_EPSILON_DEG.to_radians() {
                continue;
            }
            let pivot = match (corners[e].is_right(), corners[(e + 1) % n].is_right()) {
                (false, _) => edge.start,
                (true, false) => edge.end,
                (true, true) => edge.midpoint(),
            };
            grid_lines[e] = Some(LocalLine::new(pivot, edge.angle() - deviation));
        }
    }

    let mut n_snapped = 0;
    let snapped = (0..n)
        .map(|i| {
            let i_prev = (i + n - 1) % n;
            if !corners[i].is_right() || (grid_lines[i_prev].is_none() && grid_lines[i].is_none()) {
                return polygon[i];
            }
            let line_in = grid_lines[i_prev].or_else(|| LocalLine::from_edge(&edges[i_prev]));
            let line_out = grid_lines[i].or_else(|| LocalLine::from_edge(&edges[i]));
            match (line_in, line_out) {
                (Some(l_in), Some(l_out)) => match l_in.intersection(&l_out) {
                    Some(v) => {
                        n_snapped += 1;
                        projection::unproject_point(&v, &origin)
                    }
                    None => polygon[i],
                },
                _ => polygon[i],
            }
        })
        .collect_vec();

    debug!("[SIMPL] snapped {n_snapped}/{n} vertices onto right angles");
    snapped
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Corner {
    /// Within [`RIGHT_ANGLE_EPSILON_DEG`] of a right angle
    Exact,
    /// Within the snapping threshold of a right angle
    NearRight,
    Other,
}

impl Corner {
    fn classify(off_right_deg: f64, threshold_deg: f64) -> Self {
        match off_right_deg {
            d if d < RIGHT_ANGLE_EPSILON_DEG => Corner::Exact,
            d if d <= threshold_deg => Corner::NearRight,
            _ => Corner::Other,
        }
    }

    fn is_right(&self) -> bool {
        *self != Corner::Other
    }
}

/// Consecutive edges joined by right corners. Edge `e` runs from vertex `e` to vertex `e + 1`.
struct CornerChain {
    edges: Vec<usize>,
    /// Every corner of the polygon is right, the chain closes on itself
    closed: bool,
}

impl CornerChain {
    /// The right corners joining the edges of the chain
    fn corners(&self, n: usize) -> impl Iterator<Item = usize> + '_ {
        let n_joints = match self.closed {
            true => self.edges.len(),
            false => self.edges.len().saturating_sub(1),
        };
        self.edges[..n_joints].iter().map(move |e| (e + 1) % n)
    }

    /// Grid angle (radians, in [-π/4, π/4]) the chain is snapped onto.
    /// Spanned by the edges of the exact corners if there are any, so these stay in place.
    fn grid_angle(&self, edges: &[LocalEdge], corners: &[Corner]) -> f64 {
        let n = edges.len();
        let exact_edges = self
            .corners(n)
            .filter(|&c| corners[c] == Corner::Exact)
            .flat_map(|c| [(c + n - 1) % n, c])
            .unique()
            .map(|e| &edges[e])
            .collect_vec();
        match exact_edges.is_empty() {
            true => dominant_grid_angle(self.edges.iter().map(|&e| &edges[e])),
            false => dominant_grid_angle(exact_edges.into_iter()),
        }
    }
}

/// Splits the ring into chains of edges joined by right corners.
/// Chains without a right corner (a single edge between two other corners) are left out.
fn corner_chains(corners: &[Corner]) -> Vec<CornerChain> {
    let n = corners.len();
    let Some(start) = corners.iter().position(|c| !c.is_right()) else {
        return vec![CornerChain {
            edges: (0..n).collect(),
            closed: true,
        }];
    };
    let mut chains = vec![];
    let mut current = vec![];
    for i in (0..n).map(|k| (start + k) % n) {
        current.push(i);
        if !corners[(i + 1) % n].is_right() {
            let edges = std::mem::take(&mut current);
            if edges.len() > 1 {
                chains.push(CornerChain {
                    edges,
                    closed: false,
                });
            }
        }
    }
    chains
}

/// Angle (radians) of the rectilinear grid that best fits the edges, in [-π/4, π/4].
/// Directions are taken modulo 90° by quadrupling them before averaging.
fn dominant_grid_angle<'a>(edges: impl Iterator<Item = &'a LocalEdge>) -> f64 {
    let (s, c) = edges.fold((0.0, 0.0), |(s, c), e| {
        let (s4, c4) = (4.0 * e.angle()).sin_cos();
        let w = e.length();
        (s + w * s4, c + w * c4)
    });
    s.atan2(c) / 4.0
}

/// Signed rotation (radians, in [-π/4, π/4)) from the nearest grid direction to `angle`
fn grid_deviation(angle: f64, grid_angle: f64) -> f64 {
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
    (angle - grid_angle + FRAC_PI_4).rem_euclid(FRAC_PI_2) - FRAC_PI_4
}

/// Absolute difference in degrees between the corner angle at `v` and 90°.
/// The unsigned corner angle is 90° for both convex and reflex right corners.
fn right_angle_offset_deg(prev: &LocalPoint, v: &LocalPoint, next: &LocalPoint) -> f64 {
    let (ax, ay) = (prev.x - v.x, prev.y - v.y);
    let (bx, by) = (next.x - v.x, next.y - v.y);
    let corner = (ax * by - ay * bx).abs().atan2(ax * bx + ay * by).to_degrees();
    (corner - 90.0).abs()
}
