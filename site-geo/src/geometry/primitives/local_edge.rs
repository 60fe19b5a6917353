use crate::geometry::geo_traits::{CollidesWith, DistanceTo};
use crate::geometry::primitives::LocalPoint;

/// Line segment between two [`LocalPoint`]s.
/// Zero-length segments are allowed and behave like a single point.
#[derive(Clone, Debug, PartialEq, Copy)]
pub struct LocalEdge {
    pub start: LocalPoint,
    pub end: LocalPoint,
}

impl LocalEdge {
    pub const fn new(start: LocalPoint, end: LocalPoint) -> Self {
        LocalEdge { start, end }
    }

    /// All edges of a closed ring, including the one from the last point back to the first.
    pub fn ring(points: &[LocalPoint]) -> impl Iterator<Item = LocalEdge> + '_ {
        let n = points.len();
        (0..n).map(move |i| LocalEdge::new(points[i], points[(i + 1) % n]))
    }

    /// Parametric position (clamped to [0, 1]) of the point on the edge closest to `point`.
    pub fn closest_param(&self, point: &LocalPoint) -> f64 {
        let (dx, dy) = (self.end.x - self.start.x, self.end.y - self.start.y);
        let len_sq = dx * dx + dy * dy;
        if len_sq == 0.0 {
            return 0.0;
        }
        let dot = (point.x - self.start.x) * dx + (point.y - self.start.y) * dy;
        (dot / len_sq).clamp(0.0, 1.0)
    }

    /// Returns the closest point which lies on the edge to the given point
    pub fn closest_point_on_edge(&self, point: &LocalPoint) -> LocalPoint {
        self.start.lerp(&self.end, self.closest_param(point))
    }

    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    pub fn midpoint(&self) -> LocalPoint {
        self.start.lerp(&self.end, 0.5)
    }

    /// Direction angle in radians, counterclockwise from the positive x-axis
    pub fn angle(&self) -> f64 {
        (self.end.y - self.start.y).atan2(self.end.x - self.start.x)
    }

    pub fn x_min(&self) -> f64 {
        f64::min(self.start.x, self.end.x)
    }

    pub fn y_min(&self) -> f64 {
        f64::min(self.start.y, self.end.y)
    }

    pub fn x_max(&self) -> f64 {
        f64::max(self.start.x, self.end.x)
    }

    pub fn y_max(&self) -> f64 {
        f64::max(self.start.y, self.end.y)
    }

    /// Intersection point of the two segments, if any
    pub fn collides_at(&self, other: &LocalEdge) -> Option<LocalPoint> {
        edge_intersection(self, other)
    }
}

impl DistanceTo<LocalPoint> for LocalEdge {
    fn distance_to(&self, point: &LocalPoint) -> f64 {
        self.sq_distance_to(point).sqrt()
    }

    fn sq_distance_to(&self, point: &LocalPoint) -> f64 {
        self.closest_point_on_edge(point).sq_distance(point)
    }
}

impl CollidesWith<LocalEdge> for LocalEdge {
    fn collides_with(&self, other: &LocalEdge) -> bool {
        edge_intersection(self, other).is_some()
    }
}

fn edge_intersection(e1: &LocalEdge, e2: &LocalEdge) -> Option<LocalPoint> {
    if f64::max(e1.x_min(), e2.x_min()) > f64::min(e1.x_max(), e2.x_max())
        || f64::max(e1.y_min(), e2.y_min()) > f64::min(e1.y_max(), e2.y_max())
    {
        //bounding boxes do not overlap
        return None;
    }

    //based on: https://en.wikipedia.org/wiki/Line%E2%80%93line_intersection#Given_two_points_on_each_line_segment
    let (x1, y1) = e1.start.into();
    let (x2, y2) = e1.end.into();
    let (x3, y3) = e2.start.into();
    let (x4, y4) = e2.end.into();

    let denom = (x2 - x1) * (y4 - y3) - (y2 - y1) * (x4 - x3);
    if denom == 0.0 {
        //parallel edges
        return None;
    }
    let t = ((x2 - x4) * (y4 - y3) - (y2 - y4) * (x4 - x3)) / denom;
    let u = ((x2 - x4) * (y2 - y1) - (y2 - y4) * (x2 - x1)) / denom;

    match (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        true => Some(LocalPoint::new(x2 + t * (x1 - x2), y2 + t * (y1 - y2))),
        false => None,
    }
}
