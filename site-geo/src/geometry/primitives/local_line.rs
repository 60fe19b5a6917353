use crate::geometry::primitives::{LocalEdge, LocalPoint};

/// Cross products of unit directions below this are treated as parallel
const PARALLEL_EPSILON: f64 = 1e-9;

/// Infinite line through `point` with unit direction `dir`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalLine {
    pub point: LocalPoint,
    pub dir: (f64, f64),
}

impl LocalLine {
    /// Line through `point` with direction `angle` (radians, counterclockwise from the positive x-axis)
    pub fn new(point: LocalPoint, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        LocalLine {
            point,
            dir: (c, s),
        }
    }

    /// Line carrying `edge`, `None` for zero-length edges
    pub fn from_edge(edge: &LocalEdge) -> Option<Self> {
        match edge.length() > 0.0 {
            true => Some(LocalLine::new(edge.start, edge.angle())),
            false => None,
        }
    }

    /// The same line shifted by `distance` along its left-hand normal (negative shifts right)
    pub fn shifted_left(&self, distance: f64) -> Self {
        LocalLine {
            point: LocalPoint::new(
                self.point.x - self.dir.1 * distance,
                self.point.y + self.dir.0 * distance,
            ),
            dir: self.dir,
        }
    }

    /// Intersection point of both lines, `None` if they are (nearly) parallel
    pub fn intersection(&self, other: &LocalLine) -> Option<LocalPoint> {
        let cross = self.dir.0 * other.dir.1 - self.dir.1 * other.dir.0;
        if cross.abs() < PARALLEL_EPSILON {
            return None;
        }
        let (wx, wy) = (other.point.x - self.point.x, other.point.y - self.point.y);
        let t = (wx * other.dir.1 - wy * other.dir.0) / cross;
        Some(LocalPoint::new(
            self.point.x + t * self.dir.0,
            self.point.y + t * self.dir.1,
        ))
    }

    /// Orthogonal projection of `p` onto the line
    pub fn project(&self, p: &LocalPoint) -> LocalPoint {
        let t = (p.x - self.point.x) * self.dir.0 + (p.y - self.point.y) * self.dir.1;
        LocalPoint::new(self.point.x + t * self.dir.0, self.point.y + t * self.dir.1)
    }
}
