use serde::{Deserialize, Serialize};

/// Planar point in meters, relative to the origin of a local projection.
/// `x` grows eastward, `y` grows northward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LocalPoint {
    pub x: f64,
    pub y: f64,
}

impl LocalPoint {
    pub const ORIGIN: LocalPoint = LocalPoint { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        LocalPoint { x, y }
    }

    pub fn distance(&self, other: &LocalPoint) -> f64 {
        self.sq_distance(other).sqrt()
    }

    pub fn sq_distance(&self, other: &LocalPoint) -> f64 {
        (self.x - other.x).powi(2) + (self.y - other.y).powi(2)
    }

    pub fn norm(&self) -> f64 {
        self.distance(&LocalPoint::ORIGIN)
    }

    /// Point at fraction `t` along the way from `self` to `other`
    pub fn lerp(&self, other: &LocalPoint, t: f64) -> LocalPoint {
        LocalPoint::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Arithmetic mean of a set of points, the origin for an empty set.
    pub fn mean(points: &[LocalPoint]) -> LocalPoint {
        if points.is_empty() {
            return LocalPoint::ORIGIN;
        }
        let n = points.len() as f64;
        let (sx, sy) = points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        LocalPoint::new(sx / n, sy / n)
    }
}

impl From<LocalPoint> for (f64, f64) {
    fn from(p: LocalPoint) -> Self {
        (p.x, p.y)
    }
}

impl From<(f64, f64)> for LocalPoint {
    fn from((x, y): (f64, f64)) -> Self {
        LocalPoint::new(x, y)
    }
}
