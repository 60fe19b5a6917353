use serde::{Deserialize, Serialize};

use crate::geometry::primitives::GeoPoint;
use crate::geometry::projection;

/// One side of a site boundary, with its ground length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteEdge {
    pub start: GeoPoint,
    pub end: GeoPoint,
    /// Haversine length in meters
    pub length_m: f64,
    pub midpoint: GeoPoint,
    /// Index of the start vertex in the boundary
    pub index: usize,
}

impl SiteEdge {
    pub fn new(index: usize, start: GeoPoint, end: GeoPoint) -> Self {
        SiteEdge {
            start,
            end,
            length_m: projection::haversine_distance(&start, &end),
            midpoint: GeoPoint::new(
                (start.latitude + end.latitude) / 2.0,
                (start.longitude + end.longitude) / 2.0,
            ),
            index,
        }
    }

    /// Initial bearing from start to end, in degrees [0, 360)
    pub fn bearing(&self) -> f64 {
        projection::bearing(&self.start, &self.end)
    }
}
