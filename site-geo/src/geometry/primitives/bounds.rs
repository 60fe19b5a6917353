use serde::{Deserialize, Serialize};

use crate::geometry::primitives::GeoPoint;

/// Geographic bounding box in degrees. The zero-valued default stands in for "no bounds".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl GeoBounds {
    /// Bounds of a set of points, the zero-valued default for an empty set.
    pub fn from_points(points: &[GeoPoint]) -> Self {
        let Some(first) = points.first() else {
            return GeoBounds::default();
        };
        points.iter().skip(1).fold(
            GeoBounds {
                north: first.latitude,
                south: first.latitude,
                east: first.longitude,
                west: first.longitude,
            },
            |b, p| GeoBounds {
                north: b.north.max(p.latitude),
                south: b.south.min(p.latitude),
                east: b.east.max(p.longitude),
                west: b.west.min(p.longitude),
            },
        )
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.north + self.south) / 2.0,
            (self.east + self.west) / 2.0,
        )
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.south..=self.north).contains(&point.latitude)
            && (self.west..=self.east).contains(&point.longitude)
    }
}
