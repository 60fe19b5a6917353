//! Conversions to and from [`geo_types`], with x = longitude and y = latitude.

use geo_types::{Coord, LineString, Polygon};
use itertools::Itertools;

use crate::geometry::primitives::GeoPoint;

impl From<GeoPoint> for Coord<f64> {
    fn from(p: GeoPoint) -> Self {
        Coord {
            x: p.longitude,
            y: p.latitude,
        }
    }
}

impl From<Coord<f64>> for GeoPoint {
    fn from(c: Coord<f64>) -> Self {
        GeoPoint::new(c.y, c.x)
    }
}

impl From<geo_types::Point<f64>> for GeoPoint {
    fn from(p: geo_types::Point<f64>) -> Self {
        GeoPoint::new(p.y(), p.x())
    }
}

impl GeoPoint {
    /// Converts a site boundary into a [`geo_types::Polygon`] without holes (the ring gets closed by `geo_types`).
    pub fn ring_to_geo_polygon(boundary: &[GeoPoint]) -> Polygon<f64> {
        let exterior: LineString<f64> = boundary.iter().map(|p| Coord::from(*p)).collect_vec().into();
        Polygon::new(exterior, vec![])
    }

    /// Extracts the exterior ring of a [`geo_types::Polygon`] as a site boundary, without the closing duplicate.
    /// Interior rings are not supported by the engine and are ignored.
    pub fn ring_from_geo_polygon(polygon: &Polygon<f64>) -> Vec<GeoPoint> {
        let mut ring = polygon
            .exterior()
            .coords()
            .map(|c| GeoPoint::from(*c))
            .collect_vec();
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        ring
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polygon_round_trip_drops_closing_vertex() {
        let boundary = vec![
            GeoPoint::new(51.0, 0.0),
            GeoPoint::new(51.0, 0.001),
            GeoPoint::new(51.001, 0.001),
        ];
        let poly = GeoPoint::ring_to_geo_polygon(&boundary);
        assert_eq!(poly.exterior().0.len(), 4);
        assert_eq!(poly.exterior().0[1], Coord { x: 0.001, y: 51.0 });
        assert_eq!(GeoPoint::ring_from_geo_polygon(&poly), boundary);
    }
}
