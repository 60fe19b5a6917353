//! Inference of the direction the main entrance (principal facade) of a site should face.
//!
//! Strategies are applied in order, stronger signals overriding weaker ones:
//! 1. the longest boundary edge is assumed to front the street (confidence 0.7),
//! 2. nearby road segments override it (confidence 0.85),
//! 3. a solar preference adds a small bonus when the chosen direction already aligns with it (+0.05).
//!
//! Without any usable signal the entrance defaults to north with confidence 0.5.
//! Every applied (or rejected) strategy leaves an entry in the rationale.

use std::fmt::{Display, Formatter};

use itertools::Itertools;
use log::debug;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::geometry::geo_enums::CompassDirection;
use crate::geometry::primitives::{GeoPoint, SiteEdge};
use crate::geometry::projection;
use crate::metrics;
use crate::util::{EntranceConfig, FPA, assertions};

pub const DEFAULT_CONFIDENCE: f64 = 0.5;
pub const LONGEST_EDGE_CONFIDENCE: f64 = 0.7;
pub const ROAD_PROXIMITY_CONFIDENCE: f64 = 0.85;
pub const SOLAR_ALIGNMENT_BONUS: f64 = 0.05;

/// A road (or a piece of one) near the site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadSegment {
    pub start: GeoPoint,
    pub end: GeoPoint,
    pub name: Option<String>,
}

impl RoadSegment {
    pub fn new(start: GeoPoint, end: GeoPoint) -> Self {
        RoadSegment {
            start,
            end,
            name: None,
        }
    }

    pub fn midpoint(&self) -> GeoPoint {
        GeoPoint::new(
            (self.start.latitude + self.end.latitude) / 2.0,
            (self.start.longitude + self.end.longitude) / 2.0,
        )
    }
}

/// Bearing a facade should ideally face to receive the most sun
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarPreference {
    pub preferred_bearing_deg: f64,
}

impl SolarPreference {
    /// Due south
    pub const fn northern_hemisphere() -> Self {
        SolarPreference {
            preferred_bearing_deg: 180.0,
        }
    }

    /// Due north
    pub const fn southern_hemisphere() -> Self {
        SolarPreference {
            preferred_bearing_deg: 0.0,
        }
    }

    pub fn for_latitude(latitude: f64) -> Self {
        match latitude < 0.0 {
            true => Self::southern_hemisphere(),
            false => Self::northern_hemisphere(),
        }
    }

    /// Cosine of the angle between `bearing_deg` and the preferred bearing, in [-1, 1]
    pub fn alignment(&self, bearing_deg: f64) -> f64 {
        projection::bearing_difference(bearing_deg, self.preferred_bearing_deg)
            .to_radians()
            .cos()
    }
}

impl Default for SolarPreference {
    fn default() -> Self {
        Self::northern_hemisphere()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Default,
    LongestEdge,
    RoadProximity,
    SolarAlignment,
}

impl Display for Strategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Strategy::Default => "default",
            Strategy::LongestEdge => "longest_edge",
            Strategy::RoadProximity => "road_proximity",
            Strategy::SolarAlignment => "solar_alignment",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RationaleEntry {
    pub strategy: Strategy,
    /// Confidence contributed by this strategy, 0 if it was considered but not applied
    pub weight: f64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntranceInference {
    pub direction: CompassDirection,
    /// Unrounded bearing the direction was derived from
    pub bearing_deg: f64,
    /// In [0, 1]
    pub confidence: f64,
    /// Strategies in the order they were applied
    pub rationale: Vec<RationaleEntry>,
}

/// Infers the entrance direction of a site. See the module documentation for the strategy chain.
///
/// The returned bearing always points away from the site, towards the street: for the longest-edge
/// fallback it is the outward normal of that edge, not the perpendicular pointing into the lot.
///
/// `polygon` may be empty (or degenerate), in which case only the road data is considered;
/// roads are located relative to the site centroid and therefore also need a valid polygon.
pub fn infer_entrance_direction(
    polygon: &[GeoPoint],
    roads: &[RoadSegment],
    solar: Option<&SolarPreference>,
    config: &EntranceConfig,
) -> EntranceInference {
    let mut rationale = vec![];
    let mut choice: Option<(f64, f64)> = None;

    if let Some(edge) = metrics::longest_edge(polygon).filter(|e| e.length_m > 0.0) {
        let bearing = outward_bearing(polygon, &edge);
        rationale.push(RationaleEntry {
            strategy: Strategy::LongestEdge,
            weight: LONGEST_EDGE_CONFIDENCE,
            message: format!(
                "longest edge #{} ({:.1}m) faces {:.1}° ({})",
                edge.index,
                edge.length_m,
                bearing,
                CompassDirection::from_bearing(bearing)
            ),
        });
        choice = Some((bearing, LONGEST_EDGE_CONFIDENCE));
    }

    if !roads.is_empty() {
        match road_bearing(polygon, roads, config.road_search_radius_m) {
            Some((bearing, n_nearby)) => {
                rationale.push(RationaleEntry {
                    strategy: Strategy::RoadProximity,
                    weight: ROAD_PROXIMITY_CONFIDENCE,
                    message: format!(
                        "{n_nearby} road segment(s) within {}m, mean bearing {:.1}° ({})",
                        config.road_search_radius_m,
                        bearing,
                        CompassDirection::from_bearing(bearing)
                    ),
                });
                let confidence = choice.map_or(ROAD_PROXIMITY_CONFIDENCE, |(_, c)| {
                    f64::max(c, ROAD_PROXIMITY_CONFIDENCE)
                });
                choice = Some((bearing, confidence));
            }
            None => rationale.push(RationaleEntry {
                strategy: Strategy::RoadProximity,
                weight: 0.0,
                message: format!(
                    "none of the {} road segment(s) lies within {}m of the site",
                    roads.len(),
                    config.road_search_radius_m
                ),
            }),
        }
    }

    if let (Some(solar), Some((bearing, confidence))) = (solar, choice) {
        let alignment = solar.alignment(bearing);
        if alignment >= config.solar_min_alignment {
            rationale.push(RationaleEntry {
                strategy: Strategy::SolarAlignment,
                weight: SOLAR_ALIGNMENT_BONUS,
                message: format!(
                    "aligned with the preferred solar bearing {:.0}° (score {alignment:.2})",
                    solar.preferred_bearing_deg
                ),
            });
            choice = Some((bearing, confidence + SOLAR_ALIGNMENT_BONUS));
        } else {
            rationale.push(RationaleEntry {
                strategy: Strategy::SolarAlignment,
                weight: 0.0,
                message: format!(
                    "not aligned with the preferred solar bearing {:.0}° (score {alignment:.2} < {})",
                    solar.preferred_bearing_deg, config.solar_min_alignment
                ),
            });
        }
    }

    let (bearing_deg, confidence) = match choice {
        Some(choice) => choice,
        None => {
            rationale.push(RationaleEntry {
                strategy: Strategy::Default,
                weight: DEFAULT_CONFIDENCE,
                message: "no orientation indicators found, defaulting to north".to_string(),
            });
            (0.0, DEFAULT_CONFIDENCE)
        }
    };

    let inference = EntranceInference {
        direction: CompassDirection::from_bearing(bearing_deg),
        bearing_deg,
        confidence: confidence.min(1.0),
        rationale,
    };
    debug!(
        "[ENTR] {} ({:.1}°) with confidence {:.2} via [{}]",
        inference.direction,
        inference.bearing_deg,
        inference.confidence,
        inference.rationale.iter().map(|r| r.strategy).join(", ")
    );
    debug_assert!(assertions::entrance_inference_is_valid(&inference));
    inference
}

/// Bearing of the normal of `edge` pointing out of the site, across the edge.
fn outward_bearing(polygon: &[GeoPoint], edge: &SiteEdge) -> f64 {
    let origin = metrics::centroid(polygon);
    let local = projection::project(polygon, &origin);
    let (s, e) = (
        projection::project_point(&edge.start, &origin),
        projection::project_point(&edge.end, &origin),
    );
    let (dx, dy) = (e.x - s.x, e.y - s.y);

    //the exterior lies on the right of each edge for counterclockwise rings
    let signed_area = metrics::signed_area(&local);
    let right_normal_is_outward = match !FPA(signed_area).is_zero() {
        true => signed_area > 0.0,
        false => {
            //degenerate ring: away from the centroid
            let m = s.lerp(&e, 0.5);
            dy * m.x - dx * m.y >= 0.0
        }
    };
    match right_normal_is_outward {
        true => projection::local_bearing(dy, -dx),
        false => projection::local_bearing(-dy, dx),
    }
}

/// Circular mean of the bearings from the site centroid to the midpoints of the nearby road segments,
/// with the number of segments it is based on. `None` if no segment is nearby.
fn road_bearing(polygon: &[GeoPoint], roads: &[RoadSegment], radius_m: f64) -> Option<(f64, usize)> {
    if polygon.len() < 3 {
        return None;
    }
    let centroid = metrics::centroid(polygon);
    let nearby = roads
        .iter()
        .map(|r| r.midpoint())
        .map(|m| (projection::haversine_distance(&centroid, &m), m))
        .filter(|(d, _)| *d <= radius_m)
        .collect_vec();
    if nearby.is_empty() {
        return None;
    }

    let (s, c) = nearby.iter().fold((0.0, 0.0), |(s, c), (_, m)| {
        let (sin, cos) = projection::bearing(&centroid, m).to_radians().sin_cos();
        (s + sin, c + cos)
    });
    //mean resultant length, near 0 when the bearings cancel out
    let resultant = s.hypot(c) / nearby.len() as f64;
    let bearing = match resultant > 1e-3 {
        true => projection::normalize_bearing(s.atan2(c).to_degrees()),
        false => {
            //the closest road decides
            let (_, closest) = nearby.iter().min_by_key(|(d, _)| OrderedFloat(*d))?;
            projection::bearing(&centroid, closest)
        }
    };
    Some((bearing, nearby.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::projection::{METERS_PER_DEG_LAT, METERS_PER_DEG_LNG};
    use float_cmp::approx_eq;

    const LAT: f64 = 51.5074;
    const LNG: f64 = -0.1278;

    fn offset(east_m: f64, north_m: f64) -> GeoPoint {
        GeoPoint::new(
            LAT + north_m / METERS_PER_DEG_LAT,
            LNG + east_m / (METERS_PER_DEG_LNG * LAT.to_radians().cos()),
        )
    }

    /// 40m wide at the south, 44m wide along the north side
    fn north_fronted_site() -> Vec<GeoPoint> {
        vec![
            offset(0.0, 0.0),
            offset(40.0, 0.0),
            offset(42.0, 20.0),
            offset(-2.0, 20.0),
        ]
    }

    fn strategies(inference: &EntranceInference) -> Vec<Strategy> {
        inference.rationale.iter().map(|r| r.strategy).collect()
    }

    #[test]
    fn no_inputs_default_to_north() {
        let inference = infer_entrance_direction(&[], &[], None, &EntranceConfig::default());
        assert_eq!(inference.direction, CompassDirection::N);
        assert_eq!(inference.confidence, 0.5);
        assert_eq!(strategies(&inference), vec![Strategy::Default]);
    }

    #[test]
    fn longest_edge_faces_the_street() {
        for site in [north_fronted_site(), north_fronted_site().into_iter().rev().collect()] {
            let inference = infer_entrance_direction(&site, &[], None, &EntranceConfig::default());
            assert_eq!(inference.direction, CompassDirection::N);
            //outward normal of the northern edge, never the inward one
            let b = inference.bearing_deg;
            assert!(b < 1.0 || b > 359.0, "bearing {b}");
            assert!(approx_eq!(f64, inference.confidence, 0.7));
            assert_eq!(strategies(&inference), vec![Strategy::LongestEdge]);
        }
    }

    #[test]
    fn nearby_road_overrides_longest_edge() {
        let site = north_fronted_site();
        let roads = vec![RoadSegment::new(offset(70.0, -20.0), offset(70.0, 40.0))];
        let inference = infer_entrance_direction(&site, &roads, None, &EntranceConfig::default());
        assert_eq!(inference.direction, CompassDirection::E);
        assert!(approx_eq!(f64, inference.confidence, 0.85));
        assert_eq!(
            strategies(&inference),
            vec![Strategy::LongestEdge, Strategy::RoadProximity]
        );
    }

    #[test]
    fn distant_road_is_ignored() {
        let site = north_fronted_site();
        let roads = vec![RoadSegment::new(offset(500.0, 0.0), offset(500.0, 40.0))];
        let inference = infer_entrance_direction(&site, &roads, None, &EntranceConfig::default());
        assert_eq!(inference.direction, CompassDirection::N);
        assert!(approx_eq!(f64, inference.confidence, 0.7));
        assert_eq!(inference.rationale[1].weight, 0.0);
    }

    #[test]
    fn opposite_roads_fall_back_to_the_closest() {
        let site = north_fronted_site();
        let roads = vec![
            RoadSegment::new(offset(-20.0, 10.0), offset(-20.0, 10.0)),
            RoadSegment::new(offset(70.0, 10.0), offset(70.0, 10.0)),
        ];
        let inference = infer_entrance_direction(&site, &roads, None, &EntranceConfig::default());
        assert_eq!(inference.direction, CompassDirection::W);
    }

    #[test]
    fn solar_bonus_only_when_aligned() {
        let site = north_fronted_site();
        let config = EntranceConfig::default();

        let north_pref = SolarPreference::for_latitude(-33.9);
        let aligned = infer_entrance_direction(&site, &[], Some(&north_pref), &config);
        assert_eq!(aligned.direction, CompassDirection::N);
        assert!(approx_eq!(f64, aligned.confidence, 0.75));

        let south_pref = SolarPreference::for_latitude(LAT);
        let opposed = infer_entrance_direction(&site, &[], Some(&south_pref), &config);
        assert_eq!(opposed.direction, CompassDirection::N);
        assert!(approx_eq!(f64, opposed.confidence, 0.7));
        assert_eq!(
            strategies(&opposed),
            vec![Strategy::LongestEdge, Strategy::SolarAlignment]
        );
        assert_eq!(opposed.rationale[1].weight, 0.0);
    }

    #[test]
    fn solar_data_alone_is_not_a_signal() {
        let pref = SolarPreference::default();
        let inference = infer_entrance_direction(&[], &[], Some(&pref), &EntranceConfig::default());
        assert_eq!(inference.direction, CompassDirection::N);
        assert_eq!(strategies(&inference), vec![Strategy::Default]);
    }

    #[test]
    fn strategy_names() {
        assert_eq!(Strategy::LongestEdge.to_string(), "longest_edge");
        assert_eq!(
            serde_json::to_string(&Strategy::RoadProximity).unwrap(),
            "\"road_proximity\""
        );
    }
}
