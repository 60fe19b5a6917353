//! The composed site analysis: simplification, metrics, buildable area, footprint validation and
//! entrance inference in one call.

use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::compliance::{self, ComplianceReport};
use crate::entrance::{self, EntranceInference, RoadSegment, SolarPreference};
use crate::geometry::geo_enums::Facade;
use crate::geometry::primitives::{GeoPoint, LocalPoint};
use crate::metrics::{self, SiteMetrics};
use crate::setback::{self, BuildableArea};
use crate::simplification;
use crate::util::{EngineConfig, SetbackMode};

/// Everything known about a site before analysis
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SiteInput {
    pub boundary: Vec<GeoPoint>,
    /// Proposed building footprint, validated against the buildable area
    pub footprint: Option<Vec<GeoPoint>>,
    pub roads: Vec<RoadSegment>,
    pub solar: Option<SolarPreference>,
}

impl SiteInput {
    pub fn new(boundary: Vec<GeoPoint>) -> Self {
        SiteInput {
            boundary,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteAnalysis {
    /// The boundary all other results are derived from (simplified if configured)
    pub working_boundary: Vec<GeoPoint>,
    /// Whether simplification changed the boundary
    pub simplified: bool,
    pub metrics: SiteMetrics,
    /// [`SiteMetrics::setback_polygon`] in geographic coordinates
    pub buildable_area: Vec<GeoPoint>,
    /// Validation of the footprint against the buildable area, if a footprint was supplied
    pub compliance: Option<ComplianceReport>,
    pub entrance: EntranceInference,
    pub envelope: BuildingEnvelope,
}

/// The buildable area in meters, as handed to floor-plan generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingEnvelope {
    /// Local frame centered on the site, x east and y north
    pub polygon_m: Vec<LocalPoint>,
    /// Extent parallel to the entrance facade
    pub width_m: f64,
    /// Extent perpendicular to the entrance facade
    pub depth_m: f64,
    pub area_m2: f64,
    pub entrance_facade: Facade,
}

impl BuildingEnvelope {
    pub fn new(buildable: &BuildableArea, entrance_facade: Facade) -> Self {
        let extent = |coord: fn(&LocalPoint) -> f64| match buildable
            .points
            .iter()
            .map(coord)
            .minmax()
            .into_option()
        {
            Some((min, max)) => max - min,
            None => 0.0,
        };
        let (x_extent, y_extent) = (extent(|p| p.x), extent(|p| p.y));
        let (width_m, depth_m) = match entrance_facade {
            Facade::North | Facade::South => (x_extent, y_extent),
            Facade::East | Facade::West => (y_extent, x_extent),
        };
        BuildingEnvelope {
            polygon_m: buildable.points.clone(),
            width_m,
            depth_m,
            area_m2: buildable.area_m2(),
            entrance_facade,
        }
    }
}

/// Runs the full analysis of a site.
///
/// The boundary is simplified first when [`EngineConfig::simplification`] is set.
/// With [`SetbackMode::PerEdge`] the inferred entrance bearing is used as the front of the site.
pub fn analyze_site(input: &SiteInput, config: &EngineConfig) -> SiteAnalysis {
    let working_boundary = match &config.simplification {
        Some(simpl_config) => simplification::simplify_polygon(&input.boundary, simpl_config),
        None => input.boundary.clone(),
    };
    let simplified = working_boundary != input.boundary;

    let entrance = entrance::infer_entrance_direction(
        &working_boundary,
        &input.roads,
        input.solar.as_ref(),
        &config.entrance,
    );

    let metrics = metrics::site_metrics(&working_boundary, &config.setbacks);
    let metrics = match config.setback_mode {
        SetbackMode::Averaged => metrics,
        SetbackMode::PerEdge => SiteMetrics {
            setback_polygon: setback::buildable_area(
                &working_boundary,
                &config.setbacks,
                entrance.bearing_deg,
                SetbackMode::PerEdge,
            ),
            ..metrics
        },
    };
    let buildable_area = metrics.setback_polygon.to_geo();

    let compliance = input
        .footprint
        .as_ref()
        .map(|f| compliance::validate_footprint_inside_boundary(f, &buildable_area));

    let envelope = BuildingEnvelope::new(&metrics.setback_polygon, entrance.direction.into());

    debug!(
        "[ANALYSIS] {} -> {} vertices, {:.1}m² site, {:.1}m² buildable, entrance {}",
        input.boundary.len(),
        working_boundary.len(),
        metrics.area_m2,
        envelope.area_m2,
        entrance.direction
    );

    SiteAnalysis {
        working_boundary,
        simplified,
        metrics,
        buildable_area,
        compliance,
        entrance,
        envelope,
    }
}
