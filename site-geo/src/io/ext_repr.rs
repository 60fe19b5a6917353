use serde::{Deserialize, Serialize};

use crate::geometry::geo_enums::Facade;

/// External representation of a [`GeoPoint`](crate::geometry::primitives::GeoPoint).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ExtGeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// External representation of a [`RoadSegment`](crate::entrance::RoadSegment).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtRoadSegment {
    pub start: ExtGeoPoint,
    pub end: ExtGeoPoint,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
}

/// External representation of a [`SolarPreference`](crate::entrance::SolarPreference).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct ExtSolar {
    /// Bearing the principal facade should ideally face.
    /// If not specified, due south (north of the equator) or due north (south of it).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub preferred_bearing_deg: Option<f64>,
}

/// A site as supplied by the caller
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtSite {
    /// Identifier of the site, echoed in the report
    pub id: String,
    /// Site boundary. An explicit closing vertex (equal to the first one) is allowed.
    pub boundary: Vec<ExtGeoPoint>,
    /// Proposed building footprint
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub footprint: Option<Vec<ExtGeoPoint>>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub roads: Vec<ExtRoadSegment>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub solar: Option<ExtSolar>,
}

/// Result of analysing one [`ExtSite`]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtSiteReport {
    pub id: String,
    /// Moment the report was created (RFC 3339)
    pub timestamp: String,
    pub area_m2: f64,
    pub perimeter_m: f64,
    pub centroid: ExtGeoPoint,
    /// Bearing of the principal axis in [0, 180)
    pub orientation_deg: f64,
    pub vertex_count: usize,
    /// Whether the boundary was simplified before analysis
    pub simplified: bool,
    pub working_boundary: Vec<ExtGeoPoint>,
    pub buildable_area: Vec<ExtGeoPoint>,
    pub buildable_area_m2: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub compliance: Option<ExtCompliance>,
    pub entrance: ExtEntrance,
    pub envelope: ExtEnvelope,
    /// Present when the footprint was corrected onto the buildable area
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub correction: Option<ExtCorrection>,
}

/// External representation of a [`ComplianceReport`](crate::compliance::ComplianceReport).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtCompliance {
    pub is_valid: bool,
    pub compliance_percentage: f64,
    pub outside_vertices: Vec<ExtOutsideVertex>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub errors: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtOutsideVertex {
    pub index: usize,
    pub vertex: ExtGeoPoint,
    pub message: String,
}

/// External representation of an [`EntranceInference`](crate::entrance::EntranceInference).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtEntrance {
    /// One of N, NE, E, SE, S, SW, W, NW
    pub direction: String,
    pub bearing_deg: f64,
    pub confidence: f64,
    pub rationale: Vec<ExtRationaleEntry>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtRationaleEntry {
    pub strategy: String,
    pub weight: f64,
    pub message: String,
}

/// External representation of a [`BuildingEnvelope`](crate::analysis::BuildingEnvelope).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtEnvelope {
    /// Vertices in meters (x east, y north) around the site centroid
    pub polygon_m: Vec<(f64, f64)>,
    pub width_m: f64,
    pub depth_m: f64,
    pub area_m2: f64,
    pub entrance_facade: Facade,
}

/// External representation of a [`FootprintCorrection`](crate::compliance::FootprintCorrection).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtCorrection {
    pub footprint: Vec<ExtGeoPoint>,
    pub corrected_indices: Vec<usize>,
    pub compliance_before: f64,
    pub compliance_after: f64,
    pub self_intersecting: bool,
}
