use serde::{Deserialize, Serialize};

use crate::setback::SetbackSpec;

///Configuration of the site analysis flow
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct EngineConfig {
    ///Setback distances applied to the site boundary
    #[serde(default)]
    pub setbacks: SetbackSpec,
    ///How the setback distances are turned into a buildable area
    #[serde(default)]
    pub setback_mode: SetbackMode,
    ///Simplification applied to the raw boundary before anything else. If undefined, the boundary is used as is.
    #[serde(default)]
    pub simplification: Option<SimplifyConfig>,
    ///Configuration of the entrance inference
    #[serde(default)]
    pub entrance: EntranceConfig,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SetbackMode {
    ///Mean of the four distances applied uniformly towards the centroid
    #[default]
    Averaged,
    ///Every edge offset by the distance of the side it faces
    PerEdge,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct SimplifyConfig {
    ///Maximum deviation of the simplified boundary from the original, in meters
    pub tolerance_m: f64,
    ///Corners within this many degrees of 90° or 270° are snapped to exact right angles.
    ///If undefined, no snapping is performed.
    pub right_angle_threshold_deg: Option<f64>,
}

impl SimplifyConfig {
    pub const DEFAULT_RIGHT_ANGLE_THRESHOLD_DEG: f64 = 10.0;

    /// Douglas-Peucker with the given tolerance and the default right-angle snapping
    pub fn new(tolerance_m: f64) -> Self {
        Self {
            tolerance_m,
            right_angle_threshold_deg: Some(Self::DEFAULT_RIGHT_ANGLE_THRESHOLD_DEG),
        }
    }

    /// Douglas-Peucker only
    pub fn without_snapping(tolerance_m: f64) -> Self {
        Self {
            tolerance_m,
            right_angle_threshold_deg: None,
        }
    }
}

impl Default for SimplifyConfig {
    fn default() -> Self {
        Self::new(0.5)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct EntranceConfig {
    ///Road segments whose midpoint lies further than this from the site centroid are ignored
    pub road_search_radius_m: f64,
    ///Minimum alignment score (cosine of the angle to the preferred solar bearing) to earn the solar bonus
    pub solar_min_alignment: f64,
}

impl Default for EntranceConfig {
    fn default() -> Self {
        Self {
            road_search_radius_m: 150.0,
            solar_min_alignment: 0.7,
        }
    }
}
