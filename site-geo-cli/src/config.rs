use serde::{Deserialize, Serialize};
use site_geo::util::EngineConfig;

/// Configuration of the command line tool
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct SiteToolConfig {
    /// Configuration passed on to the analysis engine
    #[serde(default)]
    pub engine: EngineConfig,
    /// Footprints with a compliance percentage below 100 but at least this value are corrected
    /// by moving the offending vertices onto the buildable area.
    /// If undefined, footprints are only validated.
    #[serde(default)]
    pub auto_correct_min_compliance: Option<f64>,
}
