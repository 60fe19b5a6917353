use serde::{Deserialize, Serialize};
use site_geo::io::ext_repr::ExtSiteReport;

use crate::config::SiteToolConfig;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SiteToolOutput {
    pub reports: Vec<ExtSiteReport>,
    pub config: SiteToolConfig,
}
