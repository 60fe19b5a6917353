//! Parallel analysis of a batch of sites

use anyhow::Result;
use log::{info, warn};
use rayon::prelude::*;
use site_geo::analysis::analyze_site;
use site_geo::compliance;
use site_geo::io::export::{export_correction, export_report};
use site_geo::io::ext_repr::{ExtSite, ExtSiteReport};
use site_geo::io::import::import_site;

use crate::config::SiteToolConfig;

/// Imports, analyses and exports every site in parallel.
/// Fails on the first site that cannot be imported.
pub fn analyze_sites(
    ext_sites: &[ExtSite],
    config: &SiteToolConfig,
    timestamp: &str,
) -> Result<Vec<ExtSiteReport>> {
    ext_sites
        .par_iter()
        .map(|ext_site| analyze_ext_site(ext_site, config, timestamp))
        .collect()
}

pub fn analyze_ext_site(
    ext_site: &ExtSite,
    config: &SiteToolConfig,
    timestamp: &str,
) -> Result<ExtSiteReport> {
    let input = import_site(ext_site)?;
    let analysis = analyze_site(&input, &config.engine);
    let mut report = export_report(&ext_site.id, &analysis, timestamp.to_string());

    if let (Some(footprint), Some(min_compliance), Some(compl)) = (
        &input.footprint,
        config.auto_correct_min_compliance,
        &analysis.compliance,
    ) && !compl.is_valid
    {
        match compl.compliance_percentage >= min_compliance {
            true => {
                let correction =
                    compliance::correct_footprint(footprint, &analysis.buildable_area);
                info!(
                    "[MAIN] site {}: corrected {} vertices, compliance {:.1}% -> {:.1}%",
                    ext_site.id,
                    correction.corrected_indices.len(),
                    correction.before.compliance_percentage,
                    correction.after.compliance_percentage
                );
                report.correction = Some(export_correction(&correction));
            }
            false => warn!(
                "[MAIN] site {}: compliance {:.1}% below auto-correct threshold of {:.1}%",
                ext_site.id, compl.compliance_percentage, min_compliance
            ),
        }
    }

    info!(
        "[MAIN] site {}: {:.1}m², buildable {:.1}m², entrance {}",
        ext_site.id, report.area_m2, report.buildable_area_m2, report.entrance.direction
    );
    Ok(report)
}
