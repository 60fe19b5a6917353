use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use log::warn;

use crate::analysis::SiteInput;
use crate::entrance::{RoadSegment, SolarPreference};
use crate::geometry::primitives::GeoPoint;
use crate::io::ext_repr::{ExtGeoPoint, ExtRoadSegment, ExtSite, ExtSolar};
use crate::metrics;

/// Converts an [`ExtSite`] into a [`SiteInput`], validating every coordinate.
///
/// Explicit closing vertices are dropped. The boundary must have at least 3 distinct vertices;
/// the footprint is passed on as is and judged by the compliance validation.
pub fn import_site(ext_site: &ExtSite) -> Result<SiteInput> {
    let import = || -> Result<SiteInput> {
        let boundary = import_ring(&ext_site.boundary).context("invalid boundary")?;
        let n_distinct = boundary.iter().unique().count();
        ensure!(
            n_distinct >= 3,
            "boundary needs at least 3 distinct vertices, got {n_distinct}"
        );

        let footprint = match &ext_site.footprint {
            Some(ext_fp) => Some(import_ring(ext_fp).context("invalid footprint")?),
            None => None,
        };
        let roads = ext_site
            .roads
            .iter()
            .enumerate()
            .map(|(i, r)| import_road(r).with_context(|| format!("invalid road segment {i}")))
            .collect::<Result<Vec<_>>>()?;
        let solar = ext_site
            .solar
            .as_ref()
            .map(|s| import_solar(s, &boundary));

        Ok(SiteInput {
            boundary,
            footprint,
            roads,
            solar,
        })
    };
    import().with_context(|| format!("failed to import site {}", ext_site.id))
}

pub fn import_point(ext_point: &ExtGeoPoint) -> Result<GeoPoint> {
    GeoPoint::try_new(ext_point.lat, ext_point.lng)
}

/// Imports a polygon ring, dropping an explicit closing vertex
pub fn import_ring(ext_ring: &[ExtGeoPoint]) -> Result<Vec<GeoPoint>> {
    let mut ring = ext_ring
        .iter()
        .enumerate()
        .map(|(i, p)| import_point(p).with_context(|| format!("vertex {i}")))
        .collect::<Result<Vec<_>>>()?;
    if ring.len() > 1 && ring.first() == ring.last() {
        warn!("[IMPORT] dropping closing vertex duplicating the first one");
        ring.pop();
    }
    Ok(ring)
}

pub fn import_road(ext_road: &ExtRoadSegment) -> Result<RoadSegment> {
    Ok(RoadSegment {
        start: import_point(&ext_road.start)?,
        end: import_point(&ext_road.end)?,
        name: ext_road.name.clone(),
    })
}

/// Without an explicit bearing, the hemisphere of the site decides
pub fn import_solar(ext_solar: &ExtSolar, boundary: &[GeoPoint]) -> SolarPreference {
    match ext_solar.preferred_bearing_deg {
        Some(b) => SolarPreference {
            preferred_bearing_deg: b.rem_euclid(360.0),
        },
        None => SolarPreference::for_latitude(metrics::centroid(boundary).latitude),
    }
}
