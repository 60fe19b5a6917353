use itertools::Itertools;

use crate::analysis::{BuildingEnvelope, SiteAnalysis};
use crate::compliance::{ComplianceReport, FootprintCorrection};
use crate::entrance::EntranceInference;
use crate::geometry::primitives::GeoPoint;
use crate::io::ext_repr::{
    ExtCompliance, ExtCorrection, ExtEntrance, ExtEnvelope, ExtGeoPoint, ExtOutsideVertex,
    ExtRationaleEntry, ExtSiteReport,
};

/// Composes an [`ExtSiteReport`] from a [`SiteAnalysis`].
/// `timestamp` is stored as is; the correction is left empty, see [`export_correction`].
pub fn export_report(id: &str, analysis: &SiteAnalysis, timestamp: String) -> ExtSiteReport {
    let m = &analysis.metrics;
    ExtSiteReport {
        id: id.to_string(),
        timestamp,
        area_m2: m.area_m2,
        perimeter_m: m.perimeter_m,
        centroid: export_point(&m.centroid),
        orientation_deg: m.orientation_deg,
        vertex_count: m.vertex_count,
        simplified: analysis.simplified,
        working_boundary: export_ring(&analysis.working_boundary),
        buildable_area: export_ring(&analysis.buildable_area),
        buildable_area_m2: m.setback_polygon.area_m2(),
        compliance: analysis.compliance.as_ref().map(export_compliance),
        entrance: export_entrance(&analysis.entrance),
        envelope: export_envelope(&analysis.envelope),
        correction: None,
    }
}

pub fn export_point(p: &GeoPoint) -> ExtGeoPoint {
    ExtGeoPoint {
        lat: p.latitude,
        lng: p.longitude,
    }
}

pub fn export_ring(ring: &[GeoPoint]) -> Vec<ExtGeoPoint> {
    ring.iter().map(export_point).collect()
}

pub fn export_compliance(report: &ComplianceReport) -> ExtCompliance {
    ExtCompliance {
        is_valid: report.is_valid,
        compliance_percentage: report.compliance_percentage,
        outside_vertices: report
            .outside_vertices
            .iter()
            .map(|o| ExtOutsideVertex {
                index: o.index,
                vertex: export_point(&o.vertex),
                message: o.message.clone(),
            })
            .collect(),
        errors: report.errors.clone(),
    }
}

pub fn export_entrance(entrance: &EntranceInference) -> ExtEntrance {
    ExtEntrance {
        direction: entrance.direction.code().to_string(),
        bearing_deg: entrance.bearing_deg,
        confidence: entrance.confidence,
        rationale: entrance
            .rationale
            .iter()
            .map(|r| ExtRationaleEntry {
                strategy: r.strategy.to_string(),
                weight: r.weight,
                message: r.message.clone(),
            })
            .collect(),
    }
}

pub fn export_envelope(envelope: &BuildingEnvelope) -> ExtEnvelope {
    ExtEnvelope {
        polygon_m: envelope.polygon_m.iter().map(|&p| p.into()).collect_vec(),
        width_m: envelope.width_m,
        depth_m: envelope.depth_m,
        area_m2: envelope.area_m2,
        entrance_facade: envelope.entrance_facade,
    }
}

pub fn export_correction(correction: &FootprintCorrection) -> ExtCorrection {
    ExtCorrection {
        footprint: export_ring(&correction.footprint),
        corrected_indices: correction.corrected_indices.clone(),
        compliance_before: correction.before.compliance_percentage,
        compliance_after: correction.after.compliance_percentage,
        self_intersecting: correction.self_intersecting,
    }
}
