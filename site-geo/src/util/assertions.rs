use float_cmp::approx_eq;

use crate::compliance::{self, ComplianceReport};
use crate::entrance::EntranceInference;
use crate::geometry::primitives::{GeoPoint, LocalPoint};

//Various checks to verify the consistency of results
//Used in debug_assert!() blocks and tests

pub fn compliance_report_is_consistent(report: &ComplianceReport, n_vertices: usize) -> bool {
    let n_outside = report.outside_vertices.len();
    let expected_percentage = match n_vertices {
        0 => 0.0,
        n => (n - n_outside) as f64 / n as f64 * 100.0,
    };
    n_outside <= n_vertices
        && report.outside_vertices.iter().all(|o| o.index < n_vertices)
        && approx_eq!(f64, report.compliance_percentage, expected_percentage)
        && report.is_valid == (report.errors.is_empty() && n_outside == 0)
}

pub fn simplification_is_valid(original: &[GeoPoint], simplified: &[GeoPoint]) -> bool {
    match original.len() < 3 {
        true => simplified == original,
        false => simplified.len() >= 3 && simplified.len() <= original.len(),
    }
}

/// Every inset vertex lies inside the boundary or within [`compliance::BOUNDARY_TOLERANCE_M`] of it
pub fn inset_within_boundary(boundary: &[LocalPoint], inset: &[LocalPoint]) -> bool {
    inset
        .iter()
        .all(|p| compliance::locate_in_ring(p, boundary).is_inside())
}

pub fn entrance_inference_is_valid(inference: &EntranceInference) -> bool {
    (0.0..=1.0).contains(&inference.confidence)
        && (0.0..360.0).contains(&inference.bearing_deg)
        && !inference.rationale.is_empty()
}
