use serde::{Deserialize, Serialize};

use crate::geometry::primitives::LocalPoint;

/// Principal axis of a point set, from the eigen-decomposition of its 2×2 covariance matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrincipalAxis {
    /// Compass bearing of the major axis in [0, 180). The axis is undirected.
    pub bearing_deg: f64,
    /// Larger eigenvalue (variance along the major axis, m²)
    pub major_variance: f64,
    /// Smaller eigenvalue (variance along the minor axis, m²)
    pub minor_variance: f64,
}

impl PrincipalAxis {
    /// Ratio of minor to major variance in [0, 1]. Values near 1 mean the axis is ill-defined.
    pub fn isotropy(&self) -> f64 {
        match self.major_variance > 0.0 {
            true => self.minor_variance / self.major_variance,
            false => 1.0,
        }
    }
}

/// Relative size of the eigenvalue gap under which both eigenvalues are considered equal
const ISOTROPY_EPSILON: f64 = 1e-12;

/// Computes the principal axis of a set of local points.
///
/// The covariance matrix `[[sxx, sxy], [sxy, syy]]` is symmetric, so its eigenvalues follow in closed form
/// from the characteristic equation `λ² - (sxx + syy)λ + (sxx·syy - sxy²) = 0`.
/// The eigenvector of the larger root is `(λ₁ - syy, sxy)`, or equivalently `(sxy, λ₁ - sxx)`.
///
/// For (near-)circular point sets both eigenvalues coincide and every direction is a valid principal axis:
/// the bearing is then reported as 0° and should not be trusted, see [`PrincipalAxis::isotropy`].
pub fn principal_axis(points: &[LocalPoint]) -> PrincipalAxis {
    let isotropic = PrincipalAxis {
        bearing_deg: 0.0,
        major_variance: 0.0,
        minor_variance: 0.0,
    };
    if points.is_empty() {
        return isotropic;
    }

    let mean = LocalPoint::mean(points);
    let n = points.len() as f64;
    let (sxx, syy, sxy) = points.iter().fold((0.0, 0.0, 0.0), |(sxx, syy, sxy), p| {
        let (dx, dy) = (p.x - mean.x, p.y - mean.y);
        (sxx + dx * dx, syy + dy * dy, sxy + dx * dy)
    });
    let (sxx, syy, sxy) = (sxx / n, syy / n, sxy / n);

    let half_trace = (sxx + syy) / 2.0;
    let gap = (((sxx - syy) / 2.0).powi(2) + sxy.powi(2)).sqrt();
    let (lambda_1, lambda_2) = (half_trace + gap, (half_trace - gap).max(0.0));

    if gap <= ISOTROPY_EPSILON * half_trace.max(f64::MIN_POSITIVE) {
        return PrincipalAxis {
            major_variance: lambda_1,
            minor_variance: lambda_2,
            ..isotropic
        };
    }

    //pick the better conditioned of the two equivalent eigenvector forms
    let (vx, vy) = match sxx >= syy {
        true => (lambda_1 - syy, sxy),
        false => (sxy, lambda_1 - sxx),
    };

    PrincipalAxis {
        bearing_deg: axis_bearing(vx, vy),
        major_variance: lambda_1,
        minor_variance: lambda_2,
    }
}

/// Compass bearing in [0, 180) of the undirected axis spanned by a local direction vector
pub fn axis_bearing(dx: f64, dy: f64) -> f64 {
    let b = dx.atan2(dy).to_degrees().rem_euclid(180.0);
    if b >= 180.0 { 0.0 } else { b }
}
