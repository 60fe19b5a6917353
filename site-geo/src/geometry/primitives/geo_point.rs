use std::hash::{Hash, Hasher};

use anyhow::Result;
use anyhow::ensure;
use serde::{Deserialize, Serialize};

/// Geographic coordinate in degrees (WGS84, treated as a sphere).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        GeoPoint {
            latitude,
            longitude,
        }
    }

    /// Creates a point after checking that both coordinates are finite and within their valid range.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        ensure!(
            latitude.is_finite() && longitude.is_finite(),
            "non-finite coordinate, lat: {latitude}, lng: {longitude}"
        );
        ensure!(
            (-90.0..=90.0).contains(&latitude),
            "latitude out of range [-90, 90]: {latitude}"
        );
        ensure!(
            (-180.0..=180.0).contains(&longitude),
            "longitude out of range [-180, 180]: {longitude}"
        );
        Ok(GeoPoint::new(latitude, longitude))
    }
}

/// Equality is the derived float comparison, so it is only reflexive for finite coordinates:
/// a `NaN` point (only constructible through [`GeoPoint::new`]) is not equal to itself.
/// Points validated by [`GeoPoint::try_new`] never contain `NaN`.
impl Eq for GeoPoint {}

/// Hashes the bit patterns of both coordinates, with `-0.0` folded onto `0.0` so that points comparing
/// equal hash equally. Distinct-vertex counting during site import (`Itertools::unique`) relies on this.
impl Hash for GeoPoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        //adding 0.0 turns -0.0 into 0.0 and leaves every other value unchanged
        (self.latitude + 0.0).to_bits().hash(state);
        (self.longitude + 0.0).to_bits().hash(state);
    }
}

/// `(latitude, longitude)`
impl From<(f64, f64)> for GeoPoint {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        GeoPoint::new(latitude, longitude)
    }
}

impl From<GeoPoint> for (f64, f64) {
    fn from(p: GeoPoint) -> Self {
        (p.latitude, p.longitude)
    }
}
