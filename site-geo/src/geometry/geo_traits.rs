/// Intersection test between `Self` and `T`, touching counts as intersecting.
pub trait CollidesWith<T> {
    fn collides_with(&self, other: &T) -> bool;
}

/// Euclidean distance between `Self` and `T` in the local frame, in meters.
pub trait DistanceTo<T> {
    /// 0 when the two intersect
    fn distance_to(&self, other: &T) -> f64;

    /// Squared version of [DistanceTo::distance_to]
    fn sq_distance_to(&self, other: &T) -> f64;
}
