use std::cmp::Ordering;
use std::fmt::{Debug, Display};

///Wrapper around the [`float_cmp::approx_eq!()`] macro for easy comparison of floats with a certain tolerance.
///Two FPAs are considered equal if they are within a certain tolerance of each other.
#[derive(Debug, Clone, Copy)]
pub struct FPA(pub f64);

impl<T> From<T> for FPA
where
    T: Into<f64>,
{
    fn from(n: T) -> Self {
        FPA(n.into())
    }
}

impl PartialEq<Self> for FPA {
    fn eq(&self, other: &Self) -> bool {
        float_cmp::approx_eq!(f64, self.0, other.0, epsilon = FPA::EPSILON, ulps = 4)
    }
}

impl PartialOrd<Self> for FPA {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.eq(other) {
            true => Some(Ordering::Equal),
            false => self.0.partial_cmp(&other.0),
        }
    }
}

impl FPA {
    /// Absolute tolerance, sized for degrees and meters at site scale
    pub const EPSILON: f64 = 1e-9;

    pub fn is_zero(&self) -> bool {
        *self == FPA(0.0)
    }
}

impl Display for FPA {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approximate_comparisons() {
        assert_eq!(FPA(0.1 + 0.2), FPA(0.3));
        assert!(FPA(1e-12).is_zero());
        assert!(FPA(1.0) < FPA(1.1));
        assert_eq!(FPA(2.0).partial_cmp(&FPA(2.0 + 1e-12)), Some(Ordering::Equal));
    }
}
