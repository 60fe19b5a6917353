pub mod geo_enums;
pub mod geo_traits;
pub mod primitives;
pub mod projection;

#[cfg(feature = "geo-interop")]
mod interop;
