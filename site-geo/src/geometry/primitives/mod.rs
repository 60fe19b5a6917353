mod bounds;
mod geo_point;
mod local_edge;
mod local_line;
mod local_point;
mod site_edge;

#[doc(inline)]
pub use bounds::GeoBounds;
#[doc(inline)]
pub use geo_point::GeoPoint;
#[doc(inline)]
pub use local_edge::LocalEdge;
#[doc(inline)]
pub use local_line::LocalLine;
#[doc(inline)]
pub use local_point::LocalPoint;
#[doc(inline)]
pub use site_edge::SiteEdge;
