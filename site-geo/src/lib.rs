#![doc = document_features::document_features!()]
//! Site geometry and boundary compliance engine.
//!
//! Turns a geographic site boundary into metric facts (area, orientation, buildable envelope),
//! validates building footprints against it, simplifies noisy boundaries and infers the
//! direction the principal facade should face.
//! Every operation is a pure function of its inputs.

/// Geometric primitives and the geographic <-> local projection layer
pub mod geometry;

/// Area, perimeter, centroid, bounds, edges and principal-axis orientation of site polygons
pub mod metrics;

/// Setback insets producing the buildable area of a site
pub mod setback;

/// Point containment, footprint validation and per-vertex footprint correction
pub mod compliance;

/// Douglas-Peucker simplification and right-angle snapping
pub mod simplification;

/// Entrance direction inference from shape, roads and solar preference
pub mod entrance;

/// The composed site analysis flow
pub mod analysis;

/// Importing external site descriptions and exporting analysis reports
pub mod io;

/// Helper functions and configuration which do not belong to any specific module
pub mod util;
