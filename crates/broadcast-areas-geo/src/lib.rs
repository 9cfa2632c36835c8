//! Broadcast Areas Geo - Polygon pipeline for cell broadcast shapes
//!
//! This crate wraps the `geo` crate behind a narrow set of primitives and builds
//! the `PolygonSet` pipeline (smooth, simplify, bleed, remove too small) on top.

pub mod index;
pub mod polygons;
pub mod primitives;
pub mod validation;

pub use index::{IndexedShape, ShapeIndex};
pub use polygons::PolygonSet;
pub use primitives::JoinStyle;
pub use validation::{polygon_from_rings, validate_rings, ValidationError, ValidationResult};
