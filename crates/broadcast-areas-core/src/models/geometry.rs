//! Coordinate types shared between the geometry pipeline and its callers.
//!
//! Polygons cross crate boundaries as plain rings of `[x, y]` pairs so that
//! records can be serialised without depending on the geometry engine.

use serde::{Deserialize, Serialize};

/// A single `[x, y]` coordinate
pub type CoordinatePair = [f64; 2];

/// A ring of coordinates; closed rings repeat the first coordinate at the end
pub type Ring = Vec<CoordinatePair>;

/// Axis order used when exporting or importing coordinate pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AxisOrder {
    /// `[longitude, latitude]`, the GeoJSON order
    #[default]
    LongLat,
    /// `[latitude, longitude]`, the order stored on broadcast messages
    LatLong,
}

impl AxisOrder {
    /// Reorder a pair between this axis order and `[longitude, latitude]`.
    ///
    /// The swap is its own inverse, so the same call converts in both directions.
    pub fn apply(&self, pair: CoordinatePair) -> CoordinatePair {
        match self {
            AxisOrder::LongLat => pair,
            AxisOrder::LatLong => [pair[1], pair[0]],
        }
    }
}
