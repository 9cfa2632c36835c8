//! Reference dataset formats
//!
//! Readers turn files into `FormatDataset`s: plain features with their
//! properties and raw geometry. Interpreting those features as areas is left to
//! the library loader, which knows the dataset's keys and kind.

use serde_json::{Map, Value};

use broadcast_areas_core::models::Ring;

pub mod geojson;

pub use self::geojson::GeoJsonReader;

/// Dataset representation returned by format readers
#[derive(Debug, Clone)]
pub struct FormatDataset {
    /// Dataset name, taken from the file stem
    pub name: String,

    pub features: Vec<FormatFeature>,
}

/// A single feature read from a dataset
#[derive(Debug, Clone)]
pub struct FormatFeature {
    /// Position of the feature in its file
    pub index: usize,

    /// Feature level identifier, if the file has one
    pub id: Option<String>,

    pub properties: Map<String, Value>,

    /// Polygons as an exterior ring followed by any holes, `[long, lat]` order
    pub polygons: Vec<Vec<Ring>>,
}

impl FormatFeature {
    /// Human readable reference used in error messages
    pub fn label(&self, dataset: &str) -> String {
        match &self.id {
            Some(id) => format!("{}#{}", dataset, id),
            None => format!("{}[{}]", dataset, self.index),
        }
    }

    /// The first of `keys` present as a non-empty string or number
    pub fn first_property(&self, keys: &[String]) -> Option<String> {
        keys.iter().find_map(|key| match self.properties.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    /// Numeric property, accepting numbers written as strings
    pub fn number_property(&self, key: &str) -> Option<f64> {
        match self.properties.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}
