//! GeoJSON format reader implementation

use std::fs;
use std::path::Path;

use broadcast_areas_core::error::{BroadcastAreasError, Result};
use broadcast_areas_core::models::Ring;
use broadcast_areas_geo::PolygonSet;
use geojson::{GeoJson, Value};

use crate::formats::{FormatDataset, FormatFeature};

/// GeoJSON format reader
pub struct GeoJsonReader;

impl GeoJsonReader {
    /// Read every feature of a GeoJSON file
    pub fn read(&self, path: &Path) -> Result<FormatDataset> {
        if !path.exists() {
            return Err(BroadcastAreasError::DatasetNotFound { path: path.to_path_buf() });
        }

        let content = fs::read_to_string(path)?;

        // Get dataset name from filename
        let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("unnamed");

        self.read_str(name, &content)
    }

    /// Parse GeoJSON text as a dataset called `name`
    pub fn read_str(&self, name: &str, content: &str) -> Result<FormatDataset> {
        let geojson: GeoJson = content.parse().map_err(|e| BroadcastAreasError::Format {
            format: "GeoJSON".to_string(),
            reason: format!("Failed to parse {}: {}", name, e),
        })?;

        let features = match geojson {
            GeoJson::FeatureCollection(fc) => {
                if let Some(crs) = fc.foreign_members.as_ref().and_then(|fm| fm.get("crs")) {
                    check_crs(name, crs)?;
                }
                fc.features
                    .iter()
                    .enumerate()
                    .map(|(idx, feature)| convert_feature(name, feature, idx))
                    .collect::<Result<Vec<_>>>()?
            }
            GeoJson::Feature(feature) => vec![convert_feature(name, &feature, 0)?],
            GeoJson::Geometry(geometry) => {
                // Single geometry - wrap in a feature
                let label = format!("{}[0]", name);
                vec![FormatFeature {
                    index: 0,
                    id: None,
                    properties: Default::default(),
                    polygons: polygon_rings(&label, &geometry.value)?,
                }]
            }
        };

        Ok(FormatDataset { name: name.to_string(), features })
    }

    /// Read a file of drawn shapes as one polygon set, ignoring properties
    pub fn read_polygon_set(&self, path: &Path) -> Result<PolygonSet> {
        let dataset = self.read(path)?;
        let polygons: Vec<Vec<Ring>> =
            dataset.features.into_iter().flat_map(|feature| feature.polygons).collect();
        PolygonSet::from_polygon_rings(&polygons)
    }
}

fn convert_feature(dataset: &str, feature: &geojson::Feature, idx: usize) -> Result<FormatFeature> {
    let id = feature.id.as_ref().map(|id| match id {
        geojson::feature::Id::String(s) => s.clone(),
        geojson::feature::Id::Number(n) => n.to_string(),
    });

    let mut converted = FormatFeature {
        index: idx,
        id,
        properties: feature.properties.clone().unwrap_or_default(),
        polygons: Vec::new(),
    };

    let label = converted.label(dataset);
    converted.polygons = match &feature.geometry {
        Some(geometry) => polygon_rings(&label, &geometry.value)?,
        None => {
            return Err(BroadcastAreasError::UnsupportedGeometry {
                feature: label,
                found: "null".to_string(),
            })
        }
    };

    Ok(converted)
}

/// Rings of every polygon in a `Polygon` or `MultiPolygon` geometry
fn polygon_rings(feature: &str, value: &Value) -> Result<Vec<Vec<Ring>>> {
    match value {
        Value::Polygon(polygon) => Ok(vec![to_rings(feature, polygon)?]),
        Value::MultiPolygon(polygons) => {
            polygons.iter().map(|polygon| to_rings(feature, polygon)).collect()
        }
        other => Err(BroadcastAreasError::UnsupportedGeometry {
            feature: feature.to_string(),
            found: geometry_type_name(other).to_string(),
        }),
    }
}

fn to_rings(feature: &str, polygon: &[Vec<Vec<f64>>]) -> Result<Vec<Ring>> {
    polygon
        .iter()
        .map(|ring| {
            ring.iter()
                .map(|position| match position.as_slice() {
                    [x, y, ..] => Ok([*x, *y]),
                    _ => Err(BroadcastAreasError::InvalidGeometry {
                        location: feature.to_string(),
                        reason: format!("Position needs at least 2 values, found {}", position.len()),
                    }),
                })
                .collect::<Result<Ring>>()
        })
        .collect()
}

fn geometry_type_name(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

/// Reference data must be WGS84 longitude/latitude
fn check_crs(dataset: &str, crs: &serde_json::Value) -> Result<()> {
    let name = crs.get("properties").and_then(|props| props.get("name")).and_then(|n| n.as_str());

    match name {
        None => Ok(()),
        Some(name) if name.ends_with("CRS84") || name.ends_with(":4326") => Ok(()),
        Some(name) => Err(BroadcastAreasError::Format {
            format: "GeoJSON".to_string(),
            reason: format!("{} uses CRS {}; expected WGS84 longitude/latitude", dataset, name),
        }),
    }
}
