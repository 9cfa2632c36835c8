//! Serializable results for `--json` output

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LibrariesOutput {
    pub libraries: Vec<LibraryInfo>,
}

#[derive(Debug, Serialize)]
pub struct LibraryInfo {
    pub id: String,
    pub name: String,
    pub name_singular: String,
    pub is_group: bool,
    pub area_count: usize,
    pub examples: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AreasOutput {
    pub library: String,
    pub areas: Vec<AreaInfo>,
}

#[derive(Debug, Serialize)]
pub struct AreaInfo {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub parent_id: Option<String>,
    pub count_of_phones: f64,
}

/// Derived values for a selection of library areas
#[derive(Debug, Serialize)]
pub struct SummaryOutput {
    pub ids: Vec<String>,
    pub names: Vec<String>,
    pub parent_names: Vec<String>,
    pub summary: Vec<String>,
    pub count_of_phones: f64,
    pub count_of_phones_likely: f64,
    pub shape: ShapeInfo,
}

/// Derived values for a drawn shape
#[derive(Debug, Serialize)]
pub struct CustomOutput {
    pub name: String,
    pub input: ShapeInfo,
    pub shape: ShapeInfo,
    pub overlapping: Vec<String>,
    pub count_of_phones: f64,
    pub count_of_phones_likely: f64,
}

#[derive(Debug, Serialize)]
pub struct ShapeInfo {
    pub polygon_count: usize,
    pub point_count: usize,
    /// Square miles
    pub estimated_area: f64,
}

#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub values: Vec<ConfigEntry>,
}

#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub source: String,
}
