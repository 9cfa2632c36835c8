use broadcast_areas_core::error::{BroadcastAreasError, Result};
use broadcast_areas_core::models::AreaKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Description of every area library and the datasets it is built from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryManifest {
    #[serde(default)]
    pub libraries: Vec<LibraryDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryDefinition {
    pub id: String,
    pub name: String,
    pub name_singular: String,

    /// Whether the library's areas form a hierarchy browsed by parent
    #[serde(default)]
    pub is_group: bool,

    #[serde(default)]
    pub datasets: Vec<DatasetDefinition>,
}

/// One GeoJSON file and how to read areas out of its features
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetDefinition {
    /// Relative to the manifest's directory
    pub path: PathBuf,
    pub kind: AreaKind,

    /// Property keys tried in order for the identifier; the feature id is the fallback
    #[serde(default)]
    pub id_keys: Vec<String>,

    /// Property keys tried in order for the display name
    pub name_keys: Vec<String>,

    #[serde(default)]
    pub parent_keys: Vec<String>,

    #[serde(default)]
    pub id_prefix: Option<String>,

    #[serde(default)]
    pub parent_prefix: Option<String>,

    #[serde(default = "default_phones_key")]
    pub phones_key: String,
}

fn default_phones_key() -> String {
    "count_of_phones".to_string()
}

impl LibraryManifest {
    /// Load a manifest from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(BroadcastAreasError::DatasetNotFound { path: path.to_path_buf() });
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| BroadcastAreasError::Format {
            format: "manifest".to_string(),
            reason: format!("Failed to parse TOML: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest() {
        let manifest = LibraryManifest::from_toml_str(
            r#"
[[libraries]]
id = "wd20-lad20-ctyua19"
name = "Local authorities"
name_singular = "local authority"
is_group = true

[[libraries.datasets]]
path = "wards.geojson"
kind = "electoral-ward"
id_keys = ["WD20CD"]
id_prefix = "wd20-"
name_keys = ["WD20NM", "name"]
parent_keys = ["LAD20CD"]
parent_prefix = "lad20-"
"#,
        )
        .unwrap();

        let library = &manifest.libraries[0];
        assert!(library.is_group);

        let dataset = &library.datasets[0];
        assert_eq!(dataset.kind, AreaKind::ElectoralWard);
        assert_eq!(dataset.name_keys, vec!["WD20NM", "name"]);
        assert_eq!(dataset.id_prefix.as_deref(), Some("wd20-"));
        assert_eq!(dataset.phones_key, "count_of_phones");
    }

    #[test]
    fn test_unknown_kind_is_a_format_error() {
        let result = LibraryManifest::from_toml_str(
            r#"
[[libraries]]
id = "x"
name = "X"
name_singular = "x"

[[libraries.datasets]]
path = "x.geojson"
kind = "parish"
name_keys = ["name"]
"#,
        );

        assert!(matches!(result, Err(BroadcastAreasError::Format { .. })));
    }

    #[test]
    fn test_missing_manifest() {
        let result = LibraryManifest::load("/nonexistent/libraries.toml");
        assert!(matches!(result, Err(BroadcastAreasError::DatasetNotFound { .. })));
    }
}
