use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use broadcast_areas_core::error::{BroadcastAreasError, Result};
use broadcast_areas_core::models::AreaKind;
use broadcast_areas_geo::{PolygonSet, ShapeIndex};
use tracing::{debug, info};

use crate::area::{BroadcastArea, ReferenceArea};
use crate::formats::{FormatFeature, GeoJsonReader};
use crate::manifest::{DatasetDefinition, LibraryDefinition, LibraryManifest};

/// A named collection of reference areas, such as "Local authorities"
#[derive(Debug, Clone)]
pub struct AreaLibrary {
    pub id: String,
    pub name: String,
    pub name_singular: String,
    pub is_group: bool,
    areas: Vec<Arc<ReferenceArea>>,
}

impl AreaLibrary {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        name_singular: impl Into<String>,
        is_group: bool,
        areas: Vec<ReferenceArea>,
    ) -> Self {
        let id = id.into();
        let areas = areas.into_iter().map(|area| Arc::new(area.with_library(id.clone()))).collect();
        Self { id, name: name.into(), name_singular: name_singular.into(), is_group, areas }
    }

    pub fn areas(&self) -> &[Arc<ReferenceArea>] {
        &self.areas
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}

/// Every loaded library, with identifier and overlap lookups across all of them
pub struct AreaLibraries {
    libraries: Vec<AreaLibrary>,
    areas: HashMap<String, Arc<ReferenceArea>>,
    children: HashMap<String, Vec<Arc<ReferenceArea>>>,
    wards: Vec<Arc<ReferenceArea>>,
    ward_index: ShapeIndex,
}

impl AreaLibraries {
    /// Load every library listed in a manifest. Dataset paths are relative to the manifest.
    pub fn load<P: AsRef<Path>>(manifest_path: P) -> Result<Self> {
        let manifest_path = manifest_path.as_ref();
        let manifest = LibraryManifest::load(manifest_path)?;
        let base = manifest_path.parent().unwrap_or_else(|| Path::new("."));

        let libraries = manifest
            .libraries
            .iter()
            .map(|definition| load_library(base, definition))
            .collect::<Result<Vec<_>>>()?;

        Self::from_libraries(libraries)
    }

    /// Validate and index libraries.
    ///
    /// Fails when an identifier appears twice anywhere, when a parent is
    /// unknown, or when parent links form a cycle.
    pub fn from_libraries(libraries: Vec<AreaLibrary>) -> Result<Self> {
        let mut areas: HashMap<String, Arc<ReferenceArea>> = HashMap::new();
        for area in libraries.iter().flat_map(|library| library.areas.iter()) {
            if areas.insert(area.id().to_string(), area.clone()).is_some() {
                return Err(BroadcastAreasError::DuplicateAreaId { id: area.id().to_string() });
            }
        }

        let mut children: HashMap<String, Vec<Arc<ReferenceArea>>> = HashMap::new();
        for area in libraries.iter().flat_map(|library| library.areas.iter()) {
            if let Some(parent) = area.parent_id() {
                if !areas.contains_key(parent) {
                    return Err(BroadcastAreasError::UnknownParentArea {
                        id: area.id().to_string(),
                        parent: parent.to_string(),
                    });
                }
                check_for_cycle(area, &areas)?;
                children.entry(parent.to_string()).or_default().push(area.clone());
            }
        }
        for siblings in children.values_mut() {
            sort_by_name(siblings);
        }

        let wards: Vec<Arc<ReferenceArea>> = libraries
            .iter()
            .flat_map(|library| library.areas.iter())
            .filter(|area| area.kind() == AreaKind::ElectoralWard)
            .cloned()
            .collect();
        let ward_index =
            ShapeIndex::from_shapes(wards.iter().enumerate().map(|(i, ward)| (i, ward.polygons())));

        info!(
            libraries = libraries.len(),
            areas = areas.len(),
            wards = wards.len(),
            "Area libraries ready"
        );

        Ok(Self { libraries, areas, children, wards, ward_index })
    }

    pub fn libraries(&self) -> &[AreaLibrary] {
        &self.libraries
    }

    pub fn get_library(&self, id: &str) -> Result<&AreaLibrary> {
        self.libraries
            .iter()
            .find(|library| library.id == id)
            .ok_or_else(|| BroadcastAreasError::LibraryNotFound { id: id.to_string() })
    }

    pub fn get_area(&self, id: &str) -> Option<Arc<ReferenceArea>> {
        self.areas.get(id).cloned()
    }

    /// Resolve identifiers in request order.
    ///
    /// Every identifier must resolve; anything missing is reported as a count
    /// mismatch rather than dropped.
    pub fn get_areas<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<Arc<ReferenceArea>>> {
        let found: Vec<Arc<ReferenceArea>> =
            ids.iter().filter_map(|id| self.get_area(id.as_ref())).collect();

        if found.len() != ids.len() {
            return Err(BroadcastAreasError::AreaCountMismatch {
                requested: ids.len(),
                found: found.len(),
            });
        }

        Ok(found)
    }

    /// Number of areas across every library
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Direct children of an area, sorted by name
    pub fn children(&self, id: &str) -> Vec<Arc<ReferenceArea>> {
        self.children.get(id).cloned().unwrap_or_default()
    }

    /// Enclosing areas, nearest first
    pub fn ancestors(&self, id: &str) -> Vec<Arc<ReferenceArea>> {
        let mut ancestors = Vec::new();
        let mut current = self.get_area(id);

        while let Some(parent) =
            current.as_ref().and_then(|area| area.parent_id()).and_then(|parent| self.get_area(parent))
        {
            ancestors.push(parent.clone());
            current = Some(parent);
        }

        ancestors
    }

    /// Up to `count` area names from a library, alphabetically.
    ///
    /// For grouped libraries only the top of the hierarchy is sampled.
    pub fn examples(&self, library_id: &str, count: usize) -> Result<Vec<String>> {
        let library = self.get_library(library_id)?;

        let mut names: Vec<String> = library
            .areas
            .iter()
            .filter(|area| !library.is_group || area.parent_id().is_none())
            .map(|area| area.name().to_string())
            .collect();
        names.sort();
        names.truncate(count);

        Ok(names)
    }

    /// Electoral wards whose boundaries intersect `polygons`, in load order
    pub fn overlapping_wards(&self, polygons: &PolygonSet) -> Vec<Arc<ReferenceArea>> {
        let wards: Vec<Arc<ReferenceArea>> = self
            .ward_index
            .overlapping(polygons, |i| self.wards[i].polygons())
            .into_iter()
            .map(|i| self.wards[i].clone())
            .collect();

        debug!(wards = wards.len(), "Found overlapping electoral wards");
        wards
    }

    /// Phones in the wards a shape overlaps, each weighted by how much of the ward is covered
    pub fn estimate_phones(&self, polygons: &PolygonSet) -> f64 {
        self.overlapping_wards(polygons)
            .iter()
            .map(|ward| ward.count_of_phones() * polygons.coverage_of(ward.polygons()))
            .sum()
    }
}

impl fmt::Debug for AreaLibraries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AreaLibraries")
            .field("libraries", &self.libraries.iter().map(|l| &l.id).collect::<Vec<_>>())
            .field("areas", &self.areas.len())
            .field("wards", &self.wards.len())
            .finish()
    }
}

fn sort_by_name(areas: &mut [Arc<ReferenceArea>]) {
    areas.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(b.id())));
}

fn check_for_cycle(area: &ReferenceArea, areas: &HashMap<String, Arc<ReferenceArea>>) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::from([area.id()]);
    let mut parent = area.parent_id();

    while let Some(id) = parent {
        if !seen.insert(id) {
            return Err(BroadcastAreasError::ParentCycle { id: area.id().to_string() });
        }
        parent = areas.get(id).and_then(|next| next.parent_id());
    }

    Ok(())
}

fn load_library(base: &Path, definition: &LibraryDefinition) -> Result<AreaLibrary> {
    let mut areas = Vec::new();

    for dataset in &definition.datasets {
        let path = base.join(&dataset.path);
        let format_dataset = GeoJsonReader.read(&path)?;

        let before = areas.len();
        for feature in &format_dataset.features {
            areas.push(area_from_feature(&format_dataset.name, feature, dataset)?);
        }

        info!(
            library = %definition.id,
            dataset = %path.display(),
            kind = %dataset.kind,
            areas = areas.len() - before,
            "Loaded reference dataset"
        );
    }

    Ok(AreaLibrary::new(
        definition.id.clone(),
        definition.name.clone(),
        definition.name_singular.clone(),
        definition.is_group,
        areas,
    ))
}

fn area_from_feature(
    dataset_name: &str,
    feature: &FormatFeature,
    dataset: &DatasetDefinition,
) -> Result<ReferenceArea> {
    let label = feature.label(dataset_name);

    let raw_id = feature.first_property(&dataset.id_keys).or_else(|| feature.id.clone()).ok_or_else(
        || BroadcastAreasError::MissingAreaId {
            feature: label.clone(),
            candidates: dataset.id_keys.clone(),
        },
    )?;
    let id = with_prefix(dataset.id_prefix.as_deref(), raw_id);

    let name = feature.first_property(&dataset.name_keys).ok_or_else(|| {
        BroadcastAreasError::MissingAreaName {
            feature: label.clone(),
            candidates: dataset.name_keys.clone(),
        }
    })?;

    let polygons = PolygonSet::from_polygon_rings(&feature.polygons).map_err(|e| match e {
        BroadcastAreasError::InvalidGeometry { location, reason } => {
            BroadcastAreasError::InvalidGeometry { location: format!("{} {}", label, location), reason }
        }
        other => other,
    })?;

    let mut area = ReferenceArea::new(id, name, dataset.kind, polygons)
        .with_phones(feature.number_property(&dataset.phones_key).unwrap_or(0.0));

    if let Some(parent) = feature.first_property(&dataset.parent_keys) {
        area = area.with_parent(with_prefix(dataset.parent_prefix.as_deref(), parent));
    }

    Ok(area)
}

fn with_prefix(prefix: Option<&str>, value: String) -> String {
    match prefix {
        Some(prefix) if !value.starts_with(prefix) => format!("{}{}", prefix, value),
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use broadcast_areas_core::models::Ring;

    fn square(x: f64, y: f64, size: f64) -> PolygonSet {
        let ring: Ring = vec![[x, y], [x + size, y], [x + size, y + size], [x, y + size], [x, y]];
        PolygonSet::from_coordinates(&[ring]).unwrap()
    }

    fn area(id: &str, name: &str, kind: AreaKind, parent: Option<&str>) -> ReferenceArea {
        let area = ReferenceArea::new(id, name, kind, square(0.0, 0.0, 1.0));
        match parent {
            Some(parent) => area.with_parent(parent),
            None => area,
        }
    }

    fn library(areas: Vec<ReferenceArea>) -> AreaLibrary {
        AreaLibrary::new("test", "Test areas", "test area", true, areas)
    }

    #[test]
    fn test_duplicate_ids_fail_across_libraries() {
        let first = AreaLibrary::new(
            "one",
            "One",
            "one",
            false,
            vec![area("dup", "First", AreaKind::Country, None)],
        );
        let second = AreaLibrary::new(
            "two",
            "Two",
            "two",
            false,
            vec![area("dup", "Second", AreaKind::Country, None)],
        );

        match AreaLibraries::from_libraries(vec![first, second]) {
            Err(BroadcastAreasError::DuplicateAreaId { id }) => assert_eq!(id, "dup"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_parent_fails() {
        let result = AreaLibraries::from_libraries(vec![library(vec![area(
            "child",
            "Child",
            AreaKind::LowerTierAuthority,
            Some("missing"),
        )])]);

        assert!(matches!(
            result,
            Err(BroadcastAreasError::UnknownParentArea { ref parent, .. }) if parent == "missing"
        ));
    }

    #[test]
    fn test_parent_cycle_fails() {
        let result = AreaLibraries::from_libraries(vec![library(vec![
            area("a", "A", AreaKind::LowerTierAuthority, Some("b")),
            area("b", "B", AreaKind::UpperTierAuthority, Some("a")),
        ])]);

        assert!(matches!(result, Err(BroadcastAreasError::ParentCycle { .. })));
    }

    #[test]
    fn test_self_parent_is_a_cycle() {
        let result = AreaLibraries::from_libraries(vec![library(vec![area(
            "a",
            "A",
            AreaKind::UpperTierAuthority,
            Some("a"),
        )])]);

        assert!(matches!(result, Err(BroadcastAreasError::ParentCycle { ref id }) if id == "a"));
    }

    #[test]
    fn test_get_areas_reports_counts() {
        let libraries = AreaLibraries::from_libraries(vec![library(vec![area(
            "a",
            "A",
            AreaKind::Country,
            None,
        )])])
        .unwrap();

        let err = libraries.get_areas(&["a", "nope"]).unwrap_err();
        assert_eq!(err.to_string(), "Requested 2 areas but found 1");

        let found = libraries.get_areas(&["a"]).unwrap();
        assert_eq!(found[0].library_id(), "test");
    }

    #[test]
    fn test_hierarchy_queries() {
        let libraries = AreaLibraries::from_libraries(vec![library(vec![
            area("county", "County", AreaKind::UpperTierAuthority, None),
            area("z-district", "Zeta", AreaKind::LowerTierAuthority, Some("county")),
            area("a-district", "Alpha", AreaKind::LowerTierAuthority, Some("county")),
            area("ward", "Ward", AreaKind::ElectoralWard, Some("z-district")),
        ])])
        .unwrap();

        let children: Vec<String> =
            libraries.children("county").iter().map(|a| a.name().to_string()).collect();
        assert_eq!(children, vec!["Alpha", "Zeta"]);

        let ancestors: Vec<String> =
            libraries.ancestors("ward").iter().map(|a| a.id().to_string()).collect();
        assert_eq!(ancestors, vec!["z-district", "county"]);
        assert!(libraries.ancestors("county").is_empty());

        assert_eq!(libraries.examples("test", 5).unwrap(), vec!["County"]);
        assert!(matches!(
            libraries.examples("missing", 5),
            Err(BroadcastAreasError::LibraryNotFound { .. })
        ));
    }

    #[test]
    fn test_estimate_phones_weights_by_coverage() {
        let ward = ReferenceArea::new("ward", "Ward", AreaKind::ElectoralWard, square(0.0, 0.0, 1.0))
            .with_phones(1000.0);
        let libraries = AreaLibraries::from_libraries(vec![library(vec![ward])]).unwrap();

        let half = PolygonSet::from_coordinates(&[vec![
            [0.0, 0.0],
            [0.5, 0.0],
            [0.5, 1.0],
            [0.0, 1.0],
            [0.0, 0.0],
        ]])
        .unwrap();

        assert_eq!(libraries.overlapping_wards(&half).len(), 1);
        assert!((libraries.estimate_phones(&half) - 500.0).abs() < 1e-6);
        assert_eq!(libraries.estimate_phones(&square(50.0, 50.0, 1.0)), 0.0);
    }

    #[test]
    fn test_prefixes_are_not_doubled() {
        assert_eq!(with_prefix(Some("wd20-"), "E05004294".to_string()), "wd20-E05004294");
        assert_eq!(with_prefix(Some("wd20-"), "wd20-E05004294".to_string()), "wd20-E05004294");
        assert_eq!(with_prefix(None, "E05004294".to_string()), "E05004294");
    }
}
