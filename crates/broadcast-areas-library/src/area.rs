use std::fmt;
use std::sync::Arc;

use broadcast_areas_core::models::AreaKind;
use broadcast_areas_geo::PolygonSet;

use crate::library::AreaLibraries;

/// Anything that can be selected as the target of a broadcast
pub trait BroadcastArea: fmt::Debug + Send + Sync {
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    /// Identifier of the enclosing area, used only for summaries
    fn parent_id(&self) -> Option<&str>;

    fn kind(&self) -> AreaKind;

    /// Full detail boundary
    fn polygons(&self) -> &PolygonSet;

    /// Boundary ready for transmission
    fn simple_polygons(&self) -> &PolygonSet;

    fn count_of_phones(&self) -> f64;

    /// Custom areas are matched against reference data by shape, not by identifier
    fn is_custom(&self) -> bool {
        self.kind() == AreaKind::Custom
    }
}

pub type SharedArea = Arc<dyn BroadcastArea>;

/// An area loaded from a reference dataset
#[derive(Debug, Clone)]
pub struct ReferenceArea {
    id: String,
    name: String,
    parent_id: Option<String>,
    kind: AreaKind,
    library_id: String,
    polygons: PolygonSet,
    count_of_phones: f64,
}

impl ReferenceArea {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: AreaKind,
        polygons: PolygonSet,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: None,
            kind,
            library_id: String::new(),
            polygons,
            count_of_phones: 0.0,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_library(mut self, library_id: impl Into<String>) -> Self {
        self.library_id = library_id.into();
        self
    }

    pub fn with_phones(mut self, count_of_phones: f64) -> Self {
        self.count_of_phones = count_of_phones;
        self
    }

    pub fn library_id(&self) -> &str {
        &self.library_id
    }
}

impl BroadcastArea for ReferenceArea {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    fn kind(&self) -> AreaKind {
        self.kind
    }

    fn polygons(&self) -> &PolygonSet {
        &self.polygons
    }

    fn simple_polygons(&self) -> &PolygonSet {
        self.polygons.remove_too_small().smooth().simplify()
    }

    fn count_of_phones(&self) -> f64 {
        self.count_of_phones
    }
}

/// A shape drawn by a user or supplied directly, outside the reference hierarchy
#[derive(Debug, Clone)]
pub struct CustomBroadcastArea {
    name: String,
    polygons: PolygonSet,
    count_of_phones: f64,
}

impl CustomBroadcastArea {
    pub fn new(name: impl Into<String>, polygons: PolygonSet) -> Self {
        Self { name: name.into(), polygons, count_of_phones: 0.0 }
    }

    /// Estimate the phone count from the electoral wards the shape overlaps
    pub fn estimated(name: impl Into<String>, polygons: PolygonSet, libraries: &AreaLibraries) -> Self {
        let count_of_phones = libraries.estimate_phones(&polygons);
        Self { name: name.into(), polygons, count_of_phones }
    }

    pub fn with_phones(mut self, count_of_phones: f64) -> Self {
        self.count_of_phones = count_of_phones;
        self
    }
}

impl BroadcastArea for CustomBroadcastArea {
    // Custom areas are identified by their name
    fn id(&self) -> &str {
        &self.name
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parent_id(&self) -> Option<&str> {
        None
    }

    fn kind(&self) -> AreaKind {
        AreaKind::Custom
    }

    fn polygons(&self) -> &PolygonSet {
        &self.polygons
    }

    fn simple_polygons(&self) -> &PolygonSet {
        &self.polygons
    }

    fn count_of_phones(&self) -> f64 {
        self.count_of_phones
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use broadcast_areas_core::models::Ring;

    fn square(x: f64, y: f64, size: f64) -> Ring {
        vec![[x, y], [x + size, y], [x + size, y + size], [x, y + size], [x, y]]
    }

    #[test]
    fn test_reference_area_simple_polygons_drop_slivers() {
        let polygons = PolygonSet::from_coordinates(&[
            square(-2.2, 51.8, 0.1),
            square(-1.0, 51.0, 0.0001),
        ])
        .unwrap();
        let area = ReferenceArea::new("lad20-E07000078", "Cheltenham", AreaKind::LowerTierAuthority, polygons)
            .with_parent("ctyua19-E10000013");

        assert_eq!(area.polygons().len(), 2);
        assert_eq!(area.simple_polygons().len(), 1);
        assert_eq!(area.parent_id(), Some("ctyua19-E10000013"));
        assert!(!area.is_custom());
    }

    #[test]
    fn test_custom_area_simple_polygons_are_unchanged() {
        let polygons = PolygonSet::from_coordinates(&[square(0.0, 0.0, 0.0001)]).unwrap();
        let area = CustomBroadcastArea::new("Drawn shape", polygons.clone()).with_phones(12.0);

        assert_eq!(area.simple_polygons(), &polygons);
        assert_eq!(area.id(), "Drawn shape");
        assert_eq!(area.kind(), AreaKind::Custom);
        assert!(area.is_custom());
        assert_eq!(area.count_of_phones(), 12.0);
    }

    #[test]
    fn test_areas_share_one_interface() {
        let polygons = PolygonSet::from_coordinates(&[square(0.0, 0.0, 0.1)]).unwrap();
        let areas: Vec<SharedArea> = vec![
            Arc::new(ReferenceArea::new("a", "Alpha", AreaKind::Country, polygons.clone())),
            Arc::new(CustomBroadcastArea::new("Beta", polygons)),
        ];

        let names: Vec<&str> = areas.iter().map(|area| area.name()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
    }
}
