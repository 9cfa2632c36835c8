//! Summarising a selection as the named regions it covers
//!
//! Custom shapes are first matched to the electoral wards they overlap. Wards
//! are then named by their local authority, and lower-tier authorities are
//! replaced by their county once enough of the county's districts are touched,
//! or every one of them is.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use broadcast_areas_core::models::AreaKind;
use tracing::debug;

use crate::area::{BroadcastArea, ReferenceArea, SharedArea};
use crate::library::AreaLibraries;

/// Smallest set of named regions covering `areas`, sorted by name.
///
/// Selections that overlap no reference data give an empty list.
pub fn aggregate_areas(
    libraries: &AreaLibraries,
    areas: &[SharedArea],
    grouping_threshold: usize,
) -> Vec<Arc<ReferenceArea>> {
    let leaves = resolve_leaves(libraries, areas);
    let authorities = dedupe(leaves.into_iter().map(|area| ward_to_authority(libraries, area)));

    let mut by_parent: BTreeMap<String, Vec<Arc<ReferenceArea>>> = BTreeMap::new();
    let mut summary = Vec::new();

    for area in authorities {
        let parent = area
            .parent_id()
            .filter(|_| area.kind() == AreaKind::LowerTierAuthority)
            .map(str::to_string);
        match parent {
            Some(parent) => by_parent.entry(parent).or_default().push(area),
            None => summary.push(area),
        }
    }

    for (parent_id, group) in by_parent {
        // A parent is named once enough of its children are touched, or all of them
        let covers_parent = group.len() >= grouping_threshold
            || group.len() == libraries.children(&parent_id).len();
        match libraries.get_area(&parent_id) {
            Some(parent) if covers_parent => {
                debug!(parent = parent.name(), children = group.len(), "Grouped authorities under parent");
                summary.push(parent);
            }
            _ => summary.extend(group),
        }
    }

    let mut summary = dedupe(summary.into_iter());
    summary.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(b.id())));
    summary
}

/// Names of `aggregate_areas`, in the same order
pub fn summarised_area_names(
    libraries: &AreaLibraries,
    areas: &[SharedArea],
    grouping_threshold: usize,
) -> Vec<String> {
    aggregate_areas(libraries, areas, grouping_threshold)
        .iter()
        .map(|area| area.name().to_string())
        .collect()
}

/// Reference areas for a selection, with custom shapes swapped for the wards they overlap
fn resolve_leaves(libraries: &AreaLibraries, areas: &[SharedArea]) -> Vec<Arc<ReferenceArea>> {
    let mut leaves = Vec::new();

    for area in areas {
        if area.is_custom() {
            leaves.extend(libraries.overlapping_wards(area.polygons()));
        } else if let Some(reference) = libraries.get_area(area.id()) {
            leaves.push(reference);
        }
    }

    leaves
}

fn ward_to_authority(libraries: &AreaLibraries, area: Arc<ReferenceArea>) -> Arc<ReferenceArea> {
    if area.kind() != AreaKind::ElectoralWard {
        return area;
    }

    area.parent_id().and_then(|parent| libraries.get_area(parent)).unwrap_or(area)
}

fn dedupe(areas: impl Iterator<Item = Arc<ReferenceArea>>) -> Vec<Arc<ReferenceArea>> {
    let mut seen = HashSet::new();
    areas.filter(|area| seen.insert(area.id().to_string())).collect()
}
