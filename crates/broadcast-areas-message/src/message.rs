use std::collections::HashSet;
use std::sync::Arc;

use broadcast_areas_core::config::{
    LayeredConfig, DEFAULT_BROADCAST_DURATION_MINUTES, DEFAULT_GROUPING_THRESHOLD,
};
use broadcast_areas_core::error::{BroadcastAreasError, Result};
use broadcast_areas_core::models::{
    AxisOrder, BroadcastAreaSelection, BroadcastMessageRecord, BroadcastMessageUpdate,
    BroadcastStatus,
};
use broadcast_areas_core::ports::BroadcastMessageApi;
use broadcast_areas_geo::PolygonSet;
use broadcast_areas_library::{
    aggregate_areas, AreaLibraries, BroadcastArea, CustomBroadcastArea, ReferenceArea, SharedArea,
};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::rounding::round_to_significant_figures;

/// How many area names to show before truncating
const INITIAL_AREA_NAME_COUNT: usize = 10;

const CUSTOM_AREA_NAME: &str = "Custom area";

/// Settings that shape derived values and lifecycle timestamps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BroadcastSettings {
    pub grouping_threshold: usize,
    pub duration: Duration,
}

impl Default for BroadcastSettings {
    fn default() -> Self {
        Self {
            grouping_threshold: DEFAULT_GROUPING_THRESHOLD,
            duration: Duration::minutes(DEFAULT_BROADCAST_DURATION_MINUTES),
        }
    }
}

impl From<&LayeredConfig> for BroadcastSettings {
    fn from(config: &LayeredConfig) -> Self {
        Self {
            grouping_threshold: config.grouping_threshold.value,
            duration: Duration::minutes(config.broadcast_duration_minutes.value),
        }
    }
}

/// One broadcast message, its selected areas, and everything derived from them.
///
/// Holds no geometry of its own: every shape and estimate is computed on
/// demand from the area libraries. Changes are sent through the message API
/// and then applied to the local record.
pub struct BroadcastMessage<'a> {
    record: BroadcastMessageRecord,
    libraries: &'a AreaLibraries,
    api: &'a dyn BroadcastMessageApi,
    settings: BroadcastSettings,
}

impl<'a> BroadcastMessage<'a> {
    pub fn new(
        record: BroadcastMessageRecord,
        libraries: &'a AreaLibraries,
        api: &'a dyn BroadcastMessageApi,
    ) -> Self {
        Self { record, libraries, api, settings: BroadcastSettings::default() }
    }

    pub fn with_settings(mut self, settings: BroadcastSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn id(&self) -> Uuid {
        self.record.id
    }

    pub fn record(&self) -> &BroadcastMessageRecord {
        &self.record
    }

    /// Status as of `now`: a broadcast past its finish time reads as completed
    pub fn status_at(&self, now: DateTime<Utc>) -> BroadcastStatus {
        match (self.record.status, self.record.finishes_at) {
            (BroadcastStatus::Broadcasting, Some(finishes_at)) if finishes_at < now => {
                BroadcastStatus::Completed
            }
            (status, _) => status,
        }
    }

    pub fn status(&self) -> BroadcastStatus {
        self.status_at(Utc::now())
    }

    /// Selected areas in selection order.
    ///
    /// A message with no stored identifiers but stored polygons was drawn by
    /// hand; it is represented by a single custom area.
    pub fn areas(&self) -> Result<Vec<SharedArea>> {
        let selection = &self.record.areas;

        if selection.ids.is_empty() && !selection.simple_polygons.is_empty() {
            let polygons =
                PolygonSet::from_coordinate_pairs(&selection.simple_polygons, AxisOrder::LatLong)?;
            let name = if selection.names.is_empty() {
                CUSTOM_AREA_NAME.to_string()
            } else {
                selection.names.join(", ")
            };
            let area: SharedArea =
                Arc::new(CustomBroadcastArea::estimated(name, polygons, self.libraries));
            return Ok(vec![area]);
        }

        Ok(self
            .libraries
            .get_areas(&selection.ids)?
            .into_iter()
            .map(|area| area as SharedArea)
            .collect())
    }

    /// Every area enclosing a selected area, sorted by name
    pub fn parent_areas(&self) -> Result<Vec<Arc<ReferenceArea>>> {
        let mut seen = HashSet::new();
        let mut parents: Vec<Arc<ReferenceArea>> = self
            .areas()?
            .iter()
            .flat_map(|area| self.libraries.ancestors(area.id()))
            .filter(|parent| seen.insert(parent.id().to_string()))
            .collect();

        parents.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(b.id())));
        Ok(parents)
    }

    pub fn initial_area_names(&self) -> Result<Vec<String>> {
        Ok(self
            .areas()?
            .iter()
            .take(INITIAL_AREA_NAME_COUNT)
            .map(|area| area.name().to_string())
            .collect())
    }

    pub fn summarised_areas(&self) -> Result<Vec<Arc<ReferenceArea>>> {
        Ok(aggregate_areas(self.libraries, &self.areas()?, self.settings.grouping_threshold))
    }

    pub fn summarised_area_names(&self) -> Result<Vec<String>> {
        Ok(self.summarised_areas()?.iter().map(|area| area.name().to_string()).collect())
    }

    /// Full detail outline of every selected area, without merging
    pub fn polygons(&self) -> Result<PolygonSet> {
        let areas = self.areas()?;
        Ok(PolygonSet::combined(areas.iter().map(|area| area.polygons())))
    }

    /// Broadcast-ready outline of the selection
    pub fn simple_polygons(&self) -> Result<PolygonSet> {
        Ok(Self::get_simple_polygons(&self.areas()?))
    }

    /// A single area's own simple polygons are used as they are. Several
    /// areas are combined, then smoothed and simplified again so the point
    /// count stays bounded.
    pub fn get_simple_polygons(areas: &[SharedArea]) -> PolygonSet {
        match areas {
            [] => PolygonSet::default(),
            [area] => area.simple_polygons().clone(),
            _ => PolygonSet::combined(areas.iter().map(|area| area.simple_polygons()))
                .smooth()
                .simplify()
                .clone(),
        }
    }

    /// Phones in the selected areas, to one significant figure
    pub fn count_of_phones(&self) -> Result<f64> {
        let total: f64 = self.areas()?.iter().map(|area| area.count_of_phones()).sum();
        Ok(round_to_significant_figures(total, 1))
    }

    /// Phones likely to receive the alert once signal bleed is taken into
    /// account, to one significant figure
    pub fn count_of_phones_likely(&self) -> Result<f64> {
        let phones = self.count_of_phones()?;
        let simple_polygons = self.simple_polygons()?;

        let area = simple_polygons.estimated_area();
        if area <= 0.0 {
            return Ok(phones);
        }
        let bleed_increase = simple_polygons.bleed().estimated_area() - area;

        Ok(round_to_significant_figures(phones + phones * bleed_increase / area, 1))
    }

    /// Add areas to the selection, ignoring any already selected
    pub fn add_areas<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<()> {
        let mut selected = self.record.areas.ids.clone();
        for id in ids {
            let id = id.as_ref();
            if !selected.iter().any(|existing| existing == id) {
                selected.push(id.to_string());
            }
        }

        self.update_areas(selected)
    }

    /// Remove an area from the selection; removing an unselected area changes nothing
    pub fn remove_area(&mut self, id: &str) -> Result<()> {
        let selected: Vec<String> =
            self.record.areas.ids.iter().filter(|existing| *existing != id).cloned().collect();

        self.update_areas(selected)
    }

    fn update_areas(&mut self, ids: Vec<String>) -> Result<()> {
        let areas: Vec<SharedArea> =
            self.libraries.get_areas(&ids)?.into_iter().map(|area| area as SharedArea).collect();

        let simple_polygons = Self::get_simple_polygons(&areas);
        let selection = BroadcastAreaSelection {
            names: areas.iter().map(|area| area.name().to_string()).collect(),
            aggregate_names: aggregate_areas(
                self.libraries,
                &areas,
                self.settings.grouping_threshold,
            )
            .iter()
            .map(|area| area.name().to_string())
            .collect(),
            simple_polygons: simple_polygons.as_coordinate_pairs_lat_long(),
            ids,
        };

        debug!(
            message = %self.record.id,
            areas = selection.ids.len(),
            points = simple_polygons.point_count(),
            "Updating broadcast areas"
        );

        self.send(BroadcastMessageUpdate::at(Utc::now()).areas(selection))
    }

    /// Submit a draft for approval
    pub fn request_approval(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.transition(BroadcastStatus::PendingApproval, BroadcastMessageUpdate::at(now))
    }

    /// Approve and start broadcasting from `now` for the configured duration
    pub fn approve_broadcast(&mut self, approver: Uuid, now: DateTime<Utc>) -> Result<()> {
        let mut update = BroadcastMessageUpdate::at(now);
        update.starts_at = Some(now);
        update.finishes_at = Some(now + self.settings.duration);
        update.approved_at = Some(now);
        update.approved_by_id = Some(approver);

        self.transition(BroadcastStatus::Broadcasting, update)
    }

    pub fn reject_broadcast(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.transition(BroadcastStatus::Rejected, BroadcastMessageUpdate::at(now))
    }

    /// Stop a live broadcast
    pub fn cancel_broadcast(&mut self, canceller: Uuid, now: DateTime<Utc>) -> Result<()> {
        let mut update = BroadcastMessageUpdate::at(now);
        update.cancelled_at = Some(now);
        update.cancelled_by_id = Some(canceller);

        self.transition(BroadcastStatus::Cancelled, update)
    }

    fn transition(&mut self, to: BroadcastStatus, update: BroadcastMessageUpdate) -> Result<()> {
        let from = self.status_at(update.updated_at);
        if !from.can_transition_to(to) {
            return Err(BroadcastAreasError::InvalidStatusTransition { from, to });
        }

        info!(message = %self.record.id, %from, %to, "Broadcast status changed");
        self.send(update.status(to))
    }

    fn send(&mut self, update: BroadcastMessageUpdate) -> Result<()> {
        self.api.update_broadcast_message(self.record.service_id, self.record.id, &update)?;
        self.record.apply(&update);
        Ok(())
    }
}
