use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::geometry::Ring;

/// Lifecycle state of a broadcast message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BroadcastStatus {
    #[default]
    Draft,
    PendingApproval,
    Broadcasting,
    Completed,
    Cancelled,
    Rejected,
}

impl BroadcastStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BroadcastStatus::Draft => "draft",
            BroadcastStatus::PendingApproval => "pending-approval",
            BroadcastStatus::Broadcasting => "broadcasting",
            BroadcastStatus::Completed => "completed",
            BroadcastStatus::Cancelled => "cancelled",
            BroadcastStatus::Rejected => "rejected",
        }
    }

    /// Whether a caller may move a message from this status to `next`.
    ///
    /// `Completed` is never a valid target: it is derived from `finishes_at`.
    pub fn can_transition_to(&self, next: BroadcastStatus) -> bool {
        use BroadcastStatus::*;
        matches!(
            (self, next),
            (Draft, PendingApproval)
                | (PendingApproval, Broadcasting)
                | (PendingApproval, Rejected)
                | (Broadcasting, Cancelled)
        )
    }
}

impl fmt::Display for BroadcastStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Areas selected for a broadcast, as persisted on the message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BroadcastAreaSelection {
    /// Library area identifiers in selection order
    #[serde(default)]
    pub ids: Vec<String>,

    /// Display names of the selected areas
    #[serde(default)]
    pub names: Vec<String>,

    /// Summarised covering region names
    #[serde(default)]
    pub aggregate_names: Vec<String>,

    /// Broadcast-ready exterior rings in `[latitude, longitude]` order
    #[serde(default)]
    pub simple_polygons: Vec<Ring>,
}

/// Persisted broadcast message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastMessageRecord {
    pub id: Uuid,
    pub service_id: Uuid,
    pub template_id: Option<Uuid>,

    #[serde(default)]
    pub areas: BroadcastAreaSelection,

    /// Stored status; read through the facade to see derived completion
    pub status: BroadcastStatus,

    pub starts_at: Option<DateTime<Utc>>,
    pub finishes_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,

    pub created_by_id: Option<Uuid>,
    pub approved_by_id: Option<Uuid>,
    pub cancelled_by_id: Option<Uuid>,
}

impl BroadcastMessageRecord {
    /// Create a new draft with no areas selected
    pub fn draft(service_id: Uuid, created_by_id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            service_id,
            template_id: None,
            areas: BroadcastAreaSelection::default(),
            status: BroadcastStatus::Draft,
            starts_at: None,
            finishes_at: None,
            created_at,
            approved_at: None,
            cancelled_at: None,
            updated_at: None,
            created_by_id: Some(created_by_id),
            approved_by_id: None,
            cancelled_by_id: None,
        }
    }

    /// Apply an update locally, mirroring what the remote API stores
    pub fn apply(&mut self, update: &BroadcastMessageUpdate) {
        if let Some(areas) = &update.areas {
            self.areas = areas.clone();
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if update.starts_at.is_some() {
            self.starts_at = update.starts_at;
        }
        if update.finishes_at.is_some() {
            self.finishes_at = update.finishes_at;
        }
        if update.approved_at.is_some() {
            self.approved_at = update.approved_at;
            self.approved_by_id = update.approved_by_id;
        }
        if update.cancelled_at.is_some() {
            self.cancelled_at = update.cancelled_at;
            self.cancelled_by_id = update.cancelled_by_id;
        }
        self.updated_at = Some(update.updated_at);
    }
}

/// Partial update sent to the broadcast message API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastMessageUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub areas: Option<BroadcastAreaSelection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BroadcastStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finishes_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_by_id: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

impl BroadcastMessageUpdate {
    /// An update that carries nothing but its timestamp
    pub fn at(updated_at: DateTime<Utc>) -> Self {
        Self {
            areas: None,
            status: None,
            starts_at: None,
            finishes_at: None,
            approved_at: None,
            approved_by_id: None,
            cancelled_at: None,
            cancelled_by_id: None,
            updated_at,
        }
    }

    pub fn areas(mut self, areas: BroadcastAreaSelection) -> Self {
        self.areas = Some(areas);
        self
    }

    pub fn status(mut self, status: BroadcastStatus) -> Self {
        self.status = Some(status);
        self
    }
}
