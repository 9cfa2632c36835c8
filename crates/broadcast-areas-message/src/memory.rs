//! In-memory broadcast message API for local tooling and tests.
//!
//! Updates are recorded in call order rather than sent anywhere.

use std::sync::{Arc, RwLock};

use broadcast_areas_core::error::{BroadcastAreasError, Result};
use broadcast_areas_core::models::BroadcastMessageUpdate;
use broadcast_areas_core::ports::BroadcastMessageApi;
use uuid::Uuid;

/// One call made to `update_broadcast_message`
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedUpdate {
    pub service_id: Uuid,
    pub broadcast_message_id: Uuid,
    pub update: BroadcastMessageUpdate,
}

/// In-memory implementation of BroadcastMessageApi
#[derive(Debug, Clone, Default)]
pub struct InMemoryMessageApi {
    updates: Arc<RwLock<Vec<RecordedUpdate>>>,
    failure: Option<String>,
}

impl InMemoryMessageApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// An API that rejects every update with `reason`
    pub fn failing(reason: impl Into<String>) -> Self {
        Self { failure: Some(reason.into()), ..Self::default() }
    }

    /// Every update received so far, oldest first
    pub fn updates(&self) -> Vec<RecordedUpdate> {
        self.updates.read().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }

    pub fn last_update(&self) -> Option<RecordedUpdate> {
        self.updates.read().unwrap_or_else(|poisoned| poisoned.into_inner()).last().cloned()
    }

    pub fn update_count(&self) -> usize {
        self.updates.read().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }
}

impl BroadcastMessageApi for InMemoryMessageApi {
    fn update_broadcast_message(
        &self,
        service_id: Uuid,
        broadcast_message_id: Uuid,
        update: &BroadcastMessageUpdate,
    ) -> Result<()> {
        if let Some(reason) = &self.failure {
            return Err(BroadcastAreasError::MessageUpdate { reason: reason.clone() });
        }

        let mut updates = self.updates.write().map_err(|_| BroadcastAreasError::MessageUpdate {
            reason: "update log lock poisoned".to_string(),
        })?;
        updates.push(RecordedUpdate { service_id, broadcast_message_id, update: update.clone() });
        Ok(())
    }
}
