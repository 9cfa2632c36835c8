use uuid::Uuid;

use crate::error::Result;
use crate::models::BroadcastMessageUpdate;

/// Port for persisting changes to broadcast messages
pub trait BroadcastMessageApi {
    /// Store a partial update for one broadcast message
    fn update_broadcast_message(
        &self,
        service_id: Uuid,
        broadcast_message_id: Uuid,
        update: &BroadcastMessageUpdate,
    ) -> Result<()>;
}
