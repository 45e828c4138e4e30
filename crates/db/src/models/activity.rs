//! Activity log model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use copresence_core::types::{DbId, Timestamp};

/// A row from the append-only `activity_log` table. The row id is the
/// broadcast sequence number and the presence snapshot version.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityEntry {
    pub id: DbId,
    pub session_id: DbId,
    pub activity_type: String,
    pub entity_type: String,
    pub entity_id: DbId,
    pub details: serde_json::Value,
    pub created_at: Timestamp,
}

/// DTO for publishing an activity event.
#[derive(Debug, Deserialize)]
pub struct PublishActivityRequest {
    pub session_id: DbId,
    pub activity_type: String,
    pub entity_type: String,
    pub entity_id: DbId,
    #[serde(default)]
    pub details: serde_json::Value,
}
