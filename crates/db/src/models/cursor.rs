//! Cursor model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use copresence_core::types::{DbId, Timestamp};

/// A row from the `cursors` table. Ephemeral, overwritten frequently,
/// never persisted long-term.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Cursor {
    pub id: DbId,
    pub session_id: DbId,
    pub entity_type: String,
    pub entity_id: DbId,
    pub position: serde_json::Value,
    pub color: String,
    pub updated_at: Timestamp,
}

/// DTO for upserting a cursor position.
#[derive(Debug, Deserialize)]
pub struct UpdateCursorRequest {
    pub session_id: DbId,
    pub entity_type: String,
    pub entity_id: DbId,
    pub position: serde_json::Value,
    pub color: String,
}
