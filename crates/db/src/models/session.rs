//! Session model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use copresence_core::types::{DbId, Timestamp};

/// A row from the `sessions` table: one actor's live presence within the
/// collaboration scope.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Session {
    pub id: DbId,
    pub actor_id: String,
    pub status: String,
    pub last_activity_at: Timestamp,
    pub current_entity_type: Option<String>,
    pub current_entity_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a session.
#[derive(Debug, Deserialize)]
pub struct RegisterSessionRequest {
    pub actor_id: String,
}
