//! Presence snapshot models.

use serde::Serialize;
use sqlx::FromRow;

use copresence_core::types::{DbId, Timestamp};

/// One online session in a presence snapshot, joined with the valid lock
/// that session holds on the entity in question (if any).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PresenceEntry {
    pub session_id: DbId,
    pub actor_id: String,
    pub status: String,
    pub last_activity_at: Timestamp,
    pub current_entity_type: Option<String>,
    pub current_entity_id: Option<DbId>,
    pub lock_id: Option<DbId>,
    pub lock_kind: Option<String>,
    pub lock_expires_at: Option<Timestamp>,
}

/// The canonical point-in-time presence view.
///
/// `version` is the highest activity sequence number included in the
/// snapshot; subscribers reconcile incremental events against it instead
/// of re-fetching the whole list on every change.
#[derive(Debug, Serialize)]
pub struct PresenceSnapshot {
    pub version: DbId,
    pub as_of: Timestamp,
    pub entries: Vec<PresenceEntry>,
}
