//! Entity lock model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use copresence_core::types::{DbId, Timestamp};

/// A row from the `entity_locks` table.
///
/// A lock is *valid* while `expires_at` is in the future; expired rows are
/// dead weight awaiting the reaper and never count as held.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EntityLock {
    pub id: DbId,
    pub entity_type: String,
    pub entity_id: DbId,
    pub session_id: DbId,
    pub lock_kind: String,
    pub acquired_at: Timestamp,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for acquiring a lock.
#[derive(Debug, Deserialize)]
pub struct AcquireLockRequest {
    pub entity_type: String,
    pub entity_id: DbId,
    pub session_id: DbId,
    pub lock_kind: String,
    /// Requested lease length; defaults to the service-wide default when
    /// omitted.
    pub duration_secs: Option<i64>,
}

/// DTO for releasing a lock.
#[derive(Debug, Deserialize)]
pub struct ReleaseLockRequest {
    pub entity_type: String,
    pub entity_id: DbId,
    pub session_id: DbId,
}
