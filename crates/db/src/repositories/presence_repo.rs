//! Derived presence views over `sessions` and `entity_locks`.
//!
//! This is the canonical "who is active on entity X" read: the ground
//! truth subscribers fall back to when incremental event delivery is
//! suspect.

use sqlx::PgPool;

use copresence_core::types::DbId;

use crate::models::presence::PresenceEntry;

/// Shared projection for presence queries.
const ENTRY_COLUMNS: &str = "s.id AS session_id, s.actor_id, s.status, s.last_activity_at, \
                              s.current_entity_type, s.current_entity_id, \
                              l.id AS lock_id, l.lock_kind, l.expires_at AS lock_expires_at";

/// Provides point-in-time presence reads.
pub struct PresenceRepo;

impl PresenceRepo {
    /// List online sessions currently on the given entity, each joined
    /// with the valid lock it holds on that entity (if any).
    pub async fn active_entries_for_entity(
        pool: &PgPool,
        entity_type: &str,
        entity_id: DbId,
    ) -> Result<Vec<PresenceEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {ENTRY_COLUMNS} \
             FROM sessions s \
             LEFT JOIN entity_locks l \
               ON l.session_id = s.id \
              AND l.entity_type = $1 AND l.entity_id = $2 \
              AND l.expires_at > NOW() \
             WHERE s.status = 'online' \
               AND s.current_entity_type = $1 AND s.current_entity_id = $2 \
             ORDER BY s.last_activity_at DESC"
        );
        sqlx::query_as::<_, PresenceEntry>(&query)
            .bind(entity_type)
            .bind(entity_id)
            .fetch_all(pool)
            .await
    }

    /// List all online sessions, each joined with the valid lock it holds
    /// on whatever entity it is currently on (if any).
    pub async fn active_entries(pool: &PgPool) -> Result<Vec<PresenceEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {ENTRY_COLUMNS} \
             FROM sessions s \
             LEFT JOIN entity_locks l \
               ON l.session_id = s.id \
              AND l.entity_type = s.current_entity_type \
              AND l.entity_id = s.current_entity_id \
              AND l.expires_at > NOW() \
             WHERE s.status = 'online' \
             ORDER BY s.last_activity_at DESC"
        );
        sqlx::query_as::<_, PresenceEntry>(&query)
            .fetch_all(pool)
            .await
    }
}
