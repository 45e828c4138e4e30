//! Repository for the append-only `activity_log` table.

use sqlx::PgPool;

use copresence_core::types::{DbId, Timestamp};

use crate::models::activity::ActivityEntry;

/// Column list for `activity_log` queries.
const COLUMNS: &str = "id, session_id, activity_type, entity_type, entity_id, details, created_at";

/// Provides append/prune operations for the activity log.
pub struct ActivityLogRepo;

impl ActivityLogRepo {
    /// Append an activity row, returning it (the generated id is the
    /// broadcast sequence number).
    pub async fn append(
        pool: &PgPool,
        session_id: DbId,
        activity_type: &str,
        entity_type: &str,
        entity_id: DbId,
        details: &serde_json::Value,
    ) -> Result<ActivityEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO activity_log \
                (session_id, activity_type, entity_type, entity_id, details) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActivityEntry>(&query)
            .bind(session_id)
            .bind(activity_type)
            .bind(entity_type)
            .bind(entity_id)
            .bind(details)
            .fetch_one(pool)
            .await
    }

    /// List recent activity for an entity, newest first.
    pub async fn list_recent_for_entity(
        pool: &PgPool,
        entity_type: &str,
        entity_id: DbId,
        limit: i64,
    ) -> Result<Vec<ActivityEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activity_log \
             WHERE entity_type = $1 AND entity_id = $2 \
             ORDER BY id DESC LIMIT $3"
        );
        sqlx::query_as::<_, ActivityEntry>(&query)
            .bind(entity_type)
            .bind(entity_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// The highest sequence number currently in the log (0 when empty).
    /// Used as the presence snapshot version.
    pub async fn current_seq(pool: &PgPool) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar("SELECT COALESCE(MAX(id), 0) FROM activity_log")
            .fetch_one(pool)
            .await
    }

    /// Delete rows older than the cutoff. Returns the number deleted.
    pub async fn prune_older_than(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM activity_log WHERE created_at < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
