//! Repository for the `sessions` table.

use sqlx::PgPool;

use copresence_core::types::DbId;

use crate::models::session::Session;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, actor_id, status, last_activity_at, \
                        current_entity_type, current_entity_id, \
                        created_at, updated_at";

/// Provides lifecycle operations for actor sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Create a new online session for an actor, returning the created row.
    ///
    /// An actor may hold several sessions (one per device/tab); each is an
    /// independent owner for locking purposes.
    pub async fn register(pool: &PgPool, actor_id: &str) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions (actor_id, status, last_activity_at) \
             VALUES ($1, 'online', NOW()) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(actor_id)
            .fetch_one(pool)
            .await
    }

    /// Fetch a session by id.
    pub async fn get(pool: &PgPool, id: DbId) -> Result<Option<Session>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE id = $1");
        sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Refresh a session's liveness timestamp and force it online.
    ///
    /// Returns `false` when the session is unknown or already offline;
    /// the caller must re-register rather than retry.
    pub async fn heartbeat(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions \
             SET status = 'online', last_activity_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND status <> 'offline'",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record which entity a session is currently viewing or editing.
    ///
    /// Also counts as activity for liveness purposes. Returns `false` when
    /// the session is unknown or offline.
    pub async fn mark_activity(
        pool: &PgPool,
        id: DbId,
        entity_type: &str,
        entity_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions \
             SET current_entity_type = $2, current_entity_id = $3, \
                 last_activity_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND status <> 'offline'",
        )
        .bind(id)
        .bind(entity_type)
        .bind(entity_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Explicit disconnect: transition a session offline.
    ///
    /// Best-effort from the client's point of view; correctness never
    /// depends on it (the reaper catches sessions that skip this).
    /// Returns `false` if the session was already offline or unknown.
    pub async fn disconnect(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions SET status = 'offline', updated_at = NOW() \
             WHERE id = $1 AND status <> 'offline'",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Transition every session whose last activity is older than
    /// `timeout_secs` to offline, returning the affected session ids so
    /// the caller can cascade lock and cursor cleanup.
    pub async fn mark_stale_offline(
        pool: &PgPool,
        timeout_secs: i64,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "UPDATE sessions SET status = 'offline', updated_at = NOW() \
             WHERE status <> 'offline' \
               AND last_activity_at < NOW() - ($1 || ' seconds')::interval \
             RETURNING id",
        )
        .bind(timeout_secs.to_string())
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Remove offline session rows untouched for longer than `grace_secs`.
    /// Terminal cleanup; returns the number of rows deleted.
    pub async fn delete_offline_older_than(
        pool: &PgPool,
        grace_secs: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM sessions \
             WHERE status = 'offline' \
               AND updated_at < NOW() - ($1 || ' seconds')::interval",
        )
        .bind(grace_secs.to_string())
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
