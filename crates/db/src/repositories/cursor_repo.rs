//! Repository for the `cursors` table.

use sqlx::PgPool;

use copresence_core::types::DbId;

use crate::models::cursor::Cursor;

/// Column list for `cursors` queries.
const COLUMNS: &str = "id, session_id, entity_type, entity_id, position, color, updated_at";

/// Provides upsert/list operations for ephemeral cursor state.
pub struct CursorRepo;

impl CursorRepo {
    /// Record or refresh a session's cursor on an entity.
    ///
    /// Keyed by `(session_id, entity_type, entity_id)`: a session has at
    /// most one cursor per entity, and repeated updates overwrite in
    /// place.
    pub async fn upsert(
        pool: &PgPool,
        session_id: DbId,
        entity_type: &str,
        entity_id: DbId,
        position: &serde_json::Value,
        color: &str,
    ) -> Result<Cursor, sqlx::Error> {
        let query = format!(
            "INSERT INTO cursors (session_id, entity_type, entity_id, position, color) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT ON CONSTRAINT uq_cursors_session_entity \
             DO UPDATE SET position = EXCLUDED.position, \
                           color = EXCLUDED.color, \
                           updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Cursor>(&query)
            .bind(session_id)
            .bind(entity_type)
            .bind(entity_id)
            .bind(position)
            .bind(color)
            .fetch_one(pool)
            .await
    }

    /// List cursors on an entity, excluding the requesting session's own.
    /// A session never receives its own cursor back.
    pub async fn list_for_entity(
        pool: &PgPool,
        entity_type: &str,
        entity_id: DbId,
        excluding_session_id: DbId,
    ) -> Result<Vec<Cursor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cursors \
             WHERE entity_type = $1 AND entity_id = $2 AND session_id <> $3 \
             ORDER BY updated_at DESC"
        );
        sqlx::query_as::<_, Cursor>(&query)
            .bind(entity_type)
            .bind(entity_id)
            .bind(excluding_session_id)
            .fetch_all(pool)
            .await
    }

    /// Remove every cursor belonging to the given sessions (offline
    /// cascade). Cursors are never reaped on their own timer. Returns the
    /// number of rows removed.
    pub async fn remove_all_for_sessions(
        pool: &PgPool,
        session_ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        if session_ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM cursors WHERE session_id = ANY($1)")
            .bind(session_ids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
