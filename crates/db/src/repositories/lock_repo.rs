//! Repository for the `entity_locks` table.
//!
//! Acquisition is a per-entity atomic check-and-set: the transaction takes
//! a PostgreSQL advisory lock keyed on `entity_type:entity_id`, so two
//! concurrent acquires on the same entity serialize while acquires on
//! different entities proceed independently. No cross-entity ordering is
//! ever taken.

use sqlx::PgPool;

use copresence_core::types::{DbId, Timestamp};

use crate::models::lock::EntityLock;

/// Column list for `entity_locks` queries.
const COLUMNS: &str = "id, entity_type, entity_id, session_id, lock_kind, \
                        acquired_at, expires_at, created_at, updated_at";

/// Result of an acquire attempt.
#[derive(Debug)]
pub enum AcquireOutcome {
    /// The requester now holds the lock described by the row.
    Granted(EntityLock),
    /// A valid hard lock is held by another session.
    Conflict {
        holder_session_id: DbId,
        expires_at: Timestamp,
    },
}

/// Provides advisory lock operations scoped per entity.
pub struct EntityLockRepo;

impl EntityLockRepo {
    /// Attempt to acquire a lock on an entity.
    ///
    /// Inside one transaction, serialized per entity by
    /// `pg_advisory_xact_lock`:
    ///
    /// 1. If a valid (unexpired) *hard* lock is held by a different
    ///    session, the request fails with [`AcquireOutcome::Conflict`]
    ///    regardless of the requested kind.
    /// 2. Otherwise the requester's lock entry for the entity is created
    ///    or overwritten with a fresh `expires_at = NOW() + duration`.
    ///
    /// Expired locks never count: any session can acquire over one
    /// without waiting for the reaper. Re-acquisition by the current
    /// holder refreshes its own lease (same-actor different-session is a
    /// conflict, consistent with per-session ownership).
    pub async fn acquire(
        pool: &PgPool,
        entity_type: &str,
        entity_id: DbId,
        session_id: DbId,
        lock_kind: &str,
        duration_secs: i64,
    ) -> Result<AcquireOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Per-entity serialization point. Released automatically at
        // commit/rollback.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1 || ':' || $2::text, 0))")
            .bind(entity_type)
            .bind(entity_id)
            .execute(&mut *tx)
            .await?;

        let holder: Option<(DbId, Timestamp)> = sqlx::query_as(
            "SELECT session_id, expires_at FROM entity_locks \
             WHERE entity_type = $1 AND entity_id = $2 \
               AND lock_kind = 'hard' AND session_id <> $3 \
               AND expires_at > NOW()",
        )
        .bind(entity_type)
        .bind(entity_id)
        .bind(session_id)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some((holder_session_id, expires_at)) = holder {
            tx.rollback().await?;
            return Ok(AcquireOutcome::Conflict {
                holder_session_id,
                expires_at,
            });
        }

        let query = format!(
            "INSERT INTO entity_locks \
                (entity_type, entity_id, session_id, lock_kind, acquired_at, expires_at) \
             VALUES ($1, $2, $3, $4, NOW(), NOW() + ($5 || ' seconds')::interval) \
             ON CONFLICT ON CONSTRAINT uq_entity_locks_entity_session \
             DO UPDATE SET lock_kind = EXCLUDED.lock_kind, \
                           acquired_at = NOW(), \
                           expires_at = EXCLUDED.expires_at, \
                           updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        let lock = sqlx::query_as::<_, EntityLock>(&query)
            .bind(entity_type)
            .bind(entity_id)
            .bind(session_id)
            .bind(lock_kind)
            .bind(duration_secs.to_string())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(AcquireOutcome::Granted(lock))
    }

    /// Extend a held lock's expiry by `duration_secs` from now.
    ///
    /// Renewal is explicit and never implicit: once the lock has expired
    /// or been reclaimed this returns `None` and the caller must acquire
    /// afresh.
    pub async fn renew(
        pool: &PgPool,
        lock_id: DbId,
        duration_secs: i64,
    ) -> Result<Option<EntityLock>, sqlx::Error> {
        let query = format!(
            "UPDATE entity_locks \
             SET expires_at = NOW() + ($2 || ' seconds')::interval, updated_at = NOW() \
             WHERE id = $1 AND expires_at > NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EntityLock>(&query)
            .bind(lock_id)
            .bind(duration_secs.to_string())
            .fetch_optional(pool)
            .await
    }

    /// Release the caller's lock on an entity.
    ///
    /// Deletes only a row owned by `session_id`; releasing a lock held by
    /// someone else (or no lock at all) is a no-op, never an error, and
    /// never affects another session's lock. Returns whether a row was
    /// removed.
    pub async fn release(
        pool: &PgPool,
        entity_type: &str,
        entity_id: DbId,
        session_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM entity_locks \
             WHERE entity_type = $1 AND entity_id = $2 AND session_id = $3",
        )
        .bind(entity_type)
        .bind(entity_id)
        .bind(session_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Get the currently valid hard lock for an entity, or `None`.
    pub async fn get_active_hard(
        pool: &PgPool,
        entity_type: &str,
        entity_id: DbId,
    ) -> Result<Option<EntityLock>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM entity_locks \
             WHERE entity_type = $1 AND entity_id = $2 \
               AND lock_kind = 'hard' AND expires_at > NOW()"
        );
        sqlx::query_as::<_, EntityLock>(&query)
            .bind(entity_type)
            .bind(entity_id)
            .fetch_optional(pool)
            .await
    }

    /// List all valid locks (soft and hard) on an entity.
    pub async fn list_valid_for_entity(
        pool: &PgPool,
        entity_type: &str,
        entity_id: DbId,
    ) -> Result<Vec<EntityLock>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM entity_locks \
             WHERE entity_type = $1 AND entity_id = $2 AND expires_at > NOW() \
             ORDER BY acquired_at"
        );
        sqlx::query_as::<_, EntityLock>(&query)
            .bind(entity_type)
            .bind(entity_id)
            .fetch_all(pool)
            .await
    }

    /// Delete every expired lock, irrespective of the owning session's
    /// status. Locks decay on their own TTL, not only via session
    /// liveness. Returns the number of locks deleted.
    pub async fn delete_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM entity_locks WHERE expires_at < NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Force-release every lock owned by the given sessions (cascade when
    /// their owners are reaped). Returns the number of locks released.
    pub async fn release_all_for_sessions(
        pool: &PgPool,
        session_ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        if session_ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM entity_locks WHERE session_id = ANY($1)")
            .bind(session_ids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
