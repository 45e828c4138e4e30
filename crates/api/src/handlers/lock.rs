//! Handlers for advisory entity locks.
//!
//! Locks are advisory and lease-based: a grant is never permanent, only a
//! window that the holder must renew. Transitions are announced on the
//! activity stream so subscribers see lock state change without polling.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use copresence_core::coordination::{
    validate_entity_ref, validate_lock_duration, LockKind, DEFAULT_LOCK_DURATION_SECS,
};
use copresence_core::error::CoreError;
use copresence_core::types::DbId;
use copresence_db::models::lock::{AcquireLockRequest, ReleaseLockRequest};
use copresence_db::repositories::{AcquireOutcome, EntityLockRepo, SessionRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::record_activity;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body for POST /api/v1/locks/{id}/renew.
#[derive(Debug, Deserialize)]
pub struct RenewLockRequest {
    pub duration_secs: Option<i64>,
}

/// POST /api/v1/locks/acquire
///
/// Attempt to take a soft or hard lock on an entity. A valid hard lock
/// held by another session yields 409 with the holder and expiry in the
/// body, so the client can decide to wait or work elsewhere. Re-acquiring
/// a lock the session already holds refreshes its lease.
pub async fn acquire(
    State(state): State<AppState>,
    Json(input): Json<AcquireLockRequest>,
) -> AppResult<impl IntoResponse> {
    validate_entity_ref(&input.entity_type, input.entity_id).map_err(AppError::BadRequest)?;
    let kind = LockKind::parse(&input.lock_kind)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid lock_kind '{}'", input.lock_kind)))?;
    let duration_secs = input.duration_secs.unwrap_or(DEFAULT_LOCK_DURATION_SECS);
    validate_lock_duration(duration_secs).map_err(AppError::BadRequest)?;

    // Liveness gate: a session that the reaper has taken offline cannot
    // take new locks, it has to re-register first.
    let live = SessionRepo::mark_activity(
        &state.pool,
        input.session_id,
        &input.entity_type,
        input.entity_id,
    )
    .await?;
    if !live {
        return Err(AppError::Core(CoreError::SessionNotFound {
            id: input.session_id,
        }));
    }

    let outcome = EntityLockRepo::acquire(
        &state.pool,
        &input.entity_type,
        input.entity_id,
        input.session_id,
        kind.as_str(),
        duration_secs,
    )
    .await?;

    let lock = match outcome {
        AcquireOutcome::Granted(lock) => lock,
        AcquireOutcome::Conflict {
            holder_session_id,
            expires_at,
        } => {
            tracing::debug!(
                entity_type = %input.entity_type,
                entity_id = input.entity_id,
                session_id = input.session_id,
                holder_session_id,
                "Lock acquire refused"
            );
            return Err(AppError::Core(CoreError::LockConflict {
                holder_session_id,
                expires_at,
            }));
        }
    };

    tracing::info!(
        lock_id = lock.id,
        entity_type = %lock.entity_type,
        entity_id = lock.entity_id,
        session_id = lock.session_id,
        lock_kind = %lock.lock_kind,
        expires_at = %lock.expires_at,
        "Lock acquired"
    );

    record_activity(
        &state,
        lock.session_id,
        "lock.acquired",
        &lock.entity_type,
        lock.entity_id,
        serde_json::json!({
            "lock_id": lock.id,
            "lock_kind": lock.lock_kind,
            "expires_at": lock.expires_at,
        }),
    )
    .await?;

    Ok(Json(DataResponse { data: lock }))
}

/// POST /api/v1/locks/release
///
/// Release the caller's lock on an entity. A no-op (200, `released:
/// false`) when the caller holds nothing; another session's lock is never
/// touched.
pub async fn release(
    State(state): State<AppState>,
    Json(input): Json<ReleaseLockRequest>,
) -> AppResult<impl IntoResponse> {
    validate_entity_ref(&input.entity_type, input.entity_id).map_err(AppError::BadRequest)?;

    let released = EntityLockRepo::release(
        &state.pool,
        &input.entity_type,
        input.entity_id,
        input.session_id,
    )
    .await?;

    if released {
        tracing::info!(
            entity_type = %input.entity_type,
            entity_id = input.entity_id,
            session_id = input.session_id,
            "Lock released"
        );
        record_activity(
            &state,
            input.session_id,
            "lock.released",
            &input.entity_type,
            input.entity_id,
            serde_json::Value::Null,
        )
        .await?;
    }

    Ok(Json(DataResponse {
        data: serde_json::json!({ "released": released }),
    }))
}

/// POST /api/v1/locks/{id}/renew
///
/// Extend a held lock's lease. Renewal is explicit; once the lock has
/// lapsed or been reclaimed the holder must acquire afresh, so a lapsed
/// renewal is a 404 rather than a silent re-grant.
pub async fn renew(
    State(state): State<AppState>,
    Path(lock_id): Path<DbId>,
    Json(input): Json<RenewLockRequest>,
) -> AppResult<impl IntoResponse> {
    let duration_secs = input.duration_secs.unwrap_or(DEFAULT_LOCK_DURATION_SECS);
    validate_lock_duration(duration_secs).map_err(AppError::BadRequest)?;

    let Some(lock) = EntityLockRepo::renew(&state.pool, lock_id, duration_secs).await? else {
        return Err(AppError::Database(sqlx::Error::RowNotFound));
    };

    tracing::debug!(lock_id = lock.id, expires_at = %lock.expires_at, "Lock renewed");

    Ok(Json(DataResponse { data: lock }))
}

/// GET /api/v1/locks/{entity_type}/{entity_id}
///
/// Inspect lock state for an entity: the valid hard lock (if any) plus
/// every valid soft lock.
pub async fn status(
    State(state): State<AppState>,
    Path((entity_type, entity_id)): Path<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    validate_entity_ref(&entity_type, entity_id).map_err(AppError::BadRequest)?;

    let locks = EntityLockRepo::list_valid_for_entity(&state.pool, &entity_type, entity_id).await?;
    let hard = locks.iter().find(|l| l.lock_kind == "hard").cloned();

    Ok(Json(DataResponse {
        data: serde_json::json!({
            "hard_lock": hard,
            "locks": locks,
        }),
    }))
}
