//! Handlers for session lifecycle: register, heartbeat, disconnect.
//!
//! Sessions are explicit server-side objects with their own lifecycle,
//! decoupled from any UI framework. Liveness comes from heartbeats; the
//! reaper reclaims sessions that stop sending them, so a crashed client
//! needs no cooperation to be cleaned up.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use copresence_core::error::CoreError;
use copresence_core::types::DbId;
use copresence_db::models::session::RegisterSessionRequest;
use copresence_db::repositories::{CursorRepo, EntityLockRepo, SessionRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/sessions
///
/// Register a new session for an actor. An actor may hold one session per
/// device/tab; each is an independent lock owner.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterSessionRequest>,
) -> AppResult<impl IntoResponse> {
    if input.actor_id.trim().is_empty() {
        return Err(AppError::BadRequest("actor_id must not be empty".into()));
    }

    let session = SessionRepo::register(&state.pool, &input.actor_id).await?;

    tracing::info!(
        session_id = session.id,
        actor_id = %session.actor_id,
        "Session registered"
    );

    Ok(Json(DataResponse { data: session }))
}

/// POST /api/v1/sessions/{id}/heartbeat
///
/// Refresh a session's liveness. Returns 404 when the session is unknown
/// or already reaped -- the caller must re-register rather than retry.
pub async fn heartbeat(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let alive = SessionRepo::heartbeat(&state.pool, id).await?;

    if !alive {
        return Err(AppError::Core(CoreError::SessionNotFound { id }));
    }

    tracing::trace!(session_id = id, "Heartbeat");

    Ok(Json(DataResponse {
        data: serde_json::json!({ "alive": true }),
    }))
}

/// DELETE /api/v1/sessions/{id}
///
/// Explicit disconnect: transition the session offline and cascade-release
/// its locks and cursors. Best-effort from the client's perspective:
/// idempotent, always 200, and the reaper covers clients that never call
/// it. TTL expiry remains the source of truth for correctness.
pub async fn disconnect(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let transitioned = SessionRepo::disconnect(&state.pool, id).await?;

    if transitioned {
        let ids = [id];
        let locks = EntityLockRepo::release_all_for_sessions(&state.pool, &ids).await?;
        let cursors = CursorRepo::remove_all_for_sessions(&state.pool, &ids).await?;
        tracing::info!(
            session_id = id,
            locks_released = locks,
            cursors_removed = cursors,
            "Session disconnected"
        );
    }

    Ok(Json(DataResponse {
        data: serde_json::json!({ "disconnected": transitioned }),
    }))
}
