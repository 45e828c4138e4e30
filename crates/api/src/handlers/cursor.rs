//! Handlers for ephemeral cursor positions.
//!
//! Cursor state is overwrite-only and keyed per (session, entity). The
//! position payload is opaque JSON; a text editor sends line/column, a
//! board sends x/y, and the service does not interpret either. Clients
//! are expected to throttle updates to at most one per
//! `CURSOR_MIN_UPDATE_INTERVAL_MS`.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use copresence_core::coordination::validate_entity_ref;
use copresence_core::error::CoreError;
use copresence_core::types::DbId;
use copresence_db::models::cursor::UpdateCursorRequest;
use copresence_db::repositories::{CursorRepo, SessionRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for GET /api/v1/cursors/{entity_type}/{entity_id}.
#[derive(Debug, Deserialize)]
pub struct ListCursorsQuery {
    /// Session whose own cursor to omit from the response.
    pub exclude_session: Option<DbId>,
}

/// PUT /api/v1/cursors
///
/// Record or refresh the session's cursor on an entity. Not routed
/// through the activity log: cursor movement is too chatty to persist
/// per-update, so observers poll this resource instead.
pub async fn update(
    State(state): State<AppState>,
    Json(input): Json<UpdateCursorRequest>,
) -> AppResult<impl IntoResponse> {
    validate_entity_ref(&input.entity_type, input.entity_id).map_err(AppError::BadRequest)?;

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

    let cursor = CursorRepo::upsert(
        &state.pool,
        input.session_id,
        &input.entity_type,
        input.entity_id,
        &input.position,
        &input.color,
    )
    .await?;

    Ok(Json(DataResponse { data: cursor }))
}

/// GET /api/v1/cursors/{entity_type}/{entity_id}?exclude_session=
///
/// Cursors currently on an entity. Pass `exclude_session` so a client
/// never renders its own cursor as a remote one.
pub async fn list(
    State(state): State<AppState>,
    Path((entity_type, entity_id)): Path<(String, DbId)>,
    Query(query): Query<ListCursorsQuery>,
) -> AppResult<impl IntoResponse> {
    validate_entity_ref(&entity_type, entity_id).map_err(AppError::BadRequest)?;

    // No excluded session filters nothing; session ids are positive.
    let excluding = query.exclude_session.unwrap_or(-1);
    let cursors =
        CursorRepo::list_for_entity(&state.pool, &entity_type, entity_id, excluding).await?;

    Ok(Json(DataResponse { data: cursors }))
}
