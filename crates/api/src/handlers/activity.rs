//! Handlers for the activity stream.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use copresence_core::coordination::validate_entity_ref;
use copresence_core::error::CoreError;
use copresence_core::types::DbId;
use copresence_db::models::activity::PublishActivityRequest;
use copresence_db::repositories::{ActivityLogRepo, SessionRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::record_activity;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_HISTORY_LIMIT: i64 = 50;
const MAX_HISTORY_LIMIT: i64 = 500;

/// Query parameters for GET /api/v1/activity/{entity_type}/{entity_id}.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// POST /api/v1/activity
///
/// Publish an activity event on behalf of a session. The event is
/// persisted to the log first and fanned out to subscribers second; its
/// sequence number is the log row id. Publishing also counts as session
/// activity and updates which entity the session is on.
pub async fn publish(
    State(state): State<AppState>,
    Json(input): Json<PublishActivityRequest>,
) -> AppResult<impl IntoResponse> {
    validate_entity_ref(&input.entity_type, input.entity_id).map_err(AppError::BadRequest)?;
    if input.activity_type.trim().is_empty() {
        return Err(AppError::BadRequest("activity_type must not be empty".into()));
    }

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

    let entry = record_activity(
        &state,
        input.session_id,
        &input.activity_type,
        &input.entity_type,
        input.entity_id,
        input.details,
    )
    .await?;

    tracing::debug!(
        seq = entry.id,
        session_id = entry.session_id,
        activity_type = %entry.activity_type,
        "Activity published"
    );

    Ok(Json(DataResponse { data: entry }))
}

/// GET /api/v1/activity/{entity_type}/{entity_id}?limit=
///
/// Recent activity for an entity, newest first. Bounded by the retention
/// window; this is a catch-up aid, not a durable audit trail.
pub async fn history(
    State(state): State<AppState>,
    Path((entity_type, entity_id)): Path<(String, DbId)>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<impl IntoResponse> {
    validate_entity_ref(&entity_type, entity_id).map_err(AppError::BadRequest)?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);

    let entries =
        ActivityLogRepo::list_recent_for_entity(&state.pool, &entity_type, entity_id, limit)
            .await?;

    Ok(Json(DataResponse { data: entries }))
}
