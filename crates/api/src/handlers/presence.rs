//! Handlers for presence queries.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;

use copresence_core::coordination::validate_entity_ref;
use copresence_core::types::DbId;
use copresence_db::models::presence::PresenceSnapshot;
use copresence_db::repositories::{ActivityLogRepo, PresenceRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/presence
///
/// Snapshot of every online session, joined with the valid lock each
/// holds on its current entity. `version` is the activity sequence as of
/// the snapshot; clients reconcile later stream events against it.
pub async fn snapshot(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let version = ActivityLogRepo::current_seq(&state.pool).await?;
    let entries = PresenceRepo::active_entries(&state.pool).await?;

    Ok(Json(DataResponse {
        data: PresenceSnapshot {
            version,
            as_of: Utc::now(),
            entries,
        },
    }))
}

/// GET /api/v1/presence/{entity_type}/{entity_id}
///
/// Snapshot scoped to the sessions currently on one entity.
pub async fn snapshot_for_entity(
    State(state): State<AppState>,
    Path((entity_type, entity_id)): Path<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    validate_entity_ref(&entity_type, entity_id).map_err(AppError::BadRequest)?;

    let version = ActivityLogRepo::current_seq(&state.pool).await?;
    let entries =
        PresenceRepo::active_entries_for_entity(&state.pool, &entity_type, entity_id).await?;

    Ok(Json(DataResponse {
        data: PresenceSnapshot {
            version,
            as_of: Utc::now(),
            entries,
        },
    }))
}
