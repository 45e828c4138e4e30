//! Route definitions for the activity stream.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::activity;
use crate::state::AppState;

/// Activity routes mounted at `/activity`.
///
/// ```text
/// POST /                               -> publish
/// GET  /{entity_type}/{entity_id}      -> history (?limit=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(activity::publish))
        .route("/{entity_type}/{entity_id}", get(activity::history))
}
