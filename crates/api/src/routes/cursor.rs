//! Route definitions for cursor positions.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::cursor;
use crate::state::AppState;

/// Cursor routes mounted at `/cursors`.
///
/// ```text
/// PUT /                               -> update
/// GET /{entity_type}/{entity_id}      -> list (?exclude_session=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", put(cursor::update))
        .route("/{entity_type}/{entity_id}", get(cursor::list))
}
