//! Route definitions for presence queries.

use axum::routing::get;
use axum::Router;

use crate::handlers::presence;
use crate::state::AppState;

/// Presence routes mounted at `/presence`.
///
/// ```text
/// GET /                               -> global snapshot
/// GET /{entity_type}/{entity_id}      -> entity snapshot
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(presence::snapshot))
        .route(
            "/{entity_type}/{entity_id}",
            get(presence::snapshot_for_entity),
        )
}
