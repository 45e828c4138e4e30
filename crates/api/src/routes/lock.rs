//! Route definitions for advisory entity locks.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::lock;
use crate::state::AppState;

/// Lock routes mounted at `/locks`.
///
/// ```text
/// POST /acquire                        -> acquire
/// POST /release                        -> release
/// POST /{id}/renew                     -> renew
/// GET  /{entity_type}/{entity_id}      -> status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/acquire", post(lock::acquire))
        .route("/release", post(lock::release))
        .route("/{id}/renew", post(lock::renew))
        .route("/{entity_type}/{entity_id}", get(lock::status))
}
