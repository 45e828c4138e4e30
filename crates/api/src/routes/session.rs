//! Route definitions for session lifecycle.

use axum::routing::{delete, post};
use axum::Router;

use crate::handlers::session;
use crate::state::AppState;

/// Session routes mounted at `/sessions`.
///
/// ```text
/// POST   /                 -> register
/// POST   /{id}/heartbeat   -> heartbeat
/// DELETE /{id}             -> disconnect
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(session::register))
        .route("/{id}/heartbeat", post(session::heartbeat))
        .route("/{id}", delete(session::disconnect))
}
