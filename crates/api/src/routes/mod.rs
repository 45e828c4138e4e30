pub mod activity;
pub mod cursor;
pub mod health;
pub mod lock;
pub mod presence;
pub mod session;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                          activity stream WebSocket
///
/// /sessions                                    register (POST)
/// /sessions/{id}/heartbeat                     heartbeat (POST)
/// /sessions/{id}                               disconnect (DELETE)
///
/// /locks/acquire                               acquire (POST)
/// /locks/release                               release (POST)
/// /locks/{id}/renew                            renew (POST)
/// /locks/{entity_type}/{entity_id}             status (GET)
///
/// /activity                                    publish (POST)
/// /activity/{entity_type}/{entity_id}          history (GET, ?limit=)
///
/// /presence                                    global snapshot (GET)
/// /presence/{entity_type}/{entity_id}          entity snapshot (GET)
///
/// /cursors                                     update (PUT)
/// /cursors/{entity_type}/{entity_id}           list (GET, ?exclude_session=)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/sessions", session::router())
        .nest("/locks", lock::router())
        .nest("/activity", activity::router())
        .nest("/presence", presence::router())
        .nest("/cursors", cursor::router())
}
