use std::sync::Arc;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: copresence_db::DbPool,
    /// Server configuration (timeouts, reaper knobs).
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (subscriber clients).
    pub ws_manager: Arc<WsManager>,
    /// In-process activity fan-out bus.
    pub activity_bus: Arc<copresence_events::ActivityBus>,
}
