//! WebSocket infrastructure for the coordination event stream.
//!
//! Provides connection management, keepalive pings, and the HTTP upgrade
//! handler used by Axum routes. Each connection carries its own
//! subscription to the in-process activity bus; fan-out happens per
//! connection, filtered by the topics the client subscribed to.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::start_ws_keepalive;
pub use manager::WsManager;
