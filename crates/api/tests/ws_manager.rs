//! Unit tests for `WsManager`.
//!
//! These tests exercise the WebSocket connection manager directly, without
//! performing any HTTP upgrades. They verify add/remove semantics,
//! keepalive pings, and graceful shutdown behaviour.

use axum::extract::ws::Message;
use tokio::sync::mpsc;

use copresence_api::ws::WsManager;

fn channel() -> (
    mpsc::UnboundedSender<Message>,
    mpsc::UnboundedReceiver<Message>,
) {
    mpsc::unbounded_channel()
}

// ---------------------------------------------------------------------------
// Test: new manager starts with zero connections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn new_manager_has_zero_connections() {
    let manager = WsManager::new();

    assert_eq!(manager.connection_count().await, 0);
}

// ---------------------------------------------------------------------------
// Test: add() increments the connection count
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_increments_connection_count() {
    let manager = WsManager::new();
    let (tx, _rx) = channel();

    manager.add("conn-1".to_string(), tx).await;

    assert_eq!(manager.connection_count().await, 1);
}

// ---------------------------------------------------------------------------
// Test: remove() decrements the connection count
// ---------------------------------------------------------------------------

#[tokio::test]
async fn remove_decrements_connection_count() {
    let manager = WsManager::new();
    let (tx, _rx) = channel();

    manager.add("conn-1".to_string(), tx).await;
    assert_eq!(manager.connection_count().await, 1);

    manager.remove("conn-1").await;
    assert_eq!(manager.connection_count().await, 0);
}

// ---------------------------------------------------------------------------
// Test: remove() with unknown ID is a no-op
// ---------------------------------------------------------------------------

#[tokio::test]
async fn remove_unknown_id_is_noop() {
    let manager = WsManager::new();
    let (tx, _rx) = channel();

    manager.add("conn-1".to_string(), tx).await;
    manager.remove("nonexistent").await;

    assert_eq!(manager.connection_count().await, 1);
}

// ---------------------------------------------------------------------------
// Test: ping_all() delivers a Ping frame to every connection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ping_all_reaches_every_connection() {
    let manager = WsManager::new();
    let (tx1, mut rx1) = channel();
    let (tx2, mut rx2) = channel();

    manager.add("conn-1".to_string(), tx1).await;
    manager.add("conn-2".to_string(), tx2).await;

    manager.ping_all().await;

    assert!(matches!(rx1.recv().await, Some(Message::Ping(_))));
    assert!(matches!(rx2.recv().await, Some(Message::Ping(_))));
}

// ---------------------------------------------------------------------------
// Test: ping_all() skips connections with closed channels
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ping_all_survives_closed_channel() {
    let manager = WsManager::new();
    let (tx1, rx1) = channel();
    let (tx2, mut rx2) = channel();

    manager.add("conn-1".to_string(), tx1).await;
    manager.add("conn-2".to_string(), tx2).await;

    // Simulate a receiver that went away without deregistering.
    drop(rx1);

    manager.ping_all().await;

    assert!(matches!(rx2.recv().await, Some(Message::Ping(_))));
}

// ---------------------------------------------------------------------------
// Test: shutdown_all() sends Close frames and clears the map
// ---------------------------------------------------------------------------

#[tokio::test]
async fn shutdown_all_closes_and_clears() {
    let manager = WsManager::new();
    let (tx1, mut rx1) = channel();
    let (tx2, mut rx2) = channel();

    manager.add("conn-1".to_string(), tx1).await;
    manager.add("conn-2".to_string(), tx2).await;

    manager.shutdown_all().await;

    assert_eq!(manager.connection_count().await, 0);
    assert!(matches!(rx1.recv().await, Some(Message::Close(None))));
    assert!(matches!(rx2.recv().await, Some(Message::Close(None))));
}
