use axum::extract::ws::{Message, Utf8Bytes, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};

use copresence_core::protocol::CoordMessage;
use copresence_events::{SubscriptionLapse, TopicFilter};

use crate::state::AppState;

/// HTTP handler that upgrades the connection to WebSocket.
///
/// After the upgrade the connection is registered with `WsManager`, given
/// a subscription to the activity bus, and managed by a sender task plus
/// a combined receive/forward loop.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Manage a single WebSocket connection after upgrade.
///
/// New connections start subscribed to every topic; the client narrows
/// (or widens) the set by sending a `subscribe` message at any time, which
/// replaces the filter set wholesale. Activity events matching a filter
/// are forwarded as they are published; when the connection falls behind
/// the bus and events are dropped, the client gets a `presence.resync`
/// telling it to re-pull the snapshot instead of trusting continuity.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "WebSocket connected");

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Message>();
    state.ws_manager.add(conn_id.clone(), tx.clone()).await;

    let mut subscription = state.activity_bus.subscribe(vec![TopicFilter::All]);

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    loop {
        tokio::select! {
            inbound = stream.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        handle_client_message(&conn_id, &text, &mut subscription, &tx);
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(Message::Pong(_))) => {
                        tracing::trace!(conn_id = %conn_id, "Pong received");
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                        break;
                    }
                }
            }
            event = subscription.recv() => {
                match event {
                    Ok(event) => {
                        let msg = CoordMessage::Activity {
                            seq: event.seq,
                            session_id: event.session_id,
                            activity_type: event.activity_type,
                            entity_type: event.entity_type,
                            entity_id: event.entity_id,
                            details: event.details,
                            timestamp: event.timestamp,
                        };
                        if send_json(&tx, &msg).is_err() {
                            break;
                        }
                    }
                    Err(SubscriptionLapse::Lagged { skipped }) => {
                        tracing::warn!(conn_id = %conn_id, skipped, "Subscriber lagged; requesting resync");
                        if send_json(&tx, &CoordMessage::PresenceResync { skipped }).is_err() {
                            break;
                        }
                    }
                    Err(SubscriptionLapse::Closed) => break,
                }
            }
        }
    }

    // Clean up: remove connection and abort sender task.
    state.ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}

/// Process one inbound client text frame.
///
/// Only `subscribe` is accepted from clients; anything else (including
/// server-to-client message types echoed back) gets an `error` reply, and
/// the connection's current filters stay untouched on any failure.
fn handle_client_message(
    conn_id: &str,
    text: &str,
    subscription: &mut copresence_events::Subscription,
    tx: &tokio::sync::mpsc::UnboundedSender<Message>,
) {
    let parsed: Result<CoordMessage, _> = serde_json::from_str(text);
    match parsed {
        Ok(CoordMessage::Subscribe { topics }) => {
            let mut filters = Vec::with_capacity(topics.len());
            for topic in &topics {
                match TopicFilter::parse(topic) {
                    Ok(filter) => filters.push(filter),
                    Err(e) => {
                        let _ = send_json(tx, &CoordMessage::Error { message: e });
                        return;
                    }
                }
            }
            tracing::debug!(conn_id = %conn_id, topics = ?topics, "Subscription filters replaced");
            subscription.set_filters(filters);
        }
        Ok(_) => {
            let _ = send_json(
                tx,
                &CoordMessage::Error {
                    message: "Only 'subscribe' messages are accepted".into(),
                },
            );
        }
        Err(e) => {
            let _ = send_json(
                tx,
                &CoordMessage::Error {
                    message: format!("Malformed message: {e}"),
                },
            );
        }
    }
}

/// Serialize a protocol message and queue it for the sender task.
fn send_json(
    tx: &tokio::sync::mpsc::UnboundedSender<Message>,
    msg: &CoordMessage,
) -> Result<(), ()> {
    let json = serde_json::to_string(msg).map_err(|_| ())?;
    tx.send(Message::Text(Utf8Bytes::from(json))).map_err(|_| ())
}
