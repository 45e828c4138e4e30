//! In-process activity fan-out backed by a `tokio::sync::broadcast` channel.
//!
//! [`ActivityBus`] is the central publish/subscribe hub for
//! [`ActivityEvent`]s. It is designed to be shared via `Arc<ActivityBus>`
//! across the application. Delivery is at-least-once within a process:
//! slow subscribers observe an explicit [`SubscriptionLapse::Lagged`] and
//! are expected to resynchronize via a presence snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use copresence_core::types::DbId;

use crate::topic::{any_match, TopicFilter};

// ---------------------------------------------------------------------------
// ActivityEvent
// ---------------------------------------------------------------------------

/// An activity event flowing through the coordination service.
///
/// `seq` is the event's `activity_log` row id: monotonically increasing,
/// and the same number the presence snapshot reports as its version, so
/// subscribers can reconcile incremental events against snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// Append-only sequence number (the activity_log row id).
    pub seq: DbId,

    /// The session that performed the activity.
    pub session_id: DbId,

    /// Dot-separated activity name, e.g. `"editing.started"`.
    pub activity_type: String,

    /// Entity the activity refers to.
    pub entity_type: String,
    pub entity_id: DbId,

    /// Free-form JSON payload carrying activity-specific data.
    pub details: serde_json::Value,

    /// When the event was recorded (UTC).
    pub timestamp: DateTime<Utc>,
}

impl ActivityEvent {
    /// Create an event with an empty details object, timestamped now.
    pub fn new(
        seq: DbId,
        session_id: DbId,
        activity_type: impl Into<String>,
        entity_type: impl Into<String>,
        entity_id: DbId,
    ) -> Self {
        Self {
            seq,
            session_id,
            activity_type: activity_type.into(),
            entity_type: entity_type.into(),
            entity_id,
            details: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Set the JSON details payload for the event.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }
}

// ---------------------------------------------------------------------------
// ActivityBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out hub for activity events.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`ActivityEvent`]. Topic matching
/// happens on the receive side ([`Subscription::recv`]); publish order is
/// preserved per subscriber, so events within one topic arrive in the
/// order they were published.
pub struct ActivityBus {
    sender: broadcast::Sender<ActivityEvent>,
}

impl ActivityBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers observe [`SubscriptionLapse::Lagged`].
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped;
    /// the activity log row written before publishing is the durable copy.
    pub fn publish(&self, event: ActivityEvent) {
        // Ignore the SendError -- it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe with a set of topic filters.
    ///
    /// Only events matching at least one filter are yielded by the
    /// returned subscription. The filter set can be replaced later via
    /// [`Subscription::set_filters`].
    pub fn subscribe(&self, filters: Vec<TopicFilter>) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
            filters,
        }
    }
}

impl Default for ActivityBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// Why a subscription stopped yielding events normally.
#[derive(Debug, PartialEq, Eq)]
pub enum SubscriptionLapse {
    /// The subscriber fell behind and `skipped` events were dropped.
    /// The consumer must resynchronize via a presence snapshot.
    Lagged { skipped: u64 },
    /// The bus was dropped; no further events will arrive.
    Closed,
}

/// A filtered view of the activity stream for one subscriber.
pub struct Subscription {
    receiver: broadcast::Receiver<ActivityEvent>,
    filters: Vec<TopicFilter>,
}

impl Subscription {
    /// Receive the next event matching this subscription's filters.
    ///
    /// Non-matching events are consumed and skipped. A lagged channel is
    /// reported once as [`SubscriptionLapse::Lagged`]; the subscription
    /// remains usable afterwards and resumes from the oldest retained
    /// event.
    pub async fn recv(&mut self) -> Result<ActivityEvent, SubscriptionLapse> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => {
                    if any_match(&self.filters, &event.entity_type, event.entity_id) {
                        return Ok(event);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    return Err(SubscriptionLapse::Lagged { skipped });
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(SubscriptionLapse::Closed);
                }
            }
        }
    }

    /// Replace the subscription's topic filter set.
    pub fn set_filters(&mut self, filters: Vec<TopicFilter>) {
        self.filters = filters;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
