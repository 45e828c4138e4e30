//! WebSocket message protocol for the coordination event stream.
//!
//! Serialized as JSON with an internally-tagged `"type"` discriminator so
//! clients can route messages by type string. The server never guarantees
//! exactly-once delivery: clients deduplicate on `(session_id, timestamp)`
//! and fall back to the presence snapshot when told to resynchronize.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Messages exchanged over the coordination WebSocket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum CoordMessage {
    /// Client sends: replace this connection's topic filter set.
    ///
    /// Each entry is `"*"`, an entity type (`"task"`), or a fully
    /// qualified ref (`"task:123"`).
    #[serde(rename = "subscribe")]
    Subscribe { topics: Vec<String> },

    /// Server sends: an activity event matching one of the connection's
    /// topic filters. `seq` is the event's position in the activity log
    /// and lines up with the presence snapshot version.
    #[serde(rename = "activity")]
    Activity {
        seq: DbId,
        session_id: DbId,
        activity_type: String,
        entity_type: String,
        entity_id: DbId,
        details: serde_json::Value,
        timestamp: Timestamp,
    },

    /// Server sends: this connection's event stream lagged and dropped
    /// messages. The client must re-pull the presence snapshot instead of
    /// assuming stream continuity.
    #[serde(rename = "presence.resync")]
    PresenceResync { skipped: u64 },

    /// Server sends: a subscription request was rejected.
    #[serde(rename = "error")]
    Error { message: String },
}
