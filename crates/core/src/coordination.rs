//! Coordination constants, types, and validation.
//!
//! This module lives in `core` (zero internal deps) so that the API layer,
//! repositories, WebSocket handlers, and the background reaper all reference
//! the same timeouts, lock durations, entity/lock vocabularies, and
//! validation rules.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Liveness constants
// ---------------------------------------------------------------------------

/// How often clients are expected to send a session heartbeat (in seconds).
pub const HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// A session with no heartbeat for this long is eligible for reaping.
/// Three missed heartbeats at the default interval.
pub const SESSION_TIMEOUT_SECS: i64 = 90;

/// How often the background reaper sweep runs (in seconds).
pub const REAPER_INTERVAL_SECS: u64 = 60;

/// Activity log rows older than this are pruned by the reaper.
pub const ACTIVITY_RETENTION_HOURS: i64 = 24;

/// Suggested minimum interval between cursor updates from one session
/// (in milliseconds). Enforced client-side to bound broadcast volume.
pub const CURSOR_MIN_UPDATE_INTERVAL_MS: u64 = 100;

// ---------------------------------------------------------------------------
// Lock duration constants
// ---------------------------------------------------------------------------

/// Default lock duration in seconds (5 minutes).
pub const DEFAULT_LOCK_DURATION_SECS: i64 = 300;

/// Maximum allowed lock duration in seconds (1 hour).
pub const MAX_LOCK_DURATION_SECS: i64 = 3600;

/// Minimum lock duration in seconds.
pub const MIN_LOCK_DURATION_SECS: i64 = 30;

// ---------------------------------------------------------------------------
// Entity types (the things that can be locked / have presence)
// ---------------------------------------------------------------------------

/// Known entity types for locking, presence, and cursors.
pub mod entity_types {
    pub const TASK: &str = "task";
    pub const DOCUMENT: &str = "document";
    pub const BOARD: &str = "board";
}

/// The set of all valid entity types for coordination.
pub const VALID_ENTITY_TYPES: &[&str] = &[
    entity_types::TASK,
    entity_types::DOCUMENT,
    entity_types::BOARD,
];

/// Returns `true` if the given entity type is valid for coordination.
pub fn is_valid_entity_type(entity_type: &str) -> bool {
    VALID_ENTITY_TYPES.contains(&entity_type)
}

// ---------------------------------------------------------------------------
// Session status
// ---------------------------------------------------------------------------

/// Lifecycle status of a session.
///
/// `online --(heartbeat timeout)--> offline --(re-register)--> online`.
/// The row itself is removed after a longer grace period, not on the
/// offline transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Online,
    Away,
    Offline,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Online => "online",
            SessionStatus::Away => "away",
            SessionStatus::Offline => "offline",
        }
    }

    /// Parse a status string as stored in the `sessions.status` column.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "online" => Some(SessionStatus::Online),
            "away" => Some(SessionStatus::Away),
            "offline" => Some(SessionStatus::Offline),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Lock kinds
// ---------------------------------------------------------------------------

/// Advisory lock kinds.
///
/// A `hard` lock is exclusive: while one is valid, no other session can
/// acquire any lock on the entity. `soft` locks signal intent to edit;
/// any number may coexist and they never block or preempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockKind {
    Soft,
    Hard,
}

impl LockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockKind::Soft => "soft",
            LockKind::Hard => "hard",
        }
    }

    /// Parse a kind string as stored in the `entity_locks.lock_kind` column.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "soft" => Some(LockKind::Soft),
            "hard" => Some(LockKind::Hard),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Validate a lock duration in seconds. Returns `Ok(())` or an error message.
pub fn validate_lock_duration(seconds: i64) -> Result<(), String> {
    if seconds < MIN_LOCK_DURATION_SECS {
        return Err(format!(
            "Lock duration must be at least {MIN_LOCK_DURATION_SECS} seconds, got {seconds}"
        ));
    }
    if seconds > MAX_LOCK_DURATION_SECS {
        return Err(format!(
            "Lock duration must be at most {MAX_LOCK_DURATION_SECS} seconds, got {seconds}"
        ));
    }
    Ok(())
}

/// Validate that both entity_type and entity_id are acceptable.
pub fn validate_entity_ref(entity_type: &str, entity_id: DbId) -> Result<(), String> {
    if !is_valid_entity_type(entity_type) {
        return Err(format!(
            "Invalid entity_type '{entity_type}'. Must be one of: {}",
            VALID_ENTITY_TYPES.join(", ")
        ));
    }
    if entity_id <= 0 {
        return Err(format!("entity_id must be positive, got {entity_id}"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
