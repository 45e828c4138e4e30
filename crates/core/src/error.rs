use crate::types::{DbId, Timestamp};

/// Domain-level error taxonomy for the coordination core.
///
/// `LockConflict` is an expected outcome of concurrent editing, not an
/// exceptional failure: it carries the current holder and expiry so the
/// caller can surface a wait/override decision to the end user. It is
/// never auto-retried.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Heartbeat or activity call against an unknown, expired, or reaped
    /// session. The caller must re-register, not retry blindly.
    #[error("Session {id} not found or no longer live")]
    SessionNotFound { id: DbId },

    /// A valid hard lock is held by another session.
    #[error("Entity is locked by session {holder_session_id} until {expires_at}")]
    LockConflict {
        holder_session_id: DbId,
        expires_at: Timestamp,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
