//! Periodic reclamation of dead sessions, expired locks, and old activity.
//!
//! The reaper is the piece that makes the service self-healing: a client
//! that crashes without disconnecting loses its session, its locks, and
//! its cursors on the next sweep, with no cooperation required. Runs on a
//! fixed interval using `tokio::time::interval` until cancelled.
//!
//! Sweep order within one pass:
//!
//! 1. Sessions with no activity inside the timeout go offline; their
//!    locks and cursors are cascade-removed.
//! 2. Expired locks are deleted regardless of their owner's status, so a
//!    live session that stops renewing still loses its lease on time.
//! 3. Activity log rows older than the retention window are pruned.
//! 4. Offline session rows past the grace period are deleted outright.

use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use copresence_db::repositories::{ActivityLogRepo, CursorRepo, EntityLockRepo, SessionRepo};

use crate::config::ServerConfig;

/// Offline session rows are kept this many multiples of the session
/// timeout before being deleted, so a brief network partition does not
/// erase the row a dashboard might still be showing.
const OFFLINE_GRACE_MULTIPLIER: i64 = 10;

/// Run the reaper loop until `cancel` is triggered.
pub async fn run(pool: PgPool, config: ServerConfig, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = config.reaper_interval_secs,
        session_timeout_secs = config.session_timeout_secs,
        activity_retention_hours = config.activity_retention_hours,
        "Reaper started"
    );

    let mut interval = tokio::time::interval(Duration::from_secs(config.reaper_interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Reaper stopping");
                break;
            }
            _ = interval.tick() => {
                if let Err(e) = sweep(&pool, &config).await {
                    tracing::error!(error = %e, "Reaper sweep failed");
                }
            }
        }
    }
}

/// One reaper pass. Each step is independent; a failure aborts the pass
/// and the next tick retries from the top.
pub async fn sweep(pool: &PgPool, config: &ServerConfig) -> Result<(), sqlx::Error> {
    let stale = SessionRepo::mark_stale_offline(pool, config.session_timeout_secs).await?;
    if !stale.is_empty() {
        let locks = EntityLockRepo::release_all_for_sessions(pool, &stale).await?;
        let cursors = CursorRepo::remove_all_for_sessions(pool, &stale).await?;
        tracing::info!(
            sessions = stale.len(),
            locks_released = locks,
            cursors_removed = cursors,
            "Reaped stale sessions"
        );
    }

    let expired = EntityLockRepo::delete_expired(pool).await?;
    if expired > 0 {
        tracing::info!(expired, "Reaped expired locks");
    }

    let cutoff = Utc::now() - chrono::Duration::hours(config.activity_retention_hours);
    let pruned = ActivityLogRepo::prune_older_than(pool, cutoff).await?;
    if pruned > 0 {
        tracing::debug!(pruned, "Pruned old activity rows");
    }

    let grace_secs = config.session_timeout_secs * OFFLINE_GRACE_MULTIPLIER;
    let deleted = SessionRepo::delete_offline_older_than(pool, grace_secs).await?;
    if deleted > 0 {
        tracing::debug!(deleted, "Deleted long-offline session rows");
    }

    Ok(())
}
