//! Request handlers for the coordination API.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers validate input with `copresence_core::coordination`, delegate
//! to the repositories in `copresence_db`, and map errors via [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

pub mod activity;
pub mod cursor;
pub mod lock;
pub mod presence;
pub mod session;

use copresence_core::types::DbId;
use copresence_db::repositories::ActivityLogRepo;
use copresence_events::ActivityEvent;

use crate::error::AppResult;
use crate::state::AppState;

/// Append an activity row and broadcast the resulting event.
///
/// Persist-then-publish: the log row id becomes the event's sequence
/// number, so the stream and the presence snapshot version can never
/// disagree about ordering. Delivery to subscribers is at-least-once;
/// the row is the durable copy.
pub(crate) async fn record_activity(
    state: &AppState,
    session_id: DbId,
    activity_type: &str,
    entity_type: &str,
    entity_id: DbId,
    details: serde_json::Value,
) -> AppResult<copresence_db::models::activity::ActivityEntry> {
    let entry = ActivityLogRepo::append(
        &state.pool,
        session_id,
        activity_type,
        entity_type,
        entity_id,
        &details,
    )
    .await?;

    let event = ActivityEvent {
        seq: entry.id,
        session_id: entry.session_id,
        activity_type: entry.activity_type.clone(),
        entity_type: entry.entity_type.clone(),
        entity_id: entry.entity_id,
        details: entry.details.clone(),
        timestamp: entry.created_at,
    };
    state.activity_bus.publish(event);

    Ok(entry)
}
