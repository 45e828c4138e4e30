//! Integration tests for session liveness, the reap cascade, cursors,
//! the activity log, and the derived presence snapshot.

use sqlx::PgPool;

use copresence_db::repositories::{
    ActivityLogRepo, CursorRepo, EntityLockRepo, PresenceRepo, SessionRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Backdate a session's liveness timestamp so it looks stale.
async fn backdate_activity(pool: &PgPool, session_id: i64, secs: i64) {
    sqlx::query(
        "UPDATE sessions SET last_activity_at = NOW() - ($2 || ' seconds')::interval \
         WHERE id = $1",
    )
    .bind(session_id)
    .bind(secs.to_string())
    .execute(pool)
    .await
    .expect("backdate");
}

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn register_creates_an_online_session(pool: PgPool) {
    let s = SessionRepo::register(&pool, "alice").await.unwrap();

    assert_eq!(s.actor_id, "alice");
    assert_eq!(s.status, "online");
    assert!(s.current_entity_type.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn heartbeat_refreshes_liveness(pool: PgPool) {
    let s = SessionRepo::register(&pool, "alice").await.unwrap();
    backdate_activity(&pool, s.id, 60).await;

    assert!(SessionRepo::heartbeat(&pool, s.id).await.unwrap());

    let refreshed = SessionRepo::get(&pool, s.id).await.unwrap().unwrap();
    assert!(refreshed.last_activity_at > s.last_activity_at);
}

#[sqlx::test(migrations = "./migrations")]
async fn heartbeat_against_offline_session_is_refused(pool: PgPool) {
    let s = SessionRepo::register(&pool, "alice").await.unwrap();
    SessionRepo::disconnect(&pool, s.id).await.unwrap();

    // Caller must re-register; the dead session is not resurrected.
    assert!(!SessionRepo::heartbeat(&pool, s.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn heartbeat_against_unknown_session_is_refused(pool: PgPool) {
    assert!(!SessionRepo::heartbeat(&pool, 424242).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn disconnect_is_idempotent(pool: PgPool) {
    let s = SessionRepo::register(&pool, "alice").await.unwrap();

    assert!(SessionRepo::disconnect(&pool, s.id).await.unwrap());
    assert!(!SessionRepo::disconnect(&pool, s.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn mark_activity_updates_current_entity(pool: PgPool) {
    let s = SessionRepo::register(&pool, "alice").await.unwrap();

    assert!(SessionRepo::mark_activity(&pool, s.id, "task", 123)
        .await
        .unwrap());

    let updated = SessionRepo::get(&pool, s.id).await.unwrap().unwrap();
    assert_eq!(updated.current_entity_type.as_deref(), Some("task"));
    assert_eq!(updated.current_entity_id, Some(123));
}

// ---------------------------------------------------------------------------
// Reap cascade (liveness sweep)
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn stale_session_is_reaped_and_its_lock_becomes_acquirable(pool: PgPool) {
    let s1 = SessionRepo::register(&pool, "alice").await.unwrap();
    let s2 = SessionRepo::register(&pool, "bob").await.unwrap();

    EntityLockRepo::acquire(&pool, "task", 123, s1.id, "hard", 3600)
        .await
        .unwrap();
    CursorRepo::upsert(
        &pool,
        s1.id,
        "task",
        123,
        &serde_json::json!({"x": 1, "y": 2}),
        "#ff0000",
    )
    .await
    .unwrap();

    // s1 stops heartbeating; s2 stays fresh.
    backdate_activity(&pool, s1.id, 120).await;

    // One reaper liveness sweep with the default 90s timeout.
    let reaped = SessionRepo::mark_stale_offline(&pool, 90).await.unwrap();
    assert_eq!(reaped, vec![s1.id]);

    let released = EntityLockRepo::release_all_for_sessions(&pool, &reaped)
        .await
        .unwrap();
    assert_eq!(released, 1);
    let removed = CursorRepo::remove_all_for_sessions(&pool, &reaped)
        .await
        .unwrap();
    assert_eq!(removed, 1);

    // The lock the stale session held is now acquirable by anyone.
    let outcome = EntityLockRepo::acquire(&pool, "task", 123, s2.id, "hard", 300)
        .await
        .unwrap();
    assert!(matches!(
        outcome,
        copresence_db::repositories::AcquireOutcome::Granted(_)
    ));
}

#[sqlx::test(migrations = "./migrations")]
async fn liveness_sweep_spares_fresh_sessions(pool: PgPool) {
    let s = SessionRepo::register(&pool, "alice").await.unwrap();

    let reaped = SessionRepo::mark_stale_offline(&pool, 90).await.unwrap();
    assert!(reaped.is_empty());

    let still = SessionRepo::get(&pool, s.id).await.unwrap().unwrap();
    assert_eq!(still.status, "online");
}

#[sqlx::test(migrations = "./migrations")]
async fn liveness_sweep_is_idempotent(pool: PgPool) {
    let s = SessionRepo::register(&pool, "alice").await.unwrap();
    backdate_activity(&pool, s.id, 120).await;

    let first = SessionRepo::mark_stale_offline(&pool, 90).await.unwrap();
    assert_eq!(first, vec![s.id]);

    // Re-running the sweep finds nothing new and corrupts nothing.
    let second = SessionRepo::mark_stale_offline(&pool, 90).await.unwrap();
    assert!(second.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn offline_sessions_are_removed_after_the_grace_period(pool: PgPool) {
    let s = SessionRepo::register(&pool, "alice").await.unwrap();
    SessionRepo::disconnect(&pool, s.id).await.unwrap();

    // Not yet past the grace period.
    assert_eq!(
        SessionRepo::delete_offline_older_than(&pool, 3600)
            .await
            .unwrap(),
        0
    );

    sqlx::query("UPDATE sessions SET updated_at = NOW() - interval '2 hours' WHERE id = $1")
        .bind(s.id)
        .execute(&pool)
        .await
        .unwrap();

    assert_eq!(
        SessionRepo::delete_offline_older_than(&pool, 3600)
            .await
            .unwrap(),
        1
    );
    assert!(SessionRepo::get(&pool, s.id).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Cursors
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn cursor_upsert_overwrites_in_place(pool: PgPool) {
    let s = SessionRepo::register(&pool, "alice").await.unwrap();

    let first = CursorRepo::upsert(
        &pool,
        s.id,
        "document",
        1,
        &serde_json::json!({"line": 1}),
        "#00ff00",
    )
    .await
    .unwrap();
    let second = CursorRepo::upsert(
        &pool,
        s.id,
        "document",
        1,
        &serde_json::json!({"line": 9}),
        "#00ff00",
    )
    .await
    .unwrap();

    assert_eq!(first.id, second.id, "one cursor per session per entity");
    assert_eq!(second.position["line"], 9);
}

#[sqlx::test(migrations = "./migrations")]
async fn list_cursors_filters_out_the_requesting_session(pool: PgPool) {
    let s1 = SessionRepo::register(&pool, "alice").await.unwrap();
    let s2 = SessionRepo::register(&pool, "bob").await.unwrap();

    for s in [&s1, &s2] {
        CursorRepo::upsert(
            &pool,
            s.id,
            "document",
            1,
            &serde_json::json!({"line": 1}),
            "#123456",
        )
        .await
        .unwrap();
    }

    let seen_by_s1 = CursorRepo::list_for_entity(&pool, "document", 1, s1.id)
        .await
        .unwrap();
    assert_eq!(seen_by_s1.len(), 1);
    assert_eq!(seen_by_s1[0].session_id, s2.id);
}

// ---------------------------------------------------------------------------
// Activity log
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn activity_sequence_numbers_increase(pool: PgPool) {
    let s = SessionRepo::register(&pool, "alice").await.unwrap();

    let a = ActivityLogRepo::append(&pool, s.id, "viewing", "task", 1, &serde_json::json!({}))
        .await
        .unwrap();
    let b = ActivityLogRepo::append(&pool, s.id, "editing", "task", 1, &serde_json::json!({}))
        .await
        .unwrap();

    assert!(b.id > a.id);
    assert_eq!(ActivityLogRepo::current_seq(&pool).await.unwrap(), b.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn activity_pruning_respects_the_cutoff(pool: PgPool) {
    let s = SessionRepo::register(&pool, "alice").await.unwrap();

    let entry = ActivityLogRepo::append(&pool, s.id, "viewing", "task", 1, &serde_json::json!({}))
        .await
        .unwrap();
    sqlx::query("UPDATE activity_log SET created_at = NOW() - interval '2 days' WHERE id = $1")
        .bind(entry.id)
        .execute(&pool)
        .await
        .unwrap();
    ActivityLogRepo::append(&pool, s.id, "editing", "task", 1, &serde_json::json!({}))
        .await
        .unwrap();

    let cutoff = chrono::Utc::now() - chrono::Duration::hours(24);
    let pruned = ActivityLogRepo::prune_older_than(&pool, cutoff).await.unwrap();
    assert_eq!(pruned, 1);

    let recent = ActivityLogRepo::list_recent_for_entity(&pool, "task", 1, 10)
        .await
        .unwrap();
    assert_eq!(recent.len(), 1);
}

// ---------------------------------------------------------------------------
// Presence snapshot
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn presence_for_entity_lists_online_sessions_with_their_lock(pool: PgPool) {
    let s1 = SessionRepo::register(&pool, "alice").await.unwrap();
    let s2 = SessionRepo::register(&pool, "bob").await.unwrap();
    let s3 = SessionRepo::register(&pool, "carol").await.unwrap();

    SessionRepo::mark_activity(&pool, s1.id, "task", 123).await.unwrap();
    SessionRepo::mark_activity(&pool, s2.id, "task", 123).await.unwrap();
    // carol is elsewhere.
    SessionRepo::mark_activity(&pool, s3.id, "board", 1).await.unwrap();

    EntityLockRepo::acquire(&pool, "task", 123, s1.id, "hard", 300)
        .await
        .unwrap();

    let entries = PresenceRepo::active_entries_for_entity(&pool, "task", 123)
        .await
        .unwrap();
    assert_eq!(entries.len(), 2);

    let alice = entries.iter().find(|e| e.session_id == s1.id).unwrap();
    assert_eq!(alice.lock_kind.as_deref(), Some("hard"));
    let bob = entries.iter().find(|e| e.session_id == s2.id).unwrap();
    assert!(bob.lock_id.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn presence_excludes_offline_sessions(pool: PgPool) {
    let s1 = SessionRepo::register(&pool, "alice").await.unwrap();
    SessionRepo::mark_activity(&pool, s1.id, "task", 123).await.unwrap();
    SessionRepo::disconnect(&pool, s1.id).await.unwrap();

    let entries = PresenceRepo::active_entries_for_entity(&pool, "task", 123)
        .await
        .unwrap();
    assert!(entries.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn presence_ignores_expired_locks(pool: PgPool) {
    let s1 = SessionRepo::register(&pool, "alice").await.unwrap();
    SessionRepo::mark_activity(&pool, s1.id, "task", 123).await.unwrap();
    EntityLockRepo::acquire(&pool, "task", 123, s1.id, "hard", -10)
        .await
        .unwrap();

    let entries = PresenceRepo::active_entries_for_entity(&pool, "task", 123)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].lock_id.is_none(), "expired lease is not presence");
}

#[sqlx::test(migrations = "./migrations")]
async fn unscoped_presence_lists_all_online_sessions(pool: PgPool) {
    let s1 = SessionRepo::register(&pool, "alice").await.unwrap();
    let s2 = SessionRepo::register(&pool, "bob").await.unwrap();
    SessionRepo::mark_activity(&pool, s1.id, "task", 1).await.unwrap();
    // bob has not focused any entity yet; still present.

    let entries = PresenceRepo::active_entries(&pool).await.unwrap();
    let ids: Vec<_> = entries.iter().map(|e| e.session_id).collect();
    assert!(ids.contains(&s1.id));
    assert!(ids.contains(&s2.id));
}
