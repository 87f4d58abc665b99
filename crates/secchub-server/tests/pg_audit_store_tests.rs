//! Postgres audit store tests
//!
//! These need a running database; `sqlx::test` creates a scratch database per
//! test from `DATABASE_URL` and applies the workspace migrations.
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/secchub cargo test --test pg_audit_store_tests -- --ignored
//! ```

use chrono::{Duration, Utc};
use futures::TryStreamExt;
use secchub_server::audit::{
    AuditAction, AuditFilter, AuditLogService, AuditStore, NewAuditEntry, PgAuditStore,
};
use sqlx::PgPool;
use std::sync::Arc;

fn entry(actor: &str, action: AuditAction, operation: &str) -> NewAuditEntry {
    NewAuditEntry::now(actor, action, operation)
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_append_returns_stored_row(pool: PgPool) {
    let store = PgAuditStore::new(pool);

    let written = store
        .append(entry("prof@uni.edu", AuditAction::Create, "TeacherService.createTeacher"))
        .await
        .unwrap();

    assert!(written.id > 0);
    assert_eq!(written.action, "CREATE");

    let all = store.find(&AuditFilter::All).await.unwrap();
    assert_eq!(all, vec![written]);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_filters_select_matching_rows(pool: PgPool) {
    let store = PgAuditStore::new(pool);

    store
        .append(entry("prof@uni.edu", AuditAction::Create, "TeacherService.createTeacher"))
        .await
        .unwrap();
    store
        .append(entry("prof@uni.edu", AuditAction::Delete, "TeacherService.deleteTeacher"))
        .await
        .unwrap();
    store
        .append(entry("admin@uni.edu", AuditAction::Update, "TeacherService.updateTeacher"))
        .await
        .unwrap();

    let by_actor = store.find(&AuditFilter::Actor("prof@uni.edu".into())).await.unwrap();
    assert_eq!(by_actor.len(), 2);

    let by_action = store.find(&AuditFilter::Action("UPDATE".into())).await.unwrap();
    assert_eq!(by_action.len(), 1);
    assert_eq!(by_action[0].actor_identity, "admin@uni.edu");

    let by_operation = store
        .find(&AuditFilter::Operation("TeacherService.deleteTeacher".into()))
        .await
        .unwrap();
    assert_eq!(by_operation.len(), 1);

    let combined = store
        .find(&AuditFilter::ActorAndAction {
            actor: "prof@uni.edu".into(),
            action: "CREATE".into(),
        })
        .await
        .unwrap();
    assert_eq!(combined.len(), 1);
    assert_eq!(combined[0].operation_name, "TeacherService.createTeacher");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_timestamp_range_is_inclusive(pool: PgPool) {
    let store = PgAuditStore::new(pool);
    let at = Utc::now() - Duration::minutes(5);

    let mut new_entry = entry("prof@uni.edu", AuditAction::Update, "TeacherService.updateTeacher");
    new_entry.timestamp = at;
    let written = store.append(new_entry).await.unwrap();

    let exact = store
        .find(&AuditFilter::TimestampRange { start: written.timestamp, end: written.timestamp })
        .await
        .unwrap();
    assert_eq!(exact.len(), 1);

    let inverted = store
        .find(&AuditFilter::TimestampRange {
            start: written.timestamp + Duration::seconds(1),
            end: written.timestamp - Duration::seconds(1),
        })
        .await
        .unwrap();
    assert!(inverted.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_query_service_over_postgres(pool: PgPool) {
    let store = Arc::new(PgAuditStore::new(pool));
    store
        .append(entry("anonymous", AuditAction::Delete, "EmailService.removeOutboxMessage"))
        .await
        .unwrap();

    let service = AuditLogService::new(store);
    assert_eq!(service.store_kind(), "postgres");

    let entries: Vec<_> = service.by_action("delete").try_collect().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].actor_identity, "anonymous");
}
