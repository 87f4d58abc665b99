//! Append-only audit stores
//!
//! [`PgAuditStore`] writes to the `audit_log` table; [`InMemoryAuditStore`]
//! backs local runs and tests. Neither exposes an update or delete path.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

use super::models::{AuditEntry, AuditFilter, NewAuditEntry};

/// Errors raised by audit stores
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Audit store unavailable: {0}")]
    Unavailable(String),
}

pub type AuditResult<T> = Result<T, AuditError>;

/// Persistence backend for audit entries
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Persist one entry as its own unit of work and return it with its id
    async fn append(&self, entry: NewAuditEntry) -> AuditResult<AuditEntry>;

    /// All entries matching `filter`, in insertion order
    async fn find(&self, filter: &AuditFilter) -> AuditResult<Vec<AuditEntry>>;

    /// Short backend name for health reporting
    fn kind(&self) -> &'static str;
}

// ============================================================================
// In-memory store
// ============================================================================

/// Process-local audit store
#[derive(Debug, Default)]
pub struct InMemoryAuditStore {
    entries: RwLock<Vec<AuditEntry>>,
    next_id: AtomicI64,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl AuditStore for InMemoryAuditStore {
    async fn append(&self, entry: NewAuditEntry) -> AuditResult<AuditEntry> {
        let record = AuditEntry {
            id: self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
            actor_identity: entry.actor_identity,
            action: entry.action.as_str().to_string(),
            operation_name: entry.operation_name,
            timestamp: entry.timestamp,
        };

        self.entries.write().await.push(record.clone());
        Ok(record)
    }

    async fn find(&self, filter: &AuditFilter) -> AuditResult<Vec<AuditEntry>> {
        let entries = self.entries.read().await;
        Ok(entries.iter().filter(|e| filter.matches(e)).cloned().collect())
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}

// ============================================================================
// Postgres store
// ============================================================================

const SELECT_COLUMNS: &str = "SELECT id, actor_identity, action, operation_name, timestamp FROM audit_log";

/// Audit store backed by the `audit_log` table
#[derive(Debug, Clone)]
pub struct PgAuditStore {
    pool: PgPool,
}

impl PgAuditStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditStore for PgAuditStore {
    async fn append(&self, entry: NewAuditEntry) -> AuditResult<AuditEntry> {
        // Runs on the pool directly so it never joins a caller's transaction
        let record = sqlx::query_as::<_, AuditEntry>(
            r#"
            INSERT INTO audit_log (actor_identity, action, operation_name, timestamp)
            VALUES ($1, $2, $3, $4)
            RETURNING id, actor_identity, action, operation_name, timestamp
            "#,
        )
        .bind(&entry.actor_identity)
        .bind(entry.action.as_str())
        .bind(&entry.operation_name)
        .bind(entry.timestamp)
        .fetch_one(&self.pool)
        .await?;

        debug!(
            audit_id = record.id,
            action = %record.action,
            operation = %record.operation_name,
            "Inserted audit log row"
        );

        Ok(record)
    }

    async fn find(&self, filter: &AuditFilter) -> AuditResult<Vec<AuditEntry>> {
        let records = match filter {
            AuditFilter::All => {
                sqlx::query_as::<_, AuditEntry>(&format!("{SELECT_COLUMNS} ORDER BY id"))
                    .fetch_all(&self.pool)
                    .await?
            },
            AuditFilter::Actor(actor) => {
                sqlx::query_as::<_, AuditEntry>(&format!(
                    "{SELECT_COLUMNS} WHERE actor_identity = $1 ORDER BY id"
                ))
                .bind(actor)
                .fetch_all(&self.pool)
                .await?
            },
            AuditFilter::Action(action) => {
                sqlx::query_as::<_, AuditEntry>(&format!("{SELECT_COLUMNS} WHERE action = $1 ORDER BY id"))
                    .bind(action)
                    .fetch_all(&self.pool)
                    .await?
            },
            AuditFilter::Operation(operation) => {
                sqlx::query_as::<_, AuditEntry>(&format!(
                    "{SELECT_COLUMNS} WHERE operation_name = $1 ORDER BY id"
                ))
                .bind(operation)
                .fetch_all(&self.pool)
                .await?
            },
            AuditFilter::ActorAndAction { actor, action } => {
                sqlx::query_as::<_, AuditEntry>(&format!(
                    "{SELECT_COLUMNS} WHERE actor_identity = $1 AND action = $2 ORDER BY id"
                ))
                .bind(actor)
                .bind(action)
                .fetch_all(&self.pool)
                .await?
            },
            AuditFilter::TimestampRange { start, end } => {
                sqlx::query_as::<_, AuditEntry>(&format!(
                    "{SELECT_COLUMNS} WHERE timestamp BETWEEN $1 AND $2 ORDER BY id"
                ))
                .bind(start)
                .bind(end)
                .fetch_all(&self.pool)
                .await?
            },
        };

        debug!(count = records.len(), filter = ?filter, "Queried audit log");

        Ok(records)
    }

    fn kind(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::models::AuditAction;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_memory_store_assigns_sequential_ids() {
        let store = InMemoryAuditStore::new();

        let first = store
            .append(NewAuditEntry::now("a@uni.edu", AuditAction::Create, "TeacherService.createTeacher"))
            .await
            .unwrap();
        let second = store
            .append(NewAuditEntry::now("b@uni.edu", AuditAction::Delete, "TeacherService.deleteTeacher"))
            .await
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.action, "CREATE");
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_memory_store_find_preserves_insertion_order() {
        let store = InMemoryAuditStore::new();
        for op in ["A.createX", "B.updateY", "C.createZ"] {
            let action = if op.contains("update") { AuditAction::Update } else { AuditAction::Create };
            store.append(NewAuditEntry::now("ana@uni.edu", action, op)).await.unwrap();
        }

        let creates = store.find(&AuditFilter::Action("CREATE".into())).await.unwrap();
        let ops: Vec<_> = creates.iter().map(|e| e.operation_name.as_str()).collect();
        assert_eq!(ops, vec!["A.createX", "C.createZ"]);
    }

    #[tokio::test]
    async fn test_memory_store_timestamp_range() {
        let store = InMemoryAuditStore::new();
        let base = Utc::now();

        for offset in [0, 10, 20] {
            let mut entry = NewAuditEntry::now("ana@uni.edu", AuditAction::Update, "S.updateX");
            entry.timestamp = base + Duration::seconds(offset);
            store.append(entry).await.unwrap();
        }

        let within = store
            .find(&AuditFilter::TimestampRange {
                start: base + Duration::seconds(10),
                end: base + Duration::seconds(20),
            })
            .await
            .unwrap();

        assert_eq!(within.len(), 2);
        assert!(within.iter().all(|e| e.timestamp >= base + Duration::seconds(10)));
    }
}
