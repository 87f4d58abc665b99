//! Fire-and-forget audit writes
//!
//! Every dispatched entry is persisted on its own tokio task. Callers never
//! wait for the write, and write failures are logged and dropped.

use std::sync::Arc;
use tokio_util::task::TaskTracker;
use tracing::{debug, error};

use super::models::{AuditAction, NewAuditEntry};
use super::store::AuditStore;

/// Persists audit entries off the caller's path
#[derive(Clone)]
pub struct AuditWriter {
    store: Arc<dyn AuditStore>,
    tracker: TaskTracker,
}

impl AuditWriter {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        let tracker = TaskTracker::new();
        // A closed tracker still accepts tasks; closing only lets `wait` resolve when idle.
        tracker.close();
        Self { store, tracker }
    }

    pub fn store(&self) -> Arc<dyn AuditStore> {
        Arc::clone(&self.store)
    }

    /// Queue one audit entry for persistence.
    ///
    /// The timestamp is taken when the write runs. Never blocks, never fails.
    pub fn dispatch(
        &self,
        actor_identity: impl Into<String>,
        action: AuditAction,
        operation_name: impl Into<String>,
    ) {
        let actor_identity = actor_identity.into();
        let operation_name = operation_name.into();

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            error!(
                operation = %operation_name,
                action = %action,
                "No async runtime available, audit entry dropped"
            );
            return;
        };

        let store = Arc::clone(&self.store);
        self.tracker.spawn_on(
            async move {
                let entry = NewAuditEntry::now(actor_identity, action, operation_name);
                let operation = entry.operation_name.clone();

                match store.append(entry).await {
                    Ok(record) => {
                        debug!(
                            audit_id = record.id,
                            actor = %record.actor_identity,
                            action = %record.action,
                            operation = %record.operation_name,
                            "Audit log entry created"
                        );
                    },
                    Err(e) => {
                        error!(error = %e, operation = %operation, "Failed to create audit log entry");
                    },
                }
            },
            &runtime,
        );
    }

    /// Number of writes still in flight
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    /// Wait until every write dispatched so far has finished
    pub async fn flush(&self) {
        self.tracker.wait().await;
    }
}
