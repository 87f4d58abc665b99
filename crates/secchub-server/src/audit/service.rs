//! Read side of the audit log
//!
//! Every query returns a lazy stream: the store is not touched until the
//! stream is first polled, and each stream can be consumed once.

use chrono::{DateTime, Utc};
use futures::{
    future,
    stream::{self, BoxStream},
    StreamExt,
};
use std::sync::Arc;
use tracing::debug;

use super::models::{AuditAction, AuditEntry, AuditFilter};
use super::store::{AuditResult, AuditStore};

/// Stream of audit entries produced by a query
pub type AuditStream = BoxStream<'static, AuditResult<AuditEntry>>;

/// Queries over persisted audit entries
#[derive(Clone)]
pub struct AuditLogService {
    store: Arc<dyn AuditStore>,
}

impl AuditLogService {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    pub fn store_kind(&self) -> &'static str {
        self.store.kind()
    }

    pub fn list_all(&self) -> AuditStream {
        self.query(AuditFilter::All)
    }

    /// Exact match on the actor identity
    pub fn by_actor(&self, actor_identity: &str) -> AuditStream {
        self.query(AuditFilter::Actor(actor_identity.to_string()))
    }

    /// Case-insensitive match on the action; unknown actions match nothing
    pub fn by_action(&self, action: &str) -> AuditStream {
        match normalize_action(action) {
            Some(action) => self.query(AuditFilter::Action(action)),
            None => stream::empty().boxed(),
        }
    }

    /// Exact match on `<ServiceName>.<methodName>`
    pub fn by_operation(&self, operation_name: &str) -> AuditStream {
        self.query(AuditFilter::Operation(operation_name.to_string()))
    }

    pub fn by_actor_and_action(&self, actor_identity: &str, action: &str) -> AuditStream {
        match normalize_action(action) {
            Some(action) => self.query(AuditFilter::ActorAndAction {
                actor: actor_identity.to_string(),
                action,
            }),
            None => stream::empty().boxed(),
        }
    }

    /// Entries with `start <= timestamp <= end`. Inverted bounds match nothing.
    pub fn by_timestamp_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> AuditStream {
        self.query(AuditFilter::TimestampRange { start, end })
    }

    fn query(&self, filter: AuditFilter) -> AuditStream {
        let store = Arc::clone(&self.store);

        stream::once(async move { store.find(&filter).await })
            .flat_map(|result| match result {
                Ok(entries) => stream::iter(entries.into_iter().map(Ok)).left_stream(),
                Err(e) => stream::once(future::ready(Err(e))).right_stream(),
            })
            .boxed()
    }
}

fn normalize_action(action: &str) -> Option<String> {
    match action.parse::<AuditAction>() {
        Ok(action) => Some(action.as_str().to_string()),
        Err(e) => {
            debug!(error = %e, "Audit query for unknown action");
            None
        },
    }
}
