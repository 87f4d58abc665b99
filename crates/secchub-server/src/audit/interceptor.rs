//! Audit interception for service-layer calls
//!
//! [`AuditInterceptor`] is a [`tower::Layer`] that wraps a service-layer type
//! into an [`Audited`] decorator. The decorator owns the service: its methods
//! are reachable only through [`Operation`] values, and every operation names
//! the method it runs. The decorator classifies that name and hands matching
//! calls to the [`AuditWriter`]:
//!
//! - [`Audited::call`] (deferred path): awaits the operation and audits it
//!   once it completes successfully, attributing it to the caller in the
//!   [`CallContext`].
//! - [`Audited::call_immediate`] (immediate path): runs an
//!   [`ImmediateOperation`] and audits it with the anonymous actor whatever
//!   it returns.
//!
//! Neither path inspects arguments or results, and neither can change what
//! the wrapped operation returns.

use async_trait::async_trait;
use std::sync::Arc;
use tower::Layer;
use tracing::{trace, warn};

use super::classifier::{operation_label, MethodClassifier};
use super::context::CallContext;
use super::models::{AuditAction, ANONYMOUS_ACTOR};
use super::writer::AuditWriter;

/// Marker for types eligible for audit interception
pub trait ServiceLayer: Send + Sync + 'static {
    /// Name used as the `<ServiceName>` part of operation labels
    const NAME: &'static str;
}

/// An async call on a service-layer type
///
/// `NAME` is the service method the operation runs, in camelCase
/// (`createTeacher`). It is what gets classified and labelled, so it must
/// stay in step with `execute`.
#[async_trait]
pub trait Operation<S: ServiceLayer>: Send {
    const NAME: &'static str;
    type Output: Send;
    type Error: Send;

    async fn execute(self, service: &S) -> Result<Self::Output, Self::Error>;
}

/// A synchronous call on a service-layer type, audited on the immediate path
pub trait ImmediateOperation<S: ServiceLayer> {
    const NAME: &'static str;
    type Output;

    fn execute(self, service: &S) -> Self::Output;
}

/// Wraps service-layer types in [`Audited`]
#[derive(Clone)]
pub struct AuditInterceptor {
    classifier: Arc<MethodClassifier>,
    writer: AuditWriter,
}

impl AuditInterceptor {
    pub fn new(writer: AuditWriter) -> Self {
        Self::with_classifier(MethodClassifier::default(), writer)
    }

    pub fn with_classifier(classifier: MethodClassifier, writer: AuditWriter) -> Self {
        Self {
            classifier: Arc::new(classifier),
            writer,
        }
    }

    pub fn writer(&self) -> &AuditWriter {
        &self.writer
    }

    pub fn wrap<S: ServiceLayer>(&self, service: S) -> Audited<S> {
        self.layer(service)
    }

    fn dispatch_all(&self, actor: &str, actions: Vec<AuditAction>, operation: &str) {
        for action in actions {
            self.writer.dispatch(actor, action, operation);
        }
    }
}

impl<S: ServiceLayer> Layer<S> for AuditInterceptor {
    type Service = Audited<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Audited {
            inner: Arc::new(inner),
            interceptor: self.clone(),
        }
    }
}

/// A service whose operations are audited
///
/// There is no way back to the bare service; every call goes through
/// [`Audited::call`] or [`Audited::call_immediate`].
pub struct Audited<S> {
    inner: Arc<S>,
    interceptor: AuditInterceptor,
}

impl<S> Clone for Audited<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            interceptor: self.interceptor.clone(),
        }
    }
}

impl<S: ServiceLayer> Audited<S> {
    /// Run an async operation and audit it on success.
    ///
    /// If the returned future is dropped before it completes, nothing is
    /// audited.
    pub async fn call<O>(&self, ctx: &CallContext, operation: O) -> Result<O::Output, O::Error>
    where
        O: Operation<S>,
    {
        let actions = self.interceptor.classifier.classify(O::NAME);
        if actions.is_empty() {
            return operation.execute(&self.inner).await;
        }

        let label = operation_label(S::NAME, O::NAME);
        let result = operation.execute(&self.inner).await;

        if result.is_ok() {
            let actor = match ctx.resolve_actor() {
                Ok(actor) => actor.unwrap_or(ANONYMOUS_ACTOR),
                Err(e) => {
                    warn!(
                        error = %e,
                        operation = %label,
                        "Could not resolve caller identity, auditing as anonymous"
                    );
                    ANONYMOUS_ACTOR
                },
            };
            self.interceptor.dispatch_all(actor, actions, &label);
        } else {
            trace!(operation = %label, "Operation failed, not audited");
        }

        result
    }

    /// Run a synchronous operation and audit it as anonymous.
    ///
    /// The entry is dispatched whatever the operation returns.
    pub fn call_immediate<O>(&self, operation: O) -> O::Output
    where
        O: ImmediateOperation<S>,
    {
        let actions = self.interceptor.classifier.classify(O::NAME);
        if actions.is_empty() {
            return operation.execute(&self.inner);
        }

        let label = operation_label(S::NAME, O::NAME);
        let value = operation.execute(&self.inner);
        self.interceptor.dispatch_all(ANONYMOUS_ACTOR, actions, &label);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::classifier::{PrefixRule, CREATE_RULE, DELETE_RULE, UPDATE_RULE};
    use crate::audit::context::{IdentityError, Principal, USER_EMAIL_HEADER};
    use crate::audit::models::AuditFilter;
    use crate::audit::store::{AuditStore, InMemoryAuditStore};

    struct Gradebook;

    impl ServiceLayer for Gradebook {
        const NAME: &'static str = "Gradebook";
    }

    impl Gradebook {
        async fn add_grade(&self, grade: u8) -> Result<u8, String> {
            if grade > 100 {
                return Err(format!("grade {grade} out of range"));
            }
            Ok(grade)
        }

        async fn list_grades(&self) -> Result<Vec<u8>, String> {
            Ok(vec![90, 75])
        }

        fn remove_grade(&self, id: u32) -> bool {
            id == 1
        }
    }

    struct AddGrade(u8);

    #[async_trait]
    impl Operation<Gradebook> for AddGrade {
        const NAME: &'static str = "addGrade";
        type Output = u8;
        type Error = String;

        async fn execute(self, gradebook: &Gradebook) -> Result<u8, String> {
            gradebook.add_grade(self.0).await
        }
    }

    struct ListGrades;

    #[async_trait]
    impl Operation<Gradebook> for ListGrades {
        const NAME: &'static str = "listGrades";
        type Output = Vec<u8>;
        type Error = String;

        async fn execute(self, gradebook: &Gradebook) -> Result<Vec<u8>, String> {
            gradebook.list_grades().await
        }
    }

    /// Never completes
    struct StalledAdd;

    #[async_trait]
    impl Operation<Gradebook> for StalledAdd {
        const NAME: &'static str = "addGrade";
        type Output = ();
        type Error = ();

        async fn execute(self, _gradebook: &Gradebook) -> Result<(), ()> {
            std::future::pending().await
        }
    }

    struct RemoveGrade(u32);

    impl ImmediateOperation<Gradebook> for RemoveGrade {
        const NAME: &'static str = "removeGrade";
        type Output = bool;

        fn execute(self, gradebook: &Gradebook) -> bool {
            gradebook.remove_grade(self.0)
        }
    }

    fn setup() -> (Arc<InMemoryAuditStore>, Audited<Gradebook>) {
        let store = Arc::new(InMemoryAuditStore::new());
        let interceptor = AuditInterceptor::new(AuditWriter::new(store.clone()));
        (store, interceptor.wrap(Gradebook))
    }

    fn caller(email: &str) -> CallContext {
        CallContext::authenticated(Principal::new(email, ["TEACHER"]))
    }

    #[tokio::test]
    async fn test_successful_call_is_audited_with_caller() {
        let (store, gradebook) = setup();

        let result = gradebook.call(&caller("prof@uni.edu"), AddGrade(88)).await;
        gradebook.interceptor.writer().flush().await;

        assert_eq!(result, Ok(88));
        let entries = store.find(&AuditFilter::All).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].actor_identity, "prof@uni.edu");
        assert_eq!(entries[0].action, "CREATE");
        assert_eq!(entries[0].operation_name, "Gradebook.addGrade");
    }

    #[tokio::test]
    async fn test_failed_call_passes_error_through_without_audit() {
        let (store, gradebook) = setup();

        let result = gradebook.call(&caller("prof@uni.edu"), AddGrade(120)).await;
        gradebook.interceptor.writer().flush().await;

        assert_eq!(result, Err("grade 120 out of range".to_string()));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_unclassified_call_is_not_audited() {
        let (store, gradebook) = setup();

        let result = gradebook.call(&caller("prof@uni.edu"), ListGrades).await;
        gradebook.interceptor.writer().flush().await;

        assert_eq!(result, Ok(vec![90, 75]));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_identity_failure_records_anonymous() {
        let (store, gradebook) = setup();
        let ctx = CallContext::unresolvable(IdentityError::BlankHeader(USER_EMAIL_HEADER));

        let result = gradebook.call(&ctx, AddGrade(70)).await;
        gradebook.interceptor.writer().flush().await;

        assert_eq!(result, Ok(70));
        let entries = store.find(&AuditFilter::All).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].actor_identity, ANONYMOUS_ACTOR);
    }

    #[tokio::test]
    async fn test_immediate_call_is_audited_as_anonymous_whatever_it_returns() {
        let (store, gradebook) = setup();

        assert!(gradebook.call_immediate(RemoveGrade(1)));
        assert!(!gradebook.call_immediate(RemoveGrade(7)));
        gradebook.interceptor.writer().flush().await;

        let entries = store.find(&AuditFilter::All).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.actor_identity == ANONYMOUS_ACTOR));
        assert!(entries.iter().all(|e| e.action == "DELETE"));
        assert!(entries.iter().all(|e| e.operation_name == "Gradebook.removeGrade"));
    }

    #[tokio::test]
    async fn test_dropped_future_dispatches_nothing() {
        let (store, gradebook) = setup();
        let ctx = caller("prof@uni.edu");

        let pending = gradebook.call(&ctx, StalledAdd);
        drop(pending);
        gradebook.interceptor.writer().flush().await;

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_one_entry_per_matched_action() {
        const ADD_AS_UPDATE: PrefixRule = PrefixRule {
            action: AuditAction::Update,
            prefixes: &["addGrade"],
        };
        let store = Arc::new(InMemoryAuditStore::new());
        let interceptor = AuditInterceptor::with_classifier(
            MethodClassifier::new(vec![CREATE_RULE, UPDATE_RULE, DELETE_RULE, ADD_AS_UPDATE]),
            AuditWriter::new(store.clone()),
        );
        let gradebook = interceptor.wrap(Gradebook);

        gradebook.call(&caller("prof@uni.edu"), AddGrade(50)).await.unwrap();
        interceptor.writer().flush().await;

        let mut actions: Vec<_> = store
            .find(&AuditFilter::All)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.action)
            .collect();
        actions.sort();
        assert_eq!(actions, vec!["CREATE", "UPDATE"]);
    }
}
