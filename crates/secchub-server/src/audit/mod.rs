//! Audit logging for service-layer operations
//!
//! Write operations on business services are recorded as immutable audit
//! entries: who performed which action (`CREATE`, `UPDATE`, `DELETE`) through
//! which operation, and when.
//!
//! # Architecture
//!
//! - [`MethodClassifier`] maps operation names to audit actions by prefix
//! - [`AuditInterceptor`] wraps [`ServiceLayer`] types into [`Audited`]
//!   decorators; callers reach the service only through [`Operation`]s,
//!   which are classified by the method they name and handed to the writer
//! - [`AuditWriter`] persists entries on tracked background tasks; failures
//!   are logged and never reach the caller
//! - [`AuditStore`] is the append-only backend ([`PgAuditStore`] or
//!   [`InMemoryAuditStore`])
//! - [`AuditLogService`] and [`routes::audit_routes`] form the admin-only
//!   read side
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use secchub_server::audit::{
//!     AuditInterceptor, AuditWriter, CallContext, InMemoryAuditStore, Operation, ServiceLayer,
//! };
//!
//! struct CourseService;
//!
//! impl ServiceLayer for CourseService {
//!     const NAME: &'static str = "CourseService";
//! }
//!
//! struct CreateCourse(String);
//!
//! #[async_trait]
//! impl Operation<CourseService> for CreateCourse {
//!     const NAME: &'static str = "createCourse";
//!     type Output = String;
//!     type Error = String;
//!
//!     async fn execute(self, _courses: &CourseService) -> Result<String, String> {
//!         Ok(self.0)
//!     }
//! }
//!
//! # async fn example() {
//! let writer = AuditWriter::new(Arc::new(InMemoryAuditStore::new()));
//! let courses = AuditInterceptor::new(writer.clone()).wrap(CourseService);
//!
//! let ctx = CallContext::anonymous();
//! let code = courses.call(&ctx, CreateCourse("MAT-101".into())).await;
//! assert_eq!(code.as_deref(), Ok("MAT-101"));
//! writer.flush().await;
//! # }
//! ```

mod classifier;
mod context;
mod interceptor;
mod models;
pub mod routes;
mod service;
mod store;
mod writer;

pub use classifier::{
    method_label, operation_label, MethodClassifier, PrefixRule, CREATE_RULE, DELETE_RULE,
    UPDATE_RULE,
};
pub use context::{
    AdminCaller, CallContext, IdentityError, Principal, ADMIN_ROLE, USER_EMAIL_HEADER,
    USER_ROLES_HEADER,
};
pub use interceptor::{AuditInterceptor, Audited, ImmediateOperation, Operation, ServiceLayer};
pub use models::{
    AuditAction, AuditEntry, AuditFilter, NewAuditEntry, UnknownActionError, ANONYMOUS_ACTOR,
};
pub use routes::audit_routes;
pub use service::{AuditLogService, AuditStream};
pub use store::{AuditError, AuditResult, AuditStore, InMemoryAuditStore, PgAuditStore};
pub use writer::AuditWriter;
