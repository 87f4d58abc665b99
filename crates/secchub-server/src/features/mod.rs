//! Business features served by the SecHub API
//!
//! Each feature is a vertical slice with its own request types, service and
//! routes. Services are wrapped in [`Audited`] once at startup so every write
//! operation is recorded in the audit log.
//!
//! # Features
//!
//! - **teachers**: Teacher registration and workload management
//! - **notifications**: Email templates and the outgoing email outbox
//! - **monitors**: Student monitor requests and their approval

pub mod monitors;
pub mod notifications;
pub mod teachers;

use axum::Router;

use crate::audit::{AuditInterceptor, Audited};
use monitors::MonitorRequestService;
use notifications::EmailService;
use teachers::TeacherService;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    pub teachers: Audited<TeacherService>,
    pub notifications: Audited<EmailService>,
    pub monitors: Audited<MonitorRequestService>,
}

impl FeatureState {
    /// Fresh services wrapped by `interceptor`
    pub fn new(interceptor: &AuditInterceptor) -> Self {
        Self {
            teachers: interceptor.wrap(TeacherService::new()),
            notifications: interceptor.wrap(EmailService::new()),
            monitors: interceptor.wrap(MonitorRequestService::new()),
        }
    }
}

/// Creates the feature router, mounted under `/api/v1`
///
/// - `/teachers` - Teacher management
/// - `/notifications` - Email templates and outbox
/// - `/monitors` - Monitor requests
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .nest("/teachers", teachers::teachers_routes().with_state(state.teachers))
        .nest(
            "/notifications",
            notifications::notifications_routes().with_state(state.notifications),
        )
        .nest("/monitors", monitors::monitors_routes().with_state(state.monitors))
}
