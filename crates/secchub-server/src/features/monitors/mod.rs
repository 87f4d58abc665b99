//! Monitor requests
//!
//! Students apply to assist on a course or a section; administrators approve
//! or reject each request once.
//!
//! # Structure
//!
//! - `types.rs` - Requests, filters and [`MonitorError`]
//! - `service.rs` - [`MonitorRequestService`], audited as `MonitorRequestService.<operation>`
//! - `operations.rs` - One audited operation per service method
//! - `routes.rs` - HTTP handlers

pub mod operations;
pub mod routes;
pub mod service;
pub mod types;

pub use operations::{
    ApproveMonitorRequest, CreateMonitorRequest, FindMonitorRequest, ListMonitorRequests,
    RejectMonitorRequest,
};
pub use routes::monitors_routes;
pub use service::MonitorRequestService;
pub use types::{
    AvailabilitySlot, MonitorError, MonitorRequest, MonitorRequestFilter, MonitorType,
    NewMonitorRequest, RequestStatus,
};
