//! Email notifications
//!
//! Template management and an in-process outbox for outgoing email.
//!
//! # Structure
//!
//! - `types.rs` - Requests, templates, outbox messages and [`NotificationError`]
//! - `service.rs` - [`EmailService`], audited as `EmailService.<operation>`
//! - `operations.rs` - One audited operation per service method
//! - `routes.rs` - HTTP handlers

pub mod operations;
pub mod routes;
pub mod service;
pub mod types;

pub use operations::{
    CreateEmailTemplate, DeleteEmailTemplate, ListEmailTemplates, ListOutbox, RemoveOutboxMessage,
    SendEmail, UpdateEmailTemplate,
};
pub use routes::notifications_routes;
pub use service::EmailService;
pub use types::{
    CreateTemplateRequest, EmailTemplate, NotificationError, OutboxMessage, SendEmailRequest,
    UpdateTemplateRequest,
};
