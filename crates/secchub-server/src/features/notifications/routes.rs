//! Notification API routes
//!
//! # Route Structure
//!
//! - `POST /api/v1/notifications/send` - Queue an email
//! - `POST /api/v1/notifications/templates` - Create a template
//! - `GET /api/v1/notifications/templates` - List templates
//! - `PUT /api/v1/notifications/templates/:id` - Update a template
//! - `DELETE /api/v1/notifications/templates/:id` - Delete a template
//! - `GET /api/v1/notifications/outbox` - List queued email
//! - `DELETE /api/v1/notifications/outbox/:id` - Drop a queued email

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};

use super::operations::{
    CreateEmailTemplate, DeleteEmailTemplate, ListEmailTemplates, ListOutbox, RemoveOutboxMessage,
    SendEmail, UpdateEmailTemplate,
};
use super::service::EmailService;
use super::types::{CreateTemplateRequest, NotificationError, SendEmailRequest, UpdateTemplateRequest};
use crate::api::response::ApiResponse;
use crate::audit::{Audited, CallContext};
use crate::error::{ApiResult, AppError};

type EmailState = Audited<EmailService>;

/// Creates the notifications router
pub fn notifications_routes() -> Router<EmailState> {
    Router::new()
        .route("/send", post(send_email))
        .route("/templates", post(create_template).get(list_templates))
        .route("/templates/:id", put(update_template).delete(delete_template))
        .route("/outbox", get(list_outbox))
        .route("/outbox/:id", delete(remove_outbox_message))
}

/// `POST /api/v1/notifications/send`
///
/// - `202 Accepted` - Email queued
/// - `400 Bad Request` - Missing fields or invalid recipient
#[tracing::instrument(skip(service, ctx, request), fields(to = %request.to))]
async fn send_email(
    State(service): State<EmailState>,
    ctx: CallContext,
    Json(request): Json<SendEmailRequest>,
) -> ApiResult<Response> {
    let message = service.call(&ctx, SendEmail(request)).await?;

    Ok(ApiResponse::with_status(StatusCode::ACCEPTED, message))
}

/// `POST /api/v1/notifications/templates`
///
/// - `201 Created` - Template created
/// - `400 Bad Request` - Validation error
/// - `409 Conflict` - Template name already taken
#[tracing::instrument(skip(service, ctx, request), fields(name = %request.name))]
async fn create_template(
    State(service): State<EmailState>,
    ctx: CallContext,
    Json(request): Json<CreateTemplateRequest>,
) -> ApiResult<Response> {
    let template = service.call(&ctx, CreateEmailTemplate(request)).await?;

    Ok(ApiResponse::with_status(StatusCode::CREATED, template))
}

/// `GET /api/v1/notifications/templates`
async fn list_templates(
    State(service): State<EmailState>,
    ctx: CallContext,
) -> ApiResult<Response> {
    let templates = service.call(&ctx, ListEmailTemplates).await?;

    Ok(ApiResponse::success(templates).into_response())
}

/// `PUT /api/v1/notifications/templates/:id`
#[tracing::instrument(skip(service, ctx, request))]
async fn update_template(
    State(service): State<EmailState>,
    ctx: CallContext,
    Path(id): Path<i64>,
    Json(request): Json<UpdateTemplateRequest>,
) -> ApiResult<Response> {
    let template = service.call(&ctx, UpdateEmailTemplate { id, request }).await?;

    Ok(ApiResponse::success(template).into_response())
}

/// `DELETE /api/v1/notifications/templates/:id`
#[tracing::instrument(skip(service, ctx))]
async fn delete_template(
    State(service): State<EmailState>,
    ctx: CallContext,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    service.call(&ctx, DeleteEmailTemplate(id)).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// `GET /api/v1/notifications/outbox`
async fn list_outbox(
    State(service): State<EmailState>,
    ctx: CallContext,
) -> ApiResult<Response> {
    let outbox = service.call(&ctx, ListOutbox).await?;

    Ok(ApiResponse::success(outbox).into_response())
}

/// `DELETE /api/v1/notifications/outbox/:id`
///
/// Synchronous removal; audited as anonymous.
#[tracing::instrument(skip(service))]
async fn remove_outbox_message(
    State(service): State<EmailState>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    service.call_immediate(RemoveOutboxMessage(id))?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

impl From<NotificationError> for AppError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::Required { .. } | NotificationError::InvalidRecipient(_) => {
                AppError::Validation(err.to_string())
            },
            NotificationError::DuplicateTemplate(_) => AppError::Conflict(err.to_string()),
            NotificationError::TemplateNotFound(_) | NotificationError::MessageNotFound(_) => {
                AppError::NotFound(err.to_string())
            },
        }
    }
}
