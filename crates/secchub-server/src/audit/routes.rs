//! Audit log API routes
//!
//! All routes are restricted to administrators and stream their results as
//! newline-delimited JSON, one entry per line.
//!
//! # Route Structure
//!
//! - `GET /api/v1/audit-logs` - Every entry
//! - `GET /api/v1/audit-logs/email/:email` - Entries by actor identity
//! - `GET /api/v1/audit-logs/action/:action` - Entries by action (case-insensitive)
//! - `GET /api/v1/audit-logs/method/:method_name` - Entries by operation name
//! - `GET /api/v1/audit-logs/email/:email/action/:action` - Actor and action
//! - `GET /api/v1/audit-logs/date-range?start=..&end=..` - Inclusive time window

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use futures::{stream, StreamExt};
use serde::Deserialize;
use std::borrow::Cow;

use super::context::AdminCaller;
use super::service::{AuditLogService, AuditStream};
use crate::error::AppError;

pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// Creates the audit log router
///
/// ```rust,ignore
/// let app = Router::new()
///     .nest("/api/v1/audit-logs", audit_routes().with_state(audit_log_service));
/// ```
pub fn audit_routes() -> Router<AuditLogService> {
    Router::new()
        .route("/", get(list_all))
        .route("/email/:email", get(by_actor))
        .route("/action/:action", get(by_action))
        .route("/method/:method_name", get(by_operation))
        .route("/email/:email/action/:action", get(by_actor_and_action))
        .route("/date-range", get(by_timestamp_range))
}

#[tracing::instrument(skip_all, fields(admin = %admin.email))]
async fn list_all(
    AdminCaller(admin): AdminCaller,
    State(service): State<AuditLogService>,
) -> Result<Response, AppError> {
    ndjson(service.list_all()).await
}

#[tracing::instrument(skip_all, fields(admin = %admin.email, email = %email))]
async fn by_actor(
    AdminCaller(admin): AdminCaller,
    State(service): State<AuditLogService>,
    Path(email): Path<String>,
) -> Result<Response, AppError> {
    ndjson(service.by_actor(&email)).await
}

#[tracing::instrument(skip_all, fields(admin = %admin.email, action = %action))]
async fn by_action(
    AdminCaller(admin): AdminCaller,
    State(service): State<AuditLogService>,
    Path(action): Path<String>,
) -> Result<Response, AppError> {
    ndjson(service.by_action(&action)).await
}

#[tracing::instrument(skip_all, fields(admin = %admin.email, method = %method_name))]
async fn by_operation(
    AdminCaller(admin): AdminCaller,
    State(service): State<AuditLogService>,
    Path(method_name): Path<String>,
) -> Result<Response, AppError> {
    ndjson(service.by_operation(&method_name)).await
}

#[tracing::instrument(skip_all, fields(admin = %admin.email, email = %email, action = %action))]
async fn by_actor_and_action(
    AdminCaller(admin): AdminCaller,
    State(service): State<AuditLogService>,
    Path((email, action)): Path<(String, String)>,
) -> Result<Response, AppError> {
    ndjson(service.by_actor_and_action(&email, &action)).await
}

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub start: String,
    pub end: String,
}

#[tracing::instrument(skip_all, fields(admin = %admin.email, start = %range.start, end = %range.end))]
async fn by_timestamp_range(
    AdminCaller(admin): AdminCaller,
    State(service): State<AuditLogService>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Response, AppError> {
    let start = parse_timestamp("start", &range.start)?;
    let end = parse_timestamp("end", &range.end)?;

    ndjson(service.by_timestamp_range(start, end)).await
}

/// RFC 3339, or a naive `yyyy-MM-ddTHH:mm:ss[.fff]` taken as UTC
///
/// An unencoded `+HH:MM` offset arrives with its `+` decoded to a space;
/// that space is read back as `+`.
pub fn parse_timestamp(name: &str, value: &str) -> Result<DateTime<Utc>, AppError> {
    let value = restore_offset_sign(value.trim());
    let value = value.as_ref();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| {
            AppError::BadRequest(format!(
                "Invalid '{name}' timestamp '{value}': expected ISO-8601 date-time"
            ))
        })
}

fn restore_offset_sign(value: &str) -> Cow<'_, str> {
    let bytes = value.as_bytes();
    let Some(split) = bytes.len().checked_sub(6) else {
        return Cow::Borrowed(value);
    };
    let offset = &bytes[split + 1..];
    let looks_like_offset = bytes[split] == b' '
        && offset[2] == b':'
        && [0, 1, 3, 4].iter().all(|&i| offset[i].is_ascii_digit());

    if looks_like_offset {
        Cow::Owned(format!("{}+{}", &value[..split], &value[split + 1..]))
    } else {
        Cow::Borrowed(value)
    }
}

/// Encode a query stream as an NDJSON response.
///
/// The first item is awaited up front so a failing query becomes an error
/// response instead of a truncated body.
async fn ndjson(mut entries: AuditStream) -> Result<Response, AppError> {
    let first = match entries.next().await {
        Some(Err(e)) => return Err(e.into()),
        first => first,
    };

    let lines = stream::iter(first).chain(entries).map(|entry| -> Result<Vec<u8>, axum::BoxError> {
        let mut line = serde_json::to_vec(&entry?)?;
        line.push(b'\n');
        Ok(line)
    });

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, NDJSON_CONTENT_TYPE)],
        Body::from_stream(lines),
    )
        .into_response())
}
