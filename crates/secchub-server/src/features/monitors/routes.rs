//! Monitor request API routes
//!
//! # Route Structure
//!
//! - `POST /api/v1/monitors/requests` - Submit a request
//! - `GET /api/v1/monitors/requests?status=&section_id=` - List requests
//! - `GET /api/v1/monitors/requests/:id` - Get a single request
//! - `PATCH /api/v1/monitors/requests/:id/approve` - Approve a pending request
//! - `PATCH /api/v1/monitors/requests/:id/reject` - Reject a pending request

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};

use super::operations::{
    ApproveMonitorRequest, CreateMonitorRequest, FindMonitorRequest, ListMonitorRequests,
    RejectMonitorRequest,
};
use super::service::MonitorRequestService;
use super::types::{MonitorError, MonitorRequestFilter, NewMonitorRequest};
use crate::api::response::ApiResponse;
use crate::audit::{Audited, CallContext};
use crate::error::{ApiResult, AppError};

type MonitorState = Audited<MonitorRequestService>;

pub fn monitors_routes() -> Router<MonitorState> {
    Router::new()
        .route("/requests", post(create_request).get(list_requests))
        .route("/requests/:id", get(find_request))
        .route("/requests/:id/approve", patch(approve_request))
        .route("/requests/:id/reject", patch(reject_request))
}

/// `POST /api/v1/monitors/requests`
///
/// - `201 Created` - Request submitted as `PENDING`
/// - `400 Bad Request` - Validation error
#[tracing::instrument(skip(service, ctx, request), fields(student_id = request.student_id))]
async fn create_request(
    State(service): State<MonitorState>,
    ctx: CallContext,
    Json(request): Json<NewMonitorRequest>,
) -> ApiResult<Response> {
    let created = service.call(&ctx, CreateMonitorRequest(request)).await?;

    Ok(ApiResponse::with_status(StatusCode::CREATED, created))
}

async fn list_requests(
    State(service): State<MonitorState>,
    ctx: CallContext,
    Query(filter): Query<MonitorRequestFilter>,
) -> ApiResult<Response> {
    let requests = service.call(&ctx, ListMonitorRequests(filter)).await?;

    Ok(ApiResponse::success(requests).into_response())
}

async fn find_request(
    State(service): State<MonitorState>,
    ctx: CallContext,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let request = service.call(&ctx, FindMonitorRequest(id)).await?;

    Ok(ApiResponse::success(request).into_response())
}

/// `PATCH /api/v1/monitors/requests/:id/approve`
///
/// - `200 OK` - Request approved
/// - `404 Not Found` - No request with that id
/// - `409 Conflict` - Request already approved or rejected
#[tracing::instrument(skip(service, ctx))]
async fn approve_request(
    State(service): State<MonitorState>,
    ctx: CallContext,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let request = service.call(&ctx, ApproveMonitorRequest(id)).await?;

    Ok(ApiResponse::success(request).into_response())
}

/// `PATCH /api/v1/monitors/requests/:id/reject`
#[tracing::instrument(skip(service, ctx))]
async fn reject_request(
    State(service): State<MonitorState>,
    ctx: CallContext,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let request = service.call(&ctx, RejectMonitorRequest(id)).await?;

    Ok(ApiResponse::success(request).into_response())
}

impl From<MonitorError> for AppError {
    fn from(err: MonitorError) -> Self {
        match err {
            MonitorError::NotFound(_) => AppError::NotFound(err.to_string()),
            MonitorError::AlreadyDecided { .. } => AppError::Conflict(err.to_string()),
            MonitorError::InvalidStudentId
            | MonitorError::InvalidSemesterId
            | MonitorError::MissingCourse
            | MonitorError::MissingSection
            | MonitorError::InvalidGrade(_)
            | MonitorError::InvalidSlot { .. } => AppError::Validation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::monitors::types::RequestStatus;

    #[test]
    fn test_error_mapping() {
        assert_eq!(AppError::from(MonitorError::NotFound(4)).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::from(MonitorError::AlreadyDecided { id: 4, status: RequestStatus::Approved }).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::from(MonitorError::MissingSection).status(), StatusCode::BAD_REQUEST);
    }
}
