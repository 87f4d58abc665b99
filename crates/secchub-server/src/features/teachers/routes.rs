//! Teacher API routes
//!
//! Every handler goes through the audited service, so write operations are
//! recorded against the caller in `x-user-email`.
//!
//! # Route Structure
//!
//! - `POST /api/v1/teachers` - Register a teacher
//! - `GET /api/v1/teachers` - List teachers
//! - `GET /api/v1/teachers/:id` - Get a single teacher
//! - `PUT /api/v1/teachers/:id` - Update employment type and hours
//! - `DELETE /api/v1/teachers/:id` - Remove a teacher

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use super::operations::{CreateTeacher, DeleteTeacher, FindTeacher, ListTeachers, UpdateTeacher};
use super::service::TeacherService;
use super::types::{CreateTeacherRequest, TeacherError, UpdateTeacherRequest};
use crate::api::response::ApiResponse;
use crate::audit::{Audited, CallContext};
use crate::error::{ApiResult, AppError};

type TeacherState = Audited<TeacherService>;

/// Creates the teachers router
///
/// ```rust,ignore
/// let app = Router::new()
///     .nest("/api/v1/teachers", teachers_routes().with_state(audited_teachers));
/// ```
pub fn teachers_routes() -> Router<TeacherState> {
    Router::new()
        .route("/", post(create_teacher).get(list_teachers))
        .route("/:id", get(find_teacher).put(update_teacher).delete(delete_teacher))
}

/// `POST /api/v1/teachers`
///
/// - `201 Created` - Teacher registered
/// - `400 Bad Request` - Validation error
#[tracing::instrument(skip(service, ctx, request), fields(user_id = request.user_id))]
async fn create_teacher(
    State(service): State<TeacherState>,
    ctx: CallContext,
    Json(request): Json<CreateTeacherRequest>,
) -> ApiResult<Response> {
    let teacher = service.call(&ctx, CreateTeacher(request)).await?;

    Ok(ApiResponse::with_status(StatusCode::CREATED, teacher))
}

/// `GET /api/v1/teachers`
async fn list_teachers(
    State(service): State<TeacherState>,
    ctx: CallContext,
) -> ApiResult<Response> {
    let teachers = service.call(&ctx, ListTeachers).await?;

    tracing::debug!(count = teachers.len(), "Teachers listed via API");
    Ok(ApiResponse::success(teachers).into_response())
}

/// `GET /api/v1/teachers/:id`
///
/// - `200 OK` - Teacher found
/// - `404 Not Found` - No teacher with that id
async fn find_teacher(
    State(service): State<TeacherState>,
    ctx: CallContext,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let teacher = service.call(&ctx, FindTeacher(id)).await?;

    Ok(ApiResponse::success(teacher).into_response())
}

/// `PUT /api/v1/teachers/:id`
///
/// - `200 OK` - Teacher updated
/// - `400 Bad Request` - Validation error
/// - `404 Not Found` - No teacher with that id
#[tracing::instrument(skip(service, ctx, request))]
async fn update_teacher(
    State(service): State<TeacherState>,
    ctx: CallContext,
    Path(id): Path<i64>,
    Json(request): Json<UpdateTeacherRequest>,
) -> ApiResult<Response> {
    let teacher = service.call(&ctx, UpdateTeacher { id, request }).await?;

    Ok(ApiResponse::success(teacher).into_response())
}

/// `DELETE /api/v1/teachers/:id`
///
/// - `204 No Content` - Teacher removed
/// - `404 Not Found` - No teacher with that id
#[tracing::instrument(skip(service, ctx))]
async fn delete_teacher(
    State(service): State<TeacherState>,
    ctx: CallContext,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    service.call(&ctx, DeleteTeacher(id)).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

impl From<TeacherError> for AppError {
    fn from(err: TeacherError) -> Self {
        match err {
            TeacherError::NotFound(_) => AppError::NotFound(err.to_string()),
            TeacherError::InvalidUserId
            | TeacherError::InvalidEmploymentType
            | TeacherError::InvalidMaxHours(_)
            | TeacherError::NoFieldsToUpdate => AppError::Validation(err.to_string()),
        }
    }
}
