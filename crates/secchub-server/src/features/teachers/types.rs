//! Teacher request and response types

use serde::{Deserialize, Serialize};

/// Upper bound for a teacher's weekly workload
pub const MAX_WEEKLY_HOURS: i32 = 60;

/// A teacher linked to a user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: i64,
    pub user_id: i64,
    pub employment_type_id: i64,
    pub max_hours: i32,
}

/// Payload for registering a teacher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeacherRequest {
    pub user_id: i64,
    pub employment_type_id: i64,
    pub max_hours: i32,
}

/// Partial update; absent fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTeacherRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_type_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hours: Option<i32>,
}

/// Errors raised by teacher operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TeacherError {
    #[error("user_id must be a positive identifier")]
    InvalidUserId,

    #[error("employment_type_id must be a positive identifier")]
    InvalidEmploymentType,

    #[error("max_hours must be between 1 and {MAX_WEEKLY_HOURS}, got {0}")]
    InvalidMaxHours(i32),

    #[error("Update request has no fields to change")]
    NoFieldsToUpdate,

    #[error("Teacher not found with ID: {0}")]
    NotFound(i64),
}

fn validate_employment_type(id: i64) -> Result<(), TeacherError> {
    if id <= 0 {
        return Err(TeacherError::InvalidEmploymentType);
    }
    Ok(())
}

fn validate_max_hours(hours: i32) -> Result<(), TeacherError> {
    if !(1..=MAX_WEEKLY_HOURS).contains(&hours) {
        return Err(TeacherError::InvalidMaxHours(hours));
    }
    Ok(())
}

impl CreateTeacherRequest {
    #[tracing::instrument(skip(self), fields(user_id = self.user_id))]
    pub fn validate(&self) -> Result<(), TeacherError> {
        if self.user_id <= 0 {
            return Err(TeacherError::InvalidUserId);
        }
        validate_employment_type(self.employment_type_id)?;
        validate_max_hours(self.max_hours)?;

        tracing::debug!("Request validation passed");
        Ok(())
    }
}

impl UpdateTeacherRequest {
    pub fn validate(&self) -> Result<(), TeacherError> {
        if self.employment_type_id.is_none() && self.max_hours.is_none() {
            return Err(TeacherError::NoFieldsToUpdate);
        }
        if let Some(id) = self.employment_type_id {
            validate_employment_type(id)?;
        }
        if let Some(hours) = self.max_hours {
            validate_max_hours(hours)?;
        }
        Ok(())
    }
}
