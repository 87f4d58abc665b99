//! Monitor request types
//!
//! A monitor request is a student's application to assist on a course
//! (academic) or a section (administrative) for one semester.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest grade on the institution's scale
pub const MAX_GRADE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MonitorType {
    Academic,
    Administrative,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Approved => write!(f, "APPROVED"),
            Self::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// A weekly time window the student can work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub day: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl AvailabilitySlot {
    pub fn hours(&self) -> f64 {
        (self.end_time - self.start_time).num_minutes() as f64 / 60.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorRequest {
    pub id: i64,
    pub student_id: i64,
    pub semester_id: i64,
    #[serde(rename = "type")]
    pub monitor_type: MonitorType,
    pub course_id: Option<i64>,
    pub section_id: Option<i64>,
    pub grade: Option<f64>,
    pub professor_name: Option<String>,
    pub status: RequestStatus,
    pub request_date: NaiveDate,
    pub availabilities: Vec<AvailabilitySlot>,
}

impl MonitorRequest {
    /// Weekly hours offered across all slots
    pub fn total_hours(&self) -> f64 {
        self.availabilities.iter().map(AvailabilitySlot::hours).sum()
    }
}

/// Payload for submitting a monitor request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMonitorRequest {
    pub student_id: i64,
    pub semester_id: i64,
    #[serde(rename = "type")]
    pub monitor_type: MonitorType,
    #[serde(default)]
    pub course_id: Option<i64>,
    #[serde(default)]
    pub section_id: Option<i64>,
    #[serde(default)]
    pub grade: Option<f64>,
    #[serde(default)]
    pub professor_name: Option<String>,
    #[serde(default)]
    pub availabilities: Vec<AvailabilitySlot>,
}

/// Listing filters; absent fields match everything
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MonitorRequestFilter {
    pub status: Option<RequestStatus>,
    pub section_id: Option<i64>,
}

impl MonitorRequestFilter {
    pub fn matches(&self, request: &MonitorRequest) -> bool {
        self.status.is_none_or(|s| request.status == s)
            && self.section_id.is_none_or(|id| request.section_id == Some(id))
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MonitorError {
    #[error("student_id must be a positive identifier")]
    InvalidStudentId,

    #[error("semester_id must be a positive identifier")]
    InvalidSemesterId,

    #[error("Academic requests need a course_id")]
    MissingCourse,

    #[error("Administrative requests need a section_id")]
    MissingSection,

    #[error("grade must be between 0 and {MAX_GRADE}, got {0}")]
    InvalidGrade(f64),

    #[error("Availability on {day} must end after it starts")]
    InvalidSlot { day: String },

    #[error("Monitor request not found with ID: {0}")]
    NotFound(i64),

    #[error("Monitor request {id} was already {status}")]
    AlreadyDecided { id: i64, status: RequestStatus },
}

impl NewMonitorRequest {
    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.student_id <= 0 {
            return Err(MonitorError::InvalidStudentId);
        }
        if self.semester_id <= 0 {
            return Err(MonitorError::InvalidSemesterId);
        }

        match self.monitor_type {
            MonitorType::Academic if self.course_id.is_none() => return Err(MonitorError::MissingCourse),
            MonitorType::Administrative if self.section_id.is_none() => {
                return Err(MonitorError::MissingSection)
            },
            _ => {},
        }

        if let Some(grade) = self.grade {
            if !(0.0..=MAX_GRADE).contains(&grade) {
                return Err(MonitorError::InvalidGrade(grade));
            }
        }

        if let Some(slot) = self.availabilities.iter().find(|s| s.end_time <= s.start_time) {
            return Err(MonitorError::InvalidSlot { day: slot.day.clone() });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(day: &str, start: u32, end: u32) -> AvailabilitySlot {
        AvailabilitySlot {
            day: day.to_string(),
            start_time: NaiveTime::from_hms_opt(start, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(end, 0, 0).unwrap(),
        }
    }

    fn academic() -> NewMonitorRequest {
        NewMonitorRequest {
            student_id: 11,
            semester_id: 2,
            monitor_type: MonitorType::Academic,
            course_id: Some(40),
            section_id: None,
            grade: Some(4.6),
            professor_name: Some("Ana Ruiz".into()),
            availabilities: vec![slot("MONDAY", 8, 10)],
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(academic().validate().is_ok());
    }

    #[test]
    fn test_type_specific_references() {
        let mut request = academic();
        request.course_id = None;
        assert_eq!(request.validate(), Err(MonitorError::MissingCourse));

        request.monitor_type = MonitorType::Administrative;
        assert_eq!(request.validate(), Err(MonitorError::MissingSection));

        request.section_id = Some(7);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_grade_and_slot_bounds() {
        let mut request = academic();
        request.grade = Some(5.5);
        assert_eq!(request.validate(), Err(MonitorError::InvalidGrade(5.5)));

        let mut request = academic();
        request.availabilities.push(slot("FRIDAY", 14, 14));
        assert_eq!(
            request.validate(),
            Err(MonitorError::InvalidSlot { day: "FRIDAY".into() })
        );
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::json!({
            "student_id": 11,
            "semester_id": 2,
            "type": "ADMINISTRATIVE",
            "section_id": 7,
            "availabilities": [{ "day": "TUESDAY", "start_time": "09:00:00", "end_time": "11:30:00" }]
        });
        let request: NewMonitorRequest = serde_json::from_value(json).unwrap();

        assert_eq!(request.monitor_type, MonitorType::Administrative);
        assert_eq!(request.availabilities[0].hours(), 2.5);
        assert!(request.validate().is_ok());
    }
}
