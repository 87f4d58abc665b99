//! Monitor request service
//!
//! Requests start out `PENDING` and are decided once, by approval or
//! rejection. Methods are reached through [`super::operations`].

use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use super::types::{MonitorError, MonitorRequest, MonitorRequestFilter, NewMonitorRequest, RequestStatus};
use crate::audit::ServiceLayer;

#[derive(Debug, Default)]
pub struct MonitorRequestService {
    requests: RwLock<BTreeMap<i64, MonitorRequest>>,
    next_id: AtomicI64,
}

impl ServiceLayer for MonitorRequestService {
    const NAME: &'static str = "MonitorRequestService";
}

impl MonitorRequestService {
    pub fn new() -> Self {
        Self::default()
    }

    #[tracing::instrument(skip(self, request), fields(student_id = request.student_id))]
    pub(super) async fn create_monitor_request(
        &self,
        request: NewMonitorRequest,
    ) -> Result<MonitorRequest, MonitorError> {
        request.validate()?;

        let created = MonitorRequest {
            id: self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
            student_id: request.student_id,
            semester_id: request.semester_id,
            monitor_type: request.monitor_type,
            course_id: request.course_id,
            section_id: request.section_id,
            grade: request.grade,
            professor_name: request.professor_name,
            status: RequestStatus::Pending,
            request_date: Utc::now().date_naive(),
            availabilities: request.availabilities,
        };
        self.requests.write().await.insert(created.id, created.clone());

        tracing::info!(
            request_id = created.id,
            total_hours = created.total_hours(),
            "Monitor request submitted"
        );
        Ok(created)
    }

    pub(super) async fn find_monitor_request(&self, id: i64) -> Result<MonitorRequest, MonitorError> {
        self.requests
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(MonitorError::NotFound(id))
    }

    /// Matching requests, ordered by id
    pub(super) async fn list_monitor_requests(
        &self,
        filter: MonitorRequestFilter,
    ) -> Result<Vec<MonitorRequest>, MonitorError> {
        Ok(self
            .requests
            .read()
            .await
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    pub(super) async fn approve_monitor_request(&self, id: i64) -> Result<MonitorRequest, MonitorError> {
        self.decide(id, RequestStatus::Approved).await
    }

    pub(super) async fn reject_monitor_request(&self, id: i64) -> Result<MonitorRequest, MonitorError> {
        self.decide(id, RequestStatus::Rejected).await
    }

    #[tracing::instrument(skip(self))]
    async fn decide(&self, id: i64, outcome: RequestStatus) -> Result<MonitorRequest, MonitorError> {
        let mut requests = self.requests.write().await;
        let request = requests.get_mut(&id).ok_or(MonitorError::NotFound(id))?;

        if request.status != RequestStatus::Pending {
            return Err(MonitorError::AlreadyDecided {
                id,
                status: request.status,
            });
        }
        request.status = outcome;

        tracing::info!(request_id = id, status = %outcome, "Monitor request decided");
        Ok(request.clone())
    }
}
