//! Monitor request operations
//!
//! Approval and rejection are both `UPDATE`s in the audit log.

use async_trait::async_trait;

use super::service::MonitorRequestService;
use super::types::{MonitorError, MonitorRequest, MonitorRequestFilter, NewMonitorRequest};
use crate::audit::Operation;

#[derive(Debug, Clone)]
pub struct CreateMonitorRequest(pub NewMonitorRequest);

#[derive(Debug, Clone, Copy)]
pub struct FindMonitorRequest(pub i64);

#[derive(Debug, Clone, Copy, Default)]
pub struct ListMonitorRequests(pub MonitorRequestFilter);

#[derive(Debug, Clone, Copy)]
pub struct ApproveMonitorRequest(pub i64);

#[derive(Debug, Clone, Copy)]
pub struct RejectMonitorRequest(pub i64);

#[async_trait]
impl Operation<MonitorRequestService> for CreateMonitorRequest {
    const NAME: &'static str = "createMonitorRequest";
    type Output = MonitorRequest;
    type Error = MonitorError;

    async fn execute(self, service: &MonitorRequestService) -> Result<MonitorRequest, MonitorError> {
        service.create_monitor_request(self.0).await
    }
}

#[async_trait]
impl Operation<MonitorRequestService> for FindMonitorRequest {
    const NAME: &'static str = "findMonitorRequest";
    type Output = MonitorRequest;
    type Error = MonitorError;

    async fn execute(self, service: &MonitorRequestService) -> Result<MonitorRequest, MonitorError> {
        service.find_monitor_request(self.0).await
    }
}

#[async_trait]
impl Operation<MonitorRequestService> for ListMonitorRequests {
    const NAME: &'static str = "listMonitorRequests";
    type Output = Vec<MonitorRequest>;
    type Error = MonitorError;

    async fn execute(self, service: &MonitorRequestService) -> Result<Vec<MonitorRequest>, MonitorError> {
        service.list_monitor_requests(self.0).await
    }
}

#[async_trait]
impl Operation<MonitorRequestService> for ApproveMonitorRequest {
    const NAME: &'static str = "approveMonitorRequest";
    type Output = MonitorRequest;
    type Error = MonitorError;

    async fn execute(self, service: &MonitorRequestService) -> Result<MonitorRequest, MonitorError> {
        service.approve_monitor_request(self.0).await
    }
}

#[async_trait]
impl Operation<MonitorRequestService> for RejectMonitorRequest {
    const NAME: &'static str = "rejectMonitorRequest";
    type Output = MonitorRequest;
    type Error = MonitorError;

    async fn execute(self, service: &MonitorRequestService) -> Result<MonitorRequest, MonitorError> {
        service.reject_monitor_request(self.0).await
    }
}
