//! Teacher operations
//!
//! One type per [`TeacherService`] method. Each carries the method's
//! arguments and its camelCase name, which the audit layer classifies.

use async_trait::async_trait;

use super::service::TeacherService;
use super::types::{CreateTeacherRequest, Teacher, TeacherError, UpdateTeacherRequest};
use crate::audit::Operation;

#[derive(Debug, Clone)]
pub struct CreateTeacher(pub CreateTeacherRequest);

#[derive(Debug, Clone, Copy)]
pub struct FindTeacher(pub i64);

#[derive(Debug, Clone, Copy)]
pub struct ListTeachers;

#[derive(Debug, Clone)]
pub struct UpdateTeacher {
    pub id: i64,
    pub request: UpdateTeacherRequest,
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteTeacher(pub i64);

#[async_trait]
impl Operation<TeacherService> for CreateTeacher {
    const NAME: &'static str = "createTeacher";
    type Output = Teacher;
    type Error = TeacherError;

    async fn execute(self, service: &TeacherService) -> Result<Teacher, TeacherError> {
        service.create_teacher(self.0).await
    }
}

#[async_trait]
impl Operation<TeacherService> for FindTeacher {
    const NAME: &'static str = "findTeacher";
    type Output = Teacher;
    type Error = TeacherError;

    async fn execute(self, service: &TeacherService) -> Result<Teacher, TeacherError> {
        service.find_teacher(self.0).await
    }
}

#[async_trait]
impl Operation<TeacherService> for ListTeachers {
    const NAME: &'static str = "listTeachers";
    type Output = Vec<Teacher>;
    type Error = TeacherError;

    async fn execute(self, service: &TeacherService) -> Result<Vec<Teacher>, TeacherError> {
        service.list_teachers().await
    }
}

#[async_trait]
impl Operation<TeacherService> for UpdateTeacher {
    const NAME: &'static str = "updateTeacher";
    type Output = Teacher;
    type Error = TeacherError;

    async fn execute(self, service: &TeacherService) -> Result<Teacher, TeacherError> {
        service.update_teacher(self.id, self.request).await
    }
}

#[async_trait]
impl Operation<TeacherService> for DeleteTeacher {
    const NAME: &'static str = "deleteTeacher";
    type Output = ();
    type Error = TeacherError;

    async fn execute(self, service: &TeacherService) -> Result<(), TeacherError> {
        service.delete_teacher(self.0).await
    }
}
