//! Teacher service
//!
//! Keeps teachers in process memory. The methods are private to the feature;
//! callers run them through the operations in [`super::operations`] on an
//! [`Audited`](crate::audit::Audited) service, so registrations, updates and
//! removals land in the audit log.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use super::types::{CreateTeacherRequest, Teacher, TeacherError, UpdateTeacherRequest};
use crate::audit::ServiceLayer;

#[derive(Debug, Default)]
pub struct TeacherService {
    teachers: RwLock<BTreeMap<i64, Teacher>>,
    next_id: AtomicI64,
}

impl ServiceLayer for TeacherService {
    const NAME: &'static str = "TeacherService";
}

impl TeacherService {
    pub fn new() -> Self {
        Self::default()
    }

    #[tracing::instrument(skip(self, request), fields(user_id = request.user_id))]
    pub(super) async fn create_teacher(&self, request: CreateTeacherRequest) -> Result<Teacher, TeacherError> {
        request.validate()?;

        let teacher = Teacher {
            id: self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
            user_id: request.user_id,
            employment_type_id: request.employment_type_id,
            max_hours: request.max_hours,
        };
        self.teachers.write().await.insert(teacher.id, teacher.clone());

        tracing::info!(teacher_id = teacher.id, "Teacher created");
        Ok(teacher)
    }

    pub(super) async fn find_teacher(&self, id: i64) -> Result<Teacher, TeacherError> {
        self.teachers
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(TeacherError::NotFound(id))
    }

    /// All teachers, ordered by id
    pub(super) async fn list_teachers(&self) -> Result<Vec<Teacher>, TeacherError> {
        Ok(self.teachers.read().await.values().cloned().collect())
    }

    #[tracing::instrument(skip(self, request))]
    pub(super) async fn update_teacher(
        &self,
        id: i64,
        request: UpdateTeacherRequest,
    ) -> Result<Teacher, TeacherError> {
        request.validate()?;

        let mut teachers = self.teachers.write().await;
        let teacher = teachers.get_mut(&id).ok_or(TeacherError::NotFound(id))?;

        if let Some(employment_type_id) = request.employment_type_id {
            teacher.employment_type_id = employment_type_id;
        }
        if let Some(max_hours) = request.max_hours {
            teacher.max_hours = max_hours;
        }

        tracing::info!(teacher_id = id, "Teacher updated");
        Ok(teacher.clone())
    }

    #[tracing::instrument(skip(self))]
    pub(super) async fn delete_teacher(&self, id: i64) -> Result<(), TeacherError> {
        if self.teachers.write().await.remove(&id).is_none() {
            return Err(TeacherError::NotFound(id));
        }

        tracing::info!(teacher_id = id, "Teacher deleted");
        Ok(())
    }
}
