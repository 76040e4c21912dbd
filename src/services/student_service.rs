//! Student directory service.
//!
//! GPA access is role-scoped: staff and admins see every record,
//! students only the records of their own linked student row.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{GpaRecord, Student, StudentDetail, UserRole};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::Persistence;
use crate::types::PaginationParams;

/// Student service trait for dependency injection.
#[async_trait]
pub trait StudentService: Send + Sync {
    /// Paginated student directory
    async fn list_students(&self, params: PaginationParams) -> AppResult<(Vec<Student>, u64)>;

    /// Directory excluding the caller's own student record
    async fn list_peers(
        &self,
        user_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Student>, u64)>;

    /// One student with academic history
    async fn get_student(&self, id: Uuid) -> AppResult<StudentDetail>;

    /// GPA records visible to the calling account
    async fn gpa_records_for(&self, user_id: Uuid, role: &UserRole) -> AppResult<Vec<GpaRecord>>;
}

/// Concrete implementation of StudentService.
pub struct StudentDirectory<P: Persistence> {
    persistence: Arc<P>,
}

impl<P: Persistence> StudentDirectory<P> {
    /// Create new student service instance
    pub fn new(persistence: Arc<P>) -> Self {
        Self { persistence }
    }
}

#[async_trait]
impl<P: Persistence> StudentService for StudentDirectory<P> {
    async fn list_students(&self, params: PaginationParams) -> AppResult<(Vec<Student>, u64)> {
        self.persistence.students().list(&params).await
    }

    async fn list_peers(
        &self,
        user_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Student>, u64)> {
        let own = self.persistence.students().find_by_user_id(user_id).await?;
        let (students, total) = self.persistence.students().list(&params).await?;

        let own_id = own.map(|s| s.id);
        let peers: Vec<Student> = students
            .into_iter()
            .filter(|s| Some(s.id) != own_id)
            .collect();
        let removed = if own_id.is_some() { 1 } else { 0 };

        Ok((peers, total.saturating_sub(removed)))
    }

    async fn get_student(&self, id: Uuid) -> AppResult<StudentDetail> {
        let student = self
            .persistence
            .students()
            .find_by_id(id)
            .await?
            .ok_or_not_found()?;

        let gpa_records = self.persistence.students().gpa_records(id).await?;

        Ok(StudentDetail {
            student: student.into(),
            gpa_records,
        })
    }

    async fn gpa_records_for(&self, user_id: Uuid, role: &UserRole) -> AppResult<Vec<GpaRecord>> {
        if role.is_staff() {
            return self.persistence.students().all_gpa_records().await;
        }

        // Students without a linked record have no grades to show
        let student = self
            .persistence
            .students()
            .find_by_user_id(user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        self.persistence.students().gpa_records(student.id).await
    }
}
