//! Student directory repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::entities::gpa_record::{self, Entity as GpaRecordEntity};
use super::entities::student::{self, Entity as StudentEntity};
use crate::domain::{GpaRecord, Student};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Student repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Find student by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Student>>;

    /// Find the student record linked to a portal account
    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<Student>>;

    /// List students ordered by name, with pagination
    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<Student>, u64)>;

    /// GPA records for one student, most recent term first
    async fn gpa_records(&self, student_id: Uuid) -> AppResult<Vec<GpaRecord>>;

    /// All GPA records (staff view), most recent first
    async fn all_gpa_records(&self) -> AppResult<Vec<GpaRecord>>;
}

/// Concrete implementation of StudentRepository
pub struct StudentStore {
    db: Arc<DatabaseConnection>,
}

impl StudentStore {
    /// Create new repository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StudentRepository for StudentStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Student>> {
        let result = StudentEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Student::from))
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<Student>> {
        let result = StudentEntity::find()
            .filter(student::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Student::from))
    }

    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<Student>, u64)> {
        let paginator = StudentEntity::find()
            .order_by_asc(student::Column::FullName)
            .paginate(self.db.as_ref(), params.limit());

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page.saturating_sub(1)).await?;

        Ok((models.into_iter().map(Student::from).collect(), total))
    }

    async fn gpa_records(&self, student_id: Uuid) -> AppResult<Vec<GpaRecord>> {
        let models = GpaRecordEntity::find()
            .filter(gpa_record::Column::StudentId.eq(student_id))
            .order_by_desc(gpa_record::Column::RecordedAt)
            .all(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(GpaRecord::from).collect())
    }

    async fn all_gpa_records(&self) -> AppResult<Vec<GpaRecord>> {
        let models = GpaRecordEntity::find()
            .order_by_desc(gpa_record::Column::RecordedAt)
            .all(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(GpaRecord::from).collect())
    }
}
