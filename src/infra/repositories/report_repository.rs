//! Report task repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::report::{self, ActiveModel, Entity as ReportEntity};
use crate::domain::{Report, ReportStatus};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Report repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Find task by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Report>>;

    /// Persist a newly created pending task
    async fn create(&self, report: Report) -> AppResult<Report>;

    /// Update task status and progress
    async fn set_progress(&self, id: Uuid, status: ReportStatus, progress: i16) -> AppResult<()>;

    /// Mark the task completed and store the rendered document
    async fn complete(&self, id: Uuid, content: serde_json::Value) -> AppResult<()>;

    /// Mark the task failed with a reason
    async fn fail(&self, id: Uuid, error: String) -> AppResult<()>;

    /// Tasks requested by one account, newest first
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Report>>;

    /// All tasks (admin view), newest first
    async fn list_all(&self) -> AppResult<Vec<Report>>;
}

/// Concrete implementation of ReportRepository
pub struct ReportStore {
    db: Arc<DatabaseConnection>,
}

impl ReportStore {
    /// Create new repository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn touch(&self, id: Uuid) -> AppResult<ActiveModel> {
        let model = ReportEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = model.into();
        active.updated_at = Set(chrono::Utc::now());
        Ok(active)
    }
}

#[async_trait]
impl ReportRepository for ReportStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Report>> {
        let result = ReportEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Report::from))
    }

    async fn create(&self, report: Report) -> AppResult<Report> {
        let active_model = ActiveModel {
            id: Set(report.id),
            student_id: Set(report.student_id),
            requested_by: Set(report.requested_by),
            report_type: Set(report.report_type.to_string()),
            status: Set(report.status.to_string()),
            progress: Set(report.progress),
            content: Set(report.content.clone()),
            error: Set(report.error.clone()),
            created_at: Set(report.created_at),
            updated_at: Set(report.updated_at),
        };

        let model = active_model
            .insert(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(Report::from(model))
    }

    async fn set_progress(&self, id: Uuid, status: ReportStatus, progress: i16) -> AppResult<()> {
        let mut active = self.touch(id).await?;
        active.status = Set(status.to_string());
        active.progress = Set(progress);
        active.update(self.db.as_ref()).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn complete(&self, id: Uuid, content: serde_json::Value) -> AppResult<()> {
        let mut active = self.touch(id).await?;
        active.status = Set(ReportStatus::Completed.to_string());
        active.progress = Set(crate::config::REPORT_PROGRESS_DONE);
        active.content = Set(Some(content));
        active.update(self.db.as_ref()).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn fail(&self, id: Uuid, error: String) -> AppResult<()> {
        let mut active = self.touch(id).await?;
        active.status = Set(ReportStatus::Failed.to_string());
        active.error = Set(Some(error));
        active.update(self.db.as_ref()).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Report>> {
        let models = ReportEntity::find()
            .filter(report::Column::RequestedBy.eq(user_id))
            .order_by_desc(report::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Report::from).collect())
    }

    async fn list_all(&self) -> AppResult<Vec<Report>> {
        let models = ReportEntity::find()
            .order_by_desc(report::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Report::from).collect())
    }
}
