//! Report task database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Report, ReportStatus, ReportType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub requested_by: Uuid,
    pub report_type: String,
    pub status: String,
    pub progress: i16,
    /// Rendered report document (JSON), set once completed
    pub content: Option<Json>,
    pub error: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id"
    )]
    Student,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Report {
    fn from(model: Model) -> Self {
        Report {
            id: model.id,
            student_id: model.student_id,
            requested_by: model.requested_by,
            report_type: ReportType::from(model.report_type.as_str()),
            status: ReportStatus::from(model.status.as_str()),
            progress: model.progress,
            content: model.content,
            error: model.error,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
