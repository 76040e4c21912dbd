//! GPA record database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::GpaRecord;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "gpa_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub term: String,
    pub gpa: f32,
    pub credits: i16,
    pub recorded_at: DateTimeUtc,
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
impl From<Model> for GpaRecord {
    fn from(model: Model) -> Self {
        GpaRecord {
            id: model.id,
            student_id: model.student_id,
            term: model.term,
            gpa: model.gpa,
            credits: model.credits,
            recorded_at: model.recorded_at,
        }
    }
}
