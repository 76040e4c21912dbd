//! Student database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Student;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Linked portal account, if the student has one
    pub user_id: Option<Uuid>,
    pub full_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub program: String,
    pub year: i16,
    pub enrolled_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::gpa_record::Entity")]
    GpaRecords,
}

impl Related<super::gpa_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GpaRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Student {
    fn from(model: Model) -> Self {
        Student {
            id: model.id,
            user_id: model.user_id,
            full_name: model.full_name,
            email: model.email,
            program: model.program,
            year: model.year,
            enrolled_at: model.enrolled_at,
            updated_at: model.updated_at,
        }
    }
}
