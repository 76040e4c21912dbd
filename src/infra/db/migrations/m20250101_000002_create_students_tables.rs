//! Migration: Create the students and gpa_records tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Students::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Students::UserId).uuid().null())
                    .col(ColumnDef::new(Students::FullName).string().not_null())
                    .col(
                        ColumnDef::new(Students::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::Program).string().not_null())
                    .col(ColumnDef::new(Students::Year).small_integer().not_null())
                    .col(
                        ColumnDef::new(Students::EnrolledAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Students::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_students_user_id")
                    .table(Students::Table)
                    .col(Students::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GpaRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GpaRecords::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GpaRecords::StudentId).uuid().not_null())
                    .col(ColumnDef::new(GpaRecords::Term).string().not_null())
                    .col(ColumnDef::new(GpaRecords::Gpa).float().not_null())
                    .col(
                        ColumnDef::new(GpaRecords::Credits)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GpaRecords::RecordedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_gpa_records_student")
                            .from(GpaRecords::Table, GpaRecords::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_gpa_records_student_id")
                    .table(GpaRecords::Table)
                    .col(GpaRecords::StudentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GpaRecords::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Students {
    Table,
    Id,
    UserId,
    FullName,
    Email,
    Program,
    Year,
    EnrolledAt,
    UpdatedAt,
}

#[derive(Iden)]
enum GpaRecords {
    Table,
    Id,
    StudentId,
    Term,
    Gpa,
    Credits,
    RecordedAt,
}
