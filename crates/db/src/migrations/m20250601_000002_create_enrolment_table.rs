//! Create `enrolment` mirror table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Enrolment::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Enrolment::Id).big_integer().not_null().primary_key())
                    .col(ColumnDef::new(Enrolment::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(Enrolment::Method).string_len(64).not_null())
                    .col(ColumnDef::new(Enrolment::Enabled).boolean().not_null().default(false))
                    .to_owned(),
            )
            .await?;

        // Index: (course_id, method) for the guest-access lookup
        manager
            .create_index(
                Index::create()
                    .name("idx_enrolment_course_method")
                    .table(Enrolment::Table)
                    .col(Enrolment::CourseId)
                    .col(Enrolment::Method)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Enrolment::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Enrolment {
    Table,
    Id,
    CourseId,
    Method,
    Enabled,
}
