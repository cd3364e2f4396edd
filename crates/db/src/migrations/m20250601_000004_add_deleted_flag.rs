//! Add the soft-delete flag to `notification`.
//!
//! Second schema generation: rows are now soft-deleted before purge, so
//! the unique registry key must admit one soft-deleted duplicate. The
//! strict key is dropped and re-created including the flag.

use sea_orm_migration::prelude::*;

use super::m20250601_000001_create_notification_tables::Notification;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Notification::Table)
                    .add_column(
                        ColumnDef::new(Deleted::Deleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_notification_key")
                    .table(Notification::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notification_key")
                    .table(Notification::Table)
                    .col(Notification::Kind)
                    .col(Notification::ContextId)
                    .col(Notification::ObjectId)
                    .col(Notification::ObjectTable)
                    .col(Deleted::Deleted)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_notification_key")
                    .table(Notification::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notification_key")
                    .table(Notification::Table)
                    .col(Notification::Kind)
                    .col(Notification::ContextId)
                    .col(Notification::ObjectId)
                    .col(Notification::ObjectTable)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Notification::Table)
                    .drop_column(Deleted::Deleted)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Deleted {
    Deleted,
}
