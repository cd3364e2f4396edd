//! Create `notification` and `notification_seen` tables migration.
//!
//! First schema generation: the composite key is strictly unique and
//! there is no soft-delete flag yet; a later migration adds both.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create notification table
        manager
            .create_table(
                Table::create()
                    .table(Notification::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Notification::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Notification::Kind).string_len(64).not_null())
                    .col(ColumnDef::new(Notification::ContextId).big_integer().not_null())
                    .col(ColumnDef::new(Notification::ObjectId).big_integer().not_null())
                    .col(ColumnDef::new(Notification::ObjectTable).string_len(64).not_null())
                    .col(ColumnDef::new(Notification::Data).json_binary().not_null())
                    .col(
                        ColumnDef::new(Notification::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Notification::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Unique index: the composite registry key
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

        // Index: (object_id, object_table) for course listings
        manager
            .create_index(
                Index::create()
                    .name("idx_notification_object")
                    .table(Notification::Table)
                    .col(Notification::ObjectId)
                    .col(Notification::ObjectTable)
                    .to_owned(),
            )
            .await?;

        // Create notification_seen table
        manager
            .create_table(
                Table::create()
                    .table(NotificationSeen::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(NotificationSeen::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(NotificationSeen::NotificationId).string_len(32).not_null())
                    .col(ColumnDef::new(NotificationSeen::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(NotificationSeen::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_seen_notification")
                            .from(NotificationSeen::Table, NotificationSeen::NotificationId)
                            .to(Notification::Table, Notification::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Deliberately NOT unique: the visibility check only tests row
        // existence, so duplicate seen rows are tolerated.
        manager
            .create_index(
                Index::create()
                    .name("idx_notification_seen_lookup")
                    .table(NotificationSeen::Table)
                    .col(NotificationSeen::NotificationId)
                    .col(NotificationSeen::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NotificationSeen::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notification::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Notification {
    Table,
    Id,
    Kind,
    ContextId,
    ObjectId,
    ObjectTable,
    Data,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum NotificationSeen {
    Table,
    Id,
    NotificationId,
    UserId,
    CreatedAt,
}
