//! Create `user_preference` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserPreference::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserPreference::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(UserPreference::UserId).big_integer().not_null())
                    .col(ColumnDef::new(UserPreference::Key).string_len(255).not_null())
                    .col(ColumnDef::new(UserPreference::Value).text().not_null())
                    .col(
                        ColumnDef::new(UserPreference::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (user_id, key) - preferences upsert in place
        manager
            .create_index(
                Index::create()
                    .name("idx_user_preference_unique")
                    .table(UserPreference::Table)
                    .col(UserPreference::UserId)
                    .col(UserPreference::Key)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserPreference::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserPreference {
    Table,
    Id,
    UserId,
    Key,
    Value,
    UpdatedAt,
}
