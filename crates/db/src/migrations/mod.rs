//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250601_000001_create_notification_tables;
mod m20250601_000002_create_enrolment_table;
mod m20250601_000003_create_user_preference_table;
mod m20250601_000004_add_deleted_flag;
mod m20250601_000005_migrate_legacy_notifications;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_notification_tables::Migration),
            Box::new(m20250601_000002_create_enrolment_table::Migration),
            Box::new(m20250601_000003_create_user_preference_table::Migration),
            Box::new(m20250601_000004_add_deleted_flag::Migration),
            Box::new(m20250601_000005_migrate_legacy_notifications::Migration),
        ]
    }
}
