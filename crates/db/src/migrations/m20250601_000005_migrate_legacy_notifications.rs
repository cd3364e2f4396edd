//! One-time import of the legacy `course_notifications` tables.
//!
//! The earlier schema generation tagged rows with a free-form `extref`
//! instead of a variant kind. Rows are reclassified into discriminator
//! kinds and copied into `notification`; legacy seen rows are not
//! migrated (the original upgrade cleared them too), and the legacy
//! tables are dropped afterwards.

use courseboard_common::IdGenerator;
use sea_orm::Statement;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Map a legacy external-reference tag onto a variant kind.
///
/// Unrecognized tags pass through lowercased; the registry treats
/// unknown kinds as "no notification" at decode time, which matches how
/// stale classnames behaved in the old system.
pub(crate) fn kind_for_extref(extref: &str) -> String {
    match extref.trim().to_lowercase().as_str() {
        "arbitrary" | "message" => "arbitrary".to_string(),
        "guest" | "manualguest" => "manualguest".to_string(),
        other => other.to_string(),
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if !manager.has_table("course_notifications").await? {
            return Ok(());
        }

        let conn = manager.get_connection();
        let backend = manager.get_database_backend();
        let id_gen = IdGenerator::new();

        let rows = conn
            .query_all(Statement::from_string(
                backend,
                "SELECT contextid, objectid, extref, data FROM course_notifications".to_owned(),
            ))
            .await?;

        for row in rows {
            let context_id: i64 = row.try_get("", "contextid")?;
            let object_id: i64 = row.try_get("", "objectid")?;
            let extref: String = row.try_get("", "extref")?;
            let data: Option<String> = row.try_get("", "data")?;

            // Legacy payloads that are not valid JSON are carried over as
            // a bare string; payload validation flags them at decode time.
            let raw = data.unwrap_or_default();
            let payload: serde_json::Value = serde_json::from_str(&raw)
                .unwrap_or(serde_json::Value::String(raw));

            conn.execute(Statement::from_sql_and_values(
                backend,
                "INSERT INTO notification \
                 (id, kind, context_id, object_id, object_table, data, deleted) \
                 VALUES ($1, $2, $3, $4, 'course', $5, false) \
                 ON CONFLICT DO NOTHING",
                [
                    id_gen.generate().into(),
                    kind_for_extref(&extref).into(),
                    context_id.into(),
                    object_id.into(),
                    payload.into(),
                ],
            ))
            .await?;
        }

        conn.execute_unprepared("DROP TABLE IF EXISTS course_notifications_seen")
            .await?;
        conn.execute_unprepared("DROP TABLE IF EXISTS course_notifications")
            .await?;

        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        // The legacy tables are gone; nothing sensible to restore.
        Ok(())
    }
}
