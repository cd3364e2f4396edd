//! User preference repository.

use std::sync::Arc;

use chrono::Utc;
use courseboard_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::entities::{UserPreference, user_preference};

/// Repository for per-user key/value preferences.
#[derive(Clone)]
pub struct UserPreferenceRepository {
    db: Arc<DatabaseConnection>,
}

impl UserPreferenceRepository {
    /// Create a new user preference repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Get a preference value.
    pub async fn get(&self, user_id: i64, key: &str) -> AppResult<Option<String>> {
        let row = UserPreference::find()
            .filter(user_preference::Column::UserId.eq(user_id))
            .filter(user_preference::Column::Key.eq(key))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.map(|r| r.value))
    }

    /// Set a preference, upserting by (`user_id`, `key`).
    pub async fn set(
        &self,
        id: String,
        user_id: i64,
        key: String,
        value: String,
    ) -> AppResult<user_preference::Model> {
        let existing = UserPreference::find()
            .filter(user_preference::Column::UserId.eq(user_id))
            .filter(user_preference::Column::Key.eq(key.as_str()))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if let Some(row) = existing {
            let mut active: user_preference::ActiveModel = row.into();
            active.value = Set(value);
            active.updated_at = Set(Utc::now());

            return active
                .update(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()));
        }

        let active_model = user_preference::ActiveModel {
            id: Set(id),
            user_id: Set(user_id),
            key: Set(key),
            value: Set(value),
            updated_at: Set(Utc::now()),
        };

        active_model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn preference(user_id: i64, key: &str, value: &str) -> user_preference::Model {
        user_preference::Model {
            id: "p1".to_string(),
            user_id,
            key: key.to_string(),
            value: value.to_string(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_get_returns_value() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[preference(7, "notification_n1_expanded", "1")]])
                .into_connection(),
        );

        let repo = UserPreferenceRepository::new(db);
        let value = repo.get(7, "notification_n1_expanded").await.unwrap();

        assert_eq!(value.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user_preference::Model>::new()])
                .into_connection(),
        );

        let repo = UserPreferenceRepository::new(db);
        let value = repo.get(7, "notification_n1_expanded").await.unwrap();

        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_set_updates_existing_row() {
        let existing = preference(7, "notification_n1_expanded", "0");
        let mut updated = existing.clone();
        updated.value = "1".to_string();

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .append_query_results([[updated]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = UserPreferenceRepository::new(db);
        let row = repo
            .set(
                "p2".to_string(),
                7,
                "notification_n1_expanded".to_string(),
                "1".to_string(),
            )
            .await
            .unwrap();

        assert_eq!(row.value, "1");
        // The existing row is reused, not replaced
        assert_eq!(row.id, "p1");
    }
}
