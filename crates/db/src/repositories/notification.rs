//! Notification registry repository.

use std::sync::Arc;

use chrono::Utc;
use courseboard_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::{Notification, NotificationSeen, notification, notification_seen};

/// Optional filters for the admin listing.
#[derive(Debug, Clone, Default)]
pub struct NotificationFilter {
    /// Restrict to a single variant kind.
    pub kind: Option<String>,
    /// Restrict to a single subject object (course) id.
    pub object_id: Option<i64>,
}

/// Repository for notification registry operations.
#[derive(Clone)]
pub struct NotificationRepository {
    db: Arc<DatabaseConnection>,
}

impl NotificationRepository {
    /// Create a new notification repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find notification by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<notification::Model>> {
        Notification::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a notification by its composite key, including soft-deleted rows.
    ///
    /// Upserts need the soft-deleted row back so the create path can
    /// resurrect it instead of inserting a duplicate.
    pub async fn find_by_key(
        &self,
        kind: &str,
        context_id: i64,
        object_id: i64,
        object_table: &str,
    ) -> AppResult<Option<notification::Model>> {
        Notification::find()
            .filter(notification::Column::Kind.eq(kind))
            .filter(notification::Column::ContextId.eq(context_id))
            .filter(notification::Column::ObjectId.eq(object_id))
            .filter(notification::Column::ObjectTable.eq(object_table))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find all non-deleted notifications for a course.
    pub async fn find_for_course(&self, course_id: i64) -> AppResult<Vec<notification::Model>> {
        Notification::find()
            .filter(notification::Column::ObjectId.eq(course_id))
            .filter(notification::Column::ObjectTable.eq("course"))
            .filter(notification::Column::Deleted.eq(false))
            .order_by(notification::Column::CreatedAt, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count non-deleted notifications for a course.
    pub async fn count_for_course(&self, course_id: i64) -> AppResult<u64> {
        Notification::find()
            .filter(notification::Column::ObjectId.eq(course_id))
            .filter(notification::Column::ObjectTable.eq("course"))
            .filter(notification::Column::Deleted.eq(false))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find all course notifications matching the filter (for admin).
    ///
    /// Includes soft-deleted rows so the admin listing shows the full
    /// registry state.
    pub async fn find_all(
        &self,
        filter: &NotificationFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<notification::Model>> {
        self.filtered(filter)
            .order_by(notification::Column::CreatedAt, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all course notifications matching the filter.
    pub async fn count_all(&self, filter: &NotificationFilter) -> AppResult<u64> {
        self.filtered(filter)
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn filtered(&self, filter: &NotificationFilter) -> sea_orm::Select<Notification> {
        let mut query =
            Notification::find().filter(notification::Column::ObjectTable.eq("course"));

        if let Some(ref kind) = filter.kind {
            query = query.filter(notification::Column::Kind.eq(kind.as_str()));
        }
        if let Some(object_id) = filter.object_id {
            query = query.filter(notification::Column::ObjectId.eq(object_id));
        }

        query
    }

    /// Insert a fresh notification row.
    pub async fn insert(
        &self,
        id: String,
        kind: String,
        context_id: i64,
        object_id: i64,
        object_table: String,
        data: serde_json::Value,
    ) -> AppResult<notification::Model> {
        let active_model = notification::ActiveModel {
            id: Set(id),
            kind: Set(kind),
            context_id: Set(context_id),
            object_id: Set(object_id),
            object_table: Set(object_table),
            data: Set(data),
            deleted: Set(false),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        active_model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Replace an existing row's payload and clear its soft-delete flag.
    pub async fn update_payload(
        &self,
        existing: notification::Model,
        data: serde_json::Value,
    ) -> AppResult<notification::Model> {
        let mut active: notification::ActiveModel = existing.into();
        active.data = Set(data);
        active.deleted = Set(false);
        active.updated_at = Set(Some(Utc::now()));

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Flip the soft-delete flag on a notification.
    pub async fn soft_delete(&self, id: &str) -> AppResult<notification::Model> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotificationNotFound(id.to_string()))?;

        let mut active: notification::ActiveModel = existing.into();
        active.deleted = Set(true);

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Hard-delete a notification and its seen rows.
    pub async fn purge(&self, id: &str) -> AppResult<()> {
        // Seen rows go first
        NotificationSeen::delete_many()
            .filter(notification_seen::Column::NotificationId.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Notification::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Hard-delete every notification for a course, seen rows included.
    ///
    /// Unlike [`Self::find_for_course`] this also takes soft-deleted
    /// rows with it; once the course is gone nothing should linger.
    pub async fn purge_for_course(&self, course_id: i64) -> AppResult<u64> {
        let ids: Vec<String> = Notification::find()
            .filter(notification::Column::ObjectId.eq(course_id))
            .filter(notification::Column::ObjectTable.eq("course"))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .into_iter()
            .map(|n| n.id)
            .collect();

        if ids.is_empty() {
            return Ok(0);
        }

        NotificationSeen::delete_many()
            .filter(notification_seen::Column::NotificationId.is_in(ids.clone()))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let result = Notification::delete_many()
            .filter(notification::Column::Id.is_in(ids))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Check whether a user has dismissed a notification.
    pub async fn has_seen(&self, notification_id: &str, user_id: i64) -> AppResult<bool> {
        let seen = NotificationSeen::find()
            .filter(notification_seen::Column::NotificationId.eq(notification_id))
            .filter(notification_seen::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(seen.is_some())
    }

    /// Append a seen row for a user.
    ///
    /// No existence check: the visibility check only cares that at least
    /// one row exists, so duplicates are harmless.
    pub async fn mark_seen(
        &self,
        id: String,
        notification_id: String,
        user_id: i64,
    ) -> AppResult<notification_seen::Model> {
        let active_model = notification_seen::ActiveModel {
            id: Set(id),
            notification_id: Set(notification_id),
            user_id: Set(user_id),
            created_at: Set(Utc::now()),
        };

        active_model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
