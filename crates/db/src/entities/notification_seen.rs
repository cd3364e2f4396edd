//! Per-user dismissal tracking entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Records that a user has dismissed a notification.
///
/// Append-only; duplicates carry no uniqueness constraint because the
/// visibility check only cares about row existence.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification_seen")]
pub struct Model {
    /// Unique seen-row ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// ID of the dismissed notification.
    pub notification_id: String,

    /// Host LMS user that dismissed it.
    pub user_id: i64,

    /// When the user dismissed the notification.
    pub created_at: DateTime<Utc>,
}

/// Relationships.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::notification::Entity",
        from = "Column::NotificationId",
        to = "super::notification::Column::Id"
    )]
    Notification,
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notification.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
