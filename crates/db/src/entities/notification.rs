//! Notification registry entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One persisted notice attached to a course (or other host object).
///
/// The `kind` column is the variant discriminator; `data` holds the
/// variant-specific payload as JSON. Rows are soft-deleted via the
/// `deleted` flag and only physically removed on purge.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification")]
pub struct Model {
    /// Unique notification ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Variant discriminator (e.g. "arbitrary", "manualguest").
    pub kind: String,

    /// Host LMS context the notice is scoped to.
    pub context_id: i64,

    /// ID of the subject object in the host LMS.
    pub object_id: i64,

    /// Table the subject object lives in (e.g. "course").
    pub object_table: String,

    /// Variant-specific payload.
    #[sea_orm(column_type = "JsonBinary")]
    pub data: Json,

    /// Soft-delete flag.
    pub deleted: bool,

    /// When the notification was created.
    pub created_at: DateTime<Utc>,

    /// When the payload was last updated in place.
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Relationships.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::notification_seen::Entity")]
    SeenRows,
}

impl Related<super::notification_seen::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SeenRows.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
