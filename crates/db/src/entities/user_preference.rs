//! Per-user preference entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A small per-user key/value preference store.
///
/// Backs UI state such as the per-notification expansion flag
/// (`notification_{id}_expanded`). Upserted by (`user_id`, `key`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_preference")]
pub struct Model {
    /// Unique preference row ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Host LMS user the preference belongs to.
    pub user_id: i64,

    /// Preference key.
    pub key: String,

    /// Preference value.
    pub value: String,

    /// When the preference was last written.
    pub updated_at: DateTime<Utc>,
}

/// Relationships.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
