//! Enrolment method mirror entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A host-synced mirror of the LMS enrolment methods.
///
/// The `manualguest` variant consults this to decide whether guest
/// self-enrolment is active for a course. Rows are owned by the host;
/// courseboard only reads them.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enrolment")]
pub struct Model {
    /// Host LMS enrolment instance ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,

    /// Course the enrolment method belongs to.
    pub course_id: i64,

    /// Enrolment method name (e.g. "guest", "manual").
    pub method: String,

    /// Whether the method is currently enabled.
    pub enabled: bool,
}

/// Relationships.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
