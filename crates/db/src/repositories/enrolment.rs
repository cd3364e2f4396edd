//! Enrolment mirror repository.

use std::sync::Arc;

use courseboard_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::entities::{Enrolment, enrolment};

/// Read-only access to the host-synced enrolment mirror.
#[derive(Clone)]
pub struct EnrolmentRepository {
    db: Arc<DatabaseConnection>,
}

impl EnrolmentRepository {
    /// Create a new enrolment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the active guest enrolment instance for a course, if any.
    pub async fn find_active_guest(&self, course_id: i64) -> AppResult<Option<enrolment::Model>> {
        Enrolment::find()
            .filter(enrolment::Column::CourseId.eq(course_id))
            .filter(enrolment::Column::Method.eq("guest"))
            .filter(enrolment::Column::Enabled.eq(true))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
