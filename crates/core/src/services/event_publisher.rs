//! Event publisher service.
//!
//! The registry fires lifecycle events (created, seen, deleted) so the
//! host platform can audit and observe them. The trait keeps the core
//! service independent of any particular transport.

use async_trait::async_trait;
use courseboard_common::AppResult;
use std::sync::Arc;

/// Trait for publishing notification lifecycle events.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// A notification row was freshly inserted.
    async fn publish_notice_created(
        &self,
        id: &str,
        kind: &str,
        object_id: i64,
        context_id: i64,
    ) -> AppResult<()>;

    /// A user dismissed a notification.
    async fn publish_notice_seen(&self, id: &str, user_id: i64) -> AppResult<()>;

    /// A notification was soft-deleted.
    async fn publish_notice_deleted(
        &self,
        id: &str,
        kind: &str,
        object_id: i64,
        context_id: i64,
    ) -> AppResult<()>;
}

/// A no-op implementation of [`EventPublisher`] for tests.
#[derive(Clone, Default)]
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish_notice_created(
        &self,
        _id: &str,
        _kind: &str,
        _object_id: i64,
        _context_id: i64,
    ) -> AppResult<()> {
        Ok(())
    }

    async fn publish_notice_seen(&self, _id: &str, _user_id: i64) -> AppResult<()> {
        Ok(())
    }

    async fn publish_notice_deleted(
        &self,
        _id: &str,
        _kind: &str,
        _object_id: i64,
        _context_id: i64,
    ) -> AppResult<()> {
        Ok(())
    }
}

/// Publishes lifecycle events as structured log records.
///
/// The audit channel here is the host's log pipeline; swapping in a bus
/// transport later only means another impl of the trait.
#[derive(Clone, Default)]
pub struct TracingEventPublisher;

#[async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish_notice_created(
        &self,
        id: &str,
        kind: &str,
        object_id: i64,
        context_id: i64,
    ) -> AppResult<()> {
        tracing::info!(
            event = "notification_created",
            notification_id = %id,
            kind = %kind,
            course_id = object_id,
            context_id = context_id,
        );
        Ok(())
    }

    async fn publish_notice_seen(&self, id: &str, user_id: i64) -> AppResult<()> {
        tracing::info!(
            event = "notification_seen",
            notification_id = %id,
            related_user_id = user_id,
        );
        Ok(())
    }

    async fn publish_notice_deleted(
        &self,
        id: &str,
        kind: &str,
        object_id: i64,
        context_id: i64,
    ) -> AppResult<()> {
        tracing::info!(
            event = "notification_deleted",
            notification_id = %id,
            kind = %kind,
            course_id = object_id,
            context_id = context_id,
        );
        Ok(())
    }
}

/// Wrapper for boxed [`EventPublisher`] trait object.
pub type EventPublisherService = Arc<dyn EventPublisher>;
