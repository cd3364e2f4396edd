//! Notification registry service.
//!
//! The single entry point for every registry operation: upsert-style
//! creation, lookup, soft delete and purge, per-user dismissal, and the
//! HTML rendering pipeline. Lifecycle events go out through the
//! [`EventPublisher`] trait.

use courseboard_common::{AppError, AppResult, IdGenerator, sesskey::issue_sesskey};
use courseboard_db::entities::notification;
use courseboard_db::repositories::{
    EnrolmentRepository, NotificationFilter, NotificationRepository, UserPreferenceRepository,
};

use crate::notice::{ListItem, Notice, NoticeKind, Payload};
use crate::render;
use crate::services::event_publisher::{EventPublisher, EventPublisherService};

/// Input for creating (or upserting) a notification.
#[derive(Debug, Clone)]
pub struct CreateNotificationInput {
    /// Subject object (course) id in the host LMS.
    pub object_id: i64,
    /// Host LMS context the notice is scoped to.
    pub context_id: i64,
    /// Variant payload; the kind and object table follow from it.
    pub payload: Payload,
}

/// Service for managing course notifications.
#[derive(Clone)]
pub struct NotificationService {
    notifications: NotificationRepository,
    enrolments: EnrolmentRepository,
    preferences: UserPreferenceRepository,
    events: EventPublisherService,
    id_gen: IdGenerator,
    lms_url: String,
    session_secret: String,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub fn new(
        notifications: NotificationRepository,
        enrolments: EnrolmentRepository,
        preferences: UserPreferenceRepository,
        events: EventPublisherService,
        lms_url: String,
        session_secret: String,
    ) -> Self {
        Self {
            notifications,
            enrolments,
            preferences,
            events,
            id_gen: IdGenerator::new(),
            lms_url,
            session_secret,
        }
    }

    /// Create a notification, upserting by the composite registry key.
    ///
    /// An existing row (soft-deleted or not) gets the new payload and
    /// its deleted flag cleared; only a genuinely fresh row fires the
    /// created event.
    pub async fn create(&self, input: CreateNotificationInput) -> AppResult<Notice> {
        input.payload.validate().map_err(AppError::Validation)?;

        let kind = input.payload.kind();
        let data = input
            .payload
            .encode()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let existing = self
            .notifications
            .find_by_key(kind.tag(), input.context_id, input.object_id, kind.object_table())
            .await?;

        if let Some(row) = existing {
            let updated = self.notifications.update_payload(row, data).await?;
            return Notice::from_model(&updated).map_err(|e| AppError::Internal(e.to_string()));
        }

        let inserted = self
            .notifications
            .insert(
                self.id_gen.generate(),
                kind.tag().to_string(),
                input.context_id,
                input.object_id,
                kind.object_table().to_string(),
                data,
            )
            .await?;

        self.events
            .publish_notice_created(
                &inserted.id,
                &inserted.kind,
                inserted.object_id,
                inserted.context_id,
            )
            .await?;

        Notice::from_model(&inserted).map_err(|e| AppError::Internal(e.to_string()))
    }

    /// Look up a notification by its composite key.
    ///
    /// Soft-deleted rows yield `None`; so do rows that no longer decode
    /// (stale kinds, malformed payloads), with a warning.
    pub async fn get(
        &self,
        kind: NoticeKind,
        object_id: i64,
        context_id: i64,
    ) -> AppResult<Option<Notice>> {
        let row = self
            .notifications
            .find_by_key(kind.tag(), context_id, object_id, kind.object_table())
            .await?;

        Ok(row.filter(|r| !r.deleted).as_ref().and_then(Self::decode_row))
    }

    /// Look up a notification by id, with the same decode rules as
    /// [`Self::get`] but without the deleted filter (dismissal and
    /// deletion act on the raw row).
    pub async fn get_by_id(&self, id: &str) -> AppResult<Option<Notice>> {
        let row = self.notifications.find_by_id(id).await?;
        Ok(row.as_ref().and_then(Self::decode_row))
    }

    /// Decoded, non-deleted notifications for a course.
    pub async fn list_for_course(&self, course_id: i64) -> AppResult<Vec<Notice>> {
        let rows = self.notifications.find_for_course(course_id).await?;
        Ok(rows.iter().filter_map(Self::decode_row).collect())
    }

    /// Count of non-deleted notifications for a course.
    pub async fn count_for_course(&self, course_id: i64) -> AppResult<u64> {
        self.notifications.count_for_course(course_id).await
    }

    /// Total advertised actions across a course's notifications.
    pub async fn count_actions(&self, course_id: i64) -> AppResult<u32> {
        let notices = self.list_for_course(course_id).await?;
        Ok(notices.iter().map(|n| n.payload.actions()).sum())
    }

    /// Raw registry rows for the admin listing.
    pub async fn list_all(
        &self,
        filter: &NotificationFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<notification::Model>> {
        self.notifications.find_all(filter, limit, offset).await
    }

    /// Total registry rows matching the admin filter.
    pub async fn count_all(&self, filter: &NotificationFilter) -> AppResult<u64> {
        self.notifications.count_all(filter).await
    }

    /// Soft-delete a notification and fire the deleted event.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let row = self.notifications.soft_delete(id).await?;

        self.events
            .publish_notice_deleted(&row.id, &row.kind, row.object_id, row.context_id)
            .await
    }

    /// Hard-delete a notification. Bypasses lifecycle events.
    pub async fn purge(&self, id: &str) -> AppResult<()> {
        self.notifications.purge(id).await
    }

    /// Course-deletion observer: hard-delete every notification the
    /// course owns, seen rows included.
    pub async fn purge_for_course(&self, course_id: i64) -> AppResult<u64> {
        let purged = self.notifications.purge_for_course(course_id).await?;
        if purged > 0 {
            tracing::info!(course_id, purged, "Purged notifications for deleted course");
        }
        Ok(purged)
    }

    /// Record that a user dismissed a notification and fire the seen
    /// event. Appends unconditionally; duplicates are harmless.
    pub async fn mark_seen(&self, id: &str, user_id: i64) -> AppResult<()> {
        let row = self
            .notifications
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotificationNotFound(id.to_string()))?;

        self.notifications
            .mark_seen(self.id_gen.generate(), row.id.clone(), user_id)
            .await?;

        self.events.publish_notice_seen(&row.id, user_id).await
    }

    /// Whether a notice is visible to a user. Non-dismissible notices
    /// are always visible; dismissible ones hide once a seen row exists.
    pub async fn is_visible(&self, notice: &Notice, user_id: i64) -> AppResult<bool> {
        if !notice.payload.is_dismissible() {
            return Ok(true);
        }

        Ok(!self.notifications.has_seen(&notice.id, user_id).await?)
    }

    /// Render a notice for a user.
    ///
    /// Invisible notices and notices whose content resolves to nothing
    /// produce the empty string, never an empty container.
    pub async fn render(&self, notice: &Notice, user_id: i64) -> AppResult<String> {
        if !self.is_visible(notice, user_id).await? {
            return Ok(String::new());
        }

        let (contents, actions) = self.resolve_contents(notice, user_id).await?;
        if contents.is_empty() {
            return Ok(String::new());
        }

        Ok(render::alert(
            notice.payload.level(),
            notice.payload.is_dismissible(),
            &actions,
            &contents,
        ))
    }

    /// Render every visible notice for a course, concatenated.
    pub async fn render_for_course(&self, course_id: i64, user_id: i64) -> AppResult<String> {
        let notices = self.list_for_course(course_id).await?;

        let mut out = String::new();
        for notice in &notices {
            let html = self.render(notice, user_id).await?;
            if !html.is_empty() {
                out.push_str(&html);
            }
        }

        Ok(out)
    }

    /// Persist the per-user expansion flag for a notice.
    pub async fn set_expanded(&self, user_id: i64, id: &str, value: bool) -> AppResult<()> {
        let key = expanded_key(id);
        let stored = if value { "1" } else { "0" };

        self.preferences
            .set(self.id_gen.generate(), user_id, key, stored.to_string())
            .await?;

        Ok(())
    }

    /// Whether the user last left a notice's item list expanded.
    pub async fn is_expanded(&self, user_id: i64, id: &str) -> AppResult<bool> {
        let value = self.preferences.get(user_id, &expanded_key(id)).await?;
        Ok(value.is_some_and(|v| v == "1"))
    }

    /// The acting user's forgery token.
    #[must_use]
    pub fn sesskey(&self, user_id: i64) -> String {
        issue_sesskey(&self.session_secret, user_id)
    }

    /// Check a presented forgery token.
    #[must_use]
    pub fn verify_sesskey(&self, user_id: i64, presented: &str) -> bool {
        courseboard_common::verify_sesskey(&self.session_secret, user_id, presented)
    }

    fn decode_row(model: &notification::Model) -> Option<Notice> {
        match Notice::from_model(model) {
            Ok(notice) => Some(notice),
            Err(e) => {
                tracing::warn!(
                    notification_id = %model.id,
                    kind = %model.kind,
                    error = %e,
                    "Skipping undecodable notification"
                );
                None
            }
        }
    }

    /// Resolve variant content and the action controls that go with it.
    async fn resolve_contents(
        &self,
        notice: &Notice,
        user_id: i64,
    ) -> AppResult<(String, String)> {
        let mut actions = String::new();
        if notice.payload.is_dismissible() {
            actions.push_str(&render::dismiss_button(&notice.id));
        }

        let contents = match &notice.payload {
            Payload::Arbitrary(p) => p.message.clone(),

            Payload::ManualGuest => {
                match self.enrolments.find_active_guest(notice.object_id).await? {
                    // Guest access off: nothing to warn about
                    None => String::new(),
                    Some(instance) => {
                        let href = self.disable_guest_url(notice.object_id, instance.id, user_id)?;
                        format!(
                            "You have guest access enabled. {}",
                            render::alert_link(&href, "Disable guest access.")
                        )
                    }
                }
            }

            Payload::SimpleList(p) => {
                if p.heading.trim().is_empty() {
                    String::new()
                } else if p.items.is_empty() {
                    p.heading.clone()
                } else {
                    let expanded = self.is_expanded(user_id, &notice.id).await?;
                    let rendered: Vec<String> = p.items.iter().map(render_item).collect();
                    actions.push_str(&render::expand_toggle(&notice.id));
                    format!(
                        "{}{}",
                        p.heading,
                        render::collapse_container(
                            &notice.id,
                            &render::item_list(&rendered),
                            expanded,
                        )
                    )
                }
            }
        };

        Ok((contents, actions))
    }

    fn disable_guest_url(
        &self,
        course_id: i64,
        instance_id: i64,
        user_id: i64,
    ) -> AppResult<String> {
        let mut url =
            url::Url::parse(&self.lms_url).map_err(|e| AppError::Config(e.to_string()))?;
        url.set_path("/enrol/instances.php");
        url.query_pairs_mut()
            .append_pair("sesskey", &issue_sesskey(&self.session_secret, user_id))
            .append_pair("id", &course_id.to_string())
            .append_pair("action", "disable")
            .append_pair("instance", &instance_id.to_string());

        Ok(url.into())
    }
}

fn expanded_key(id: &str) -> String {
    format!("notification_{id}_expanded")
}

fn render_item(item: &ListItem) -> String {
    match &item.url {
        Some(url) => render::alert_link(url, &item.text),
        None => item.text.clone(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notice::{ArbitraryPayload, Level, SimpleListPayload};
    use crate::services::event_publisher::NoOpEventPublisher;
    use async_trait::async_trait;
    use chrono::Utc;
    use courseboard_common::AppResult;
    use courseboard_db::entities::{enrolment, notification, notification_seen, user_preference};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingPublisher {
        created: AtomicUsize,
        seen: AtomicUsize,
        deleted: AtomicUsize,
    }

    #[async_trait]
    impl EventPublisher for CountingPublisher {
        async fn publish_notice_created(
            &self,
            _id: &str,
            _kind: &str,
            _object_id: i64,
            _context_id: i64,
        ) -> AppResult<()> {
            self.created.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn publish_notice_seen(&self, _id: &str, _user_id: i64) -> AppResult<()> {
            self.seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn publish_notice_deleted(
            &self,
            _id: &str,
            _kind: &str,
            _object_id: i64,
            _context_id: i64,
        ) -> AppResult<()> {
            self.deleted.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn service_with(db: DatabaseConnection, events: EventPublisherService) -> NotificationService {
        let db = Arc::new(db);
        NotificationService::new(
            NotificationRepository::new(Arc::clone(&db)),
            EnrolmentRepository::new(Arc::clone(&db)),
            UserPreferenceRepository::new(db),
            events,
            "https://lms.example.edu".to_string(),
            "test-secret".to_string(),
        )
    }

    fn arbitrary_model(id: &str, course_id: i64, deleted: bool) -> notification::Model {
        notification::Model {
            id: id.to_string(),
            kind: "arbitrary".to_string(),
            context_id: 100 + course_id,
            object_id: course_id,
            object_table: "course".to_string(),
            data: json!({
                "level": "warning",
                "message": "Course ending soon",
                "dismissable": true,
                "actions": 0
            }),
            deleted,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn arbitrary_input(course_id: i64) -> CreateNotificationInput {
        CreateNotificationInput {
            object_id: course_id,
            context_id: 100 + course_id,
            payload: Payload::Arbitrary(ArbitraryPayload {
                level: Level::Warning,
                message: "Course ending soon".to_string(),
                dismissable: true,
                actions: 0,
            }),
        }
    }

    fn arbitrary_notice(id: &str, course_id: i64) -> Notice {
        Notice::from_model(&arbitrary_model(id, course_id, false)).unwrap()
    }

    #[tokio::test]
    async fn test_create_inserts_and_publishes_created() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // Key lookup finds nothing
            .append_query_results([Vec::<notification::Model>::new()])
            // Insert returns the fresh row
            .append_query_results([[arbitrary_model("n1", 42, false)]])
            .into_connection();

        let events = Arc::new(CountingPublisher::default());
        let service = service_with(db, Arc::clone(&events) as EventPublisherService);

        let notice = service.create(arbitrary_input(42)).await.unwrap();

        assert_eq!(notice.kind, NoticeKind::Arbitrary);
        assert_eq!(notice.object_id, 42);
        assert_eq!(events.created.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_create_upserts_and_clears_deleted_flag() {
        let existing = arbitrary_model("n1", 42, true);
        let mut updated = existing.clone();
        updated.deleted = false;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing]])
            .append_query_results([[updated]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let events = Arc::new(CountingPublisher::default());
        let service = service_with(db, Arc::clone(&events) as EventPublisherService);

        let notice = service.create(arbitrary_input(42)).await.unwrap();

        assert!(!notice.deleted);
        assert_eq!(notice.id, "n1");
        // Updates never re-fire the created event
        assert_eq!(events.created.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_payload() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_with(db, Arc::new(NoOpEventPublisher));

        let input = CreateNotificationInput {
            object_id: 42,
            context_id: 142,
            payload: Payload::Arbitrary(ArbitraryPayload {
                level: Level::Warning,
                message: String::new(),
                dismissable: true,
                actions: 0,
            }),
        };

        let err = service.create(input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_hides_soft_deleted_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[arbitrary_model("n1", 42, true)]])
            .into_connection();

        let service = service_with(db, Arc::new(NoOpEventPublisher));
        let result = service.get(NoticeKind::Arbitrary, 42, 142).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_get_skips_unknown_kind_with_warning() {
        let mut stale = arbitrary_model("n1", 42, false);
        stale.kind = "rollover_status".to_string();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[stale]])
            .into_connection();

        let service = service_with(db, Arc::new(NoOpEventPublisher));
        let result = service.get(NoticeKind::Arbitrary, 42, 142).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_is_visible_before_and_after_seen() {
        let notice = arbitrary_notice("n1", 42);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // First check: no seen row
            .append_query_results([Vec::<notification_seen::Model>::new()])
            // Second check: seen row exists
            .append_query_results([[notification_seen::Model {
                id: "s1".to_string(),
                notification_id: "n1".to_string(),
                user_id: 7,
                created_at: Utc::now(),
            }]])
            .into_connection();

        let service = service_with(db, Arc::new(NoOpEventPublisher));

        assert!(service.is_visible(&notice, 7).await.unwrap());
        assert!(!service.is_visible(&notice, 7).await.unwrap());
    }

    #[tokio::test]
    async fn test_non_dismissible_always_visible() {
        let notice = Notice {
            id: "n1".to_string(),
            kind: NoticeKind::SimpleList,
            context_id: 142,
            object_id: 42,
            deleted: false,
            payload: Payload::SimpleList(SimpleListPayload {
                heading: "Pending".to_string(),
                items: vec![],
            }),
        };

        // No query results appended: the seen check must not run
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_with(db, Arc::new(NoOpEventPublisher));

        assert!(service.is_visible(&notice, 7).await.unwrap());
    }

    #[tokio::test]
    async fn test_render_warning_scenario() {
        let notice = arbitrary_notice("n1", 42);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<notification_seen::Model>::new()])
            .into_connection();

        let service = service_with(db, Arc::new(NoOpEventPublisher));
        let html = service.render(&notice, 7).await.unwrap();

        assert!(html.contains("alert-warning"));
        assert!(html.contains("cnid-dismiss"));
        assert!(html.contains("fa-exclamation-triangle"));
        assert!(html.contains("Course ending soon"));
    }

    #[tokio::test]
    async fn test_render_dismissed_notice_is_empty() {
        let notice = arbitrary_notice("n1", 42);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[notification_seen::Model {
                id: "s1".to_string(),
                notification_id: "n1".to_string(),
                user_id: 7,
                created_at: Utc::now(),
            }]])
            .into_connection();

        let service = service_with(db, Arc::new(NoOpEventPublisher));
        let html = service.render(&notice, 7).await.unwrap();

        assert!(html.is_empty());
    }

    #[tokio::test]
    async fn test_render_manualguest_suppressed_without_guest_access() {
        let notice = Notice {
            id: "n1".to_string(),
            kind: NoticeKind::ManualGuest,
            context_id: 142,
            object_id: 42,
            deleted: false,
            payload: Payload::ManualGuest,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // Visibility: not seen
            .append_query_results([Vec::<notification_seen::Model>::new()])
            // No active guest enrolment
            .append_query_results([Vec::<enrolment::Model>::new()])
            .into_connection();

        let service = service_with(db, Arc::new(NoOpEventPublisher));
        let html = service.render(&notice, 7).await.unwrap();

        // Empty output, not an empty container
        assert!(html.is_empty());
    }

    #[tokio::test]
    async fn test_render_manualguest_with_disable_link() {
        let notice = Notice {
            id: "n1".to_string(),
            kind: NoticeKind::ManualGuest,
            context_id: 142,
            object_id: 42,
            deleted: false,
            payload: Payload::ManualGuest,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<notification_seen::Model>::new()])
            .append_query_results([[enrolment::Model {
                id: 9,
                course_id: 42,
                method: "guest".to_string(),
                enabled: true,
            }]])
            .into_connection();

        let service = service_with(db, Arc::new(NoOpEventPublisher));
        let html = service.render(&notice, 7).await.unwrap();

        assert!(html.contains("alert-warning"));
        assert!(html.contains("You have guest access enabled."));
        assert!(html.contains("Disable guest access."));
        assert!(html.contains("/enrol/instances.php"));
        assert!(html.contains("sesskey="));
        assert!(html.contains("instance=9"));
    }

    #[tokio::test]
    async fn test_render_simplelist_with_items() {
        let notice = Notice {
            id: "n1".to_string(),
            kind: NoticeKind::SimpleList,
            context_id: 142,
            object_id: 42,
            deleted: false,
            payload: Payload::SimpleList(SimpleListPayload {
                heading: "Pending tasks".to_string(),
                items: vec![
                    ListItem {
                        key: "a".to_string(),
                        text: "first".to_string(),
                        url: None,
                    },
                    ListItem {
                        key: "b".to_string(),
                        text: "second".to_string(),
                        url: Some("https://lms.example.edu/task/2".to_string()),
                    },
                ],
            }),
        };

        // Non-dismissible: no seen check; the only DB traffic is the
        // expansion preference lookup
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user_preference::Model>::new()])
            .into_connection();
        let service = service_with(db, Arc::new(NoOpEventPublisher));
        let html = service.render(&notice, 7).await.unwrap();

        assert!(html.contains("alert-info"));
        assert!(html.contains("Pending tasks"));
        assert!(html.contains("<li>first</li>"));
        assert!(html.contains("https://lms.example.edu/task/2"));
        assert!(html.contains("fa-chevron-down"));
        assert!(html.contains("\"collapse alert-dropdown-container\""));
        assert!(!html.contains("cnid-dismiss"));
    }

    #[tokio::test]
    async fn test_render_simplelist_restores_expanded_preference() {
        let notice = Notice {
            id: "n1".to_string(),
            kind: NoticeKind::SimpleList,
            context_id: 142,
            object_id: 42,
            deleted: false,
            payload: Payload::SimpleList(SimpleListPayload {
                heading: "Pending tasks".to_string(),
                items: vec![ListItem {
                    key: "a".to_string(),
                    text: "first".to_string(),
                    url: None,
                }],
            }),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user_preference::Model {
                id: "p1".to_string(),
                user_id: 7,
                key: "notification_n1_expanded".to_string(),
                value: "1".to_string(),
                updated_at: Utc::now(),
            }]])
            .into_connection();

        let service = service_with(db, Arc::new(NoOpEventPublisher));
        let html = service.render(&notice, 7).await.unwrap();

        // The list opens the way the user last left it
        assert!(html.contains("\"collapse show alert-dropdown-container\""));
    }

    #[tokio::test]
    async fn test_mark_seen_publishes_event() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[arbitrary_model("n1", 42, false)]])
            .append_query_results([[notification_seen::Model {
                id: "s1".to_string(),
                notification_id: "n1".to_string(),
                user_id: 7,
                created_at: Utc::now(),
            }]])
            .into_connection();

        let events = Arc::new(CountingPublisher::default());
        let service = service_with(db, Arc::clone(&events) as EventPublisherService);

        service.mark_seen("n1", 7).await.unwrap();

        assert_eq!(events.seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_mark_seen_missing_notification() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<notification::Model>::new()])
            .into_connection();

        let service = service_with(db, Arc::new(NoOpEventPublisher));
        let err = service.mark_seen("gone", 7).await.unwrap_err();

        assert!(matches!(err, AppError::NotificationNotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_publishes_deleted_event() {
        let existing = arbitrary_model("n1", 42, false);
        let mut deleted = existing.clone();
        deleted.deleted = true;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing]])
            .append_query_results([[deleted]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let events = Arc::new(CountingPublisher::default());
        let service = service_with(db, Arc::clone(&events) as EventPublisherService);

        service.delete("n1").await.unwrap();

        assert_eq!(events.deleted.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_count_actions_sums_variants() {
        let mut with_actions = arbitrary_model("n1", 42, false);
        with_actions.data = json!({
            "level": "info",
            "message": "hi",
            "dismissable": false,
            "actions": 2
        });

        let mut list = arbitrary_model("n2", 42, false);
        list.kind = "simplelist".to_string();
        list.data = json!({
            "heading": "Pending",
            "items": [
                {"key": "a", "text": "x"},
                {"key": "b", "text": "y"},
                {"key": "c", "text": "z"}
            ]
        });

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[with_actions, list]])
            .into_connection();

        let service = service_with(db, Arc::new(NoOpEventPublisher));
        let total = service.count_actions(42).await.unwrap();

        assert_eq!(total, 5);
    }

    #[tokio::test]
    async fn test_list_for_course_skips_undecodable_rows() {
        let good = arbitrary_model("n1", 42, false);
        let mut stale = arbitrary_model("n2", 42, false);
        stale.kind = "rollover_status".to_string();
        let mut malformed = arbitrary_model("n3", 42, false);
        malformed.data = json!({"level": "warning"});

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[good, stale, malformed]])
            .into_connection();

        let service = service_with(db, Arc::new(NoOpEventPublisher));
        let notices = service.list_for_course(42).await.unwrap();

        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].id, "n1");
    }

    #[test]
    fn test_sesskey_round_trip() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_with(db, Arc::new(NoOpEventPublisher));

        let key = service.sesskey(7);
        assert!(service.verify_sesskey(7, &key));
        assert!(!service.verify_sesskey(8, &key));
    }
}
