//! Notification endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post},
};
use chrono::{DateTime, Utc};
use courseboard_common::{AppError, AppResult};
use courseboard_core::{
    CreateNotificationInput, Level, Notice, Payload,
    notice::ArbitraryPayload,
};
use courseboard_db::repositories::NotificationFilter;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::{extractors::CurrentUser, middleware::AppState, response::ApiResponse};

/// Create notification router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/", post(create_notification))
        .route("/sesskey", get(get_sesskey))
        .route("/{id}", delete(delete_notification))
        .route("/{id}/dismiss", post(dismiss_notification))
        .route("/{id}/expanded", post(set_expanded))
        .route("/courses/{course_id}", get(list_for_course))
        .route("/courses/{course_id}", delete(purge_for_course))
        .route("/courses/{course_id}/render", get(render_for_course))
}

/// Raw registry row, as the admin listing sees it.
#[derive(Debug, Serialize)]
pub struct NotificationRow {
    pub id: String,
    pub kind: String,
    pub course_id: i64,
    pub context_id: i64,
    pub data: serde_json::Value,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<courseboard_db::entities::notification::Model> for NotificationRow {
    fn from(model: courseboard_db::entities::notification::Model) -> Self {
        Self {
            id: model.id,
            kind: model.kind,
            course_id: model.object_id,
            context_id: model.context_id,
            data: model.data,
            deleted: model.deleted,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Admin listing response.
#[derive(Debug, Serialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<NotificationRow>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Admin listing query.
#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    pub kind: Option<String>,
    pub course_id: Option<i64>,
}

const fn default_page() -> u64 {
    1
}

const fn default_per_page() -> u64 {
    25
}

const MAX_PER_PAGE: u64 = 100;

/// Normalize client-supplied paging into (page, `per_page`, offset).
/// Query params are attacker-adjacent, so the math must not overflow.
const fn page_window(page: u64, per_page: u64) -> (u64, u64, u64) {
    let page = if page == 0 { 1 } else { page };
    let per_page = if per_page == 0 {
        1
    } else if per_page > MAX_PER_PAGE {
        MAX_PER_PAGE
    } else {
        per_page
    };
    let offset = (page - 1).saturating_mul(per_page);
    (page, per_page, offset)
}

/// List registry rows (admin only). Soft-deleted rows are included so
/// the listing shows the full registry state.
async fn list_notifications(
    user: CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<ListNotificationsQuery>,
) -> AppResult<ApiResponse<NotificationListResponse>> {
    require_admin(user)?;

    let filter = NotificationFilter {
        kind: query.kind,
        object_id: query.course_id,
    };
    let (page, per_page, offset) = page_window(query.page, query.per_page);

    let rows = state
        .notification_service
        .list_all(&filter, per_page, offset)
        .await?;
    let total = state.notification_service.count_all(&filter).await?;

    Ok(ApiResponse::ok(NotificationListResponse {
        notifications: rows.into_iter().map(NotificationRow::from).collect(),
        total,
        page,
        per_page,
    }))
}

/// Create notification request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateNotificationRequest {
    pub course_id: i64,
    pub context_id: i64,
    pub level: Level,
    #[validate(length(min = 1, message = "message must not be empty"))]
    pub message: String,
    #[serde(default = "default_true")]
    pub dismissable: bool,
    #[serde(default)]
    pub actions: u32,
    pub sesskey: String,
}

const fn default_true() -> bool {
    true
}

/// Decoded notice, as course listings see it.
#[derive(Debug, Serialize)]
pub struct NoticeResponse {
    pub id: String,
    pub kind: String,
    pub course_id: i64,
    pub context_id: i64,
    pub level: Level,
    pub dismissible: bool,
    pub actions: u32,
}

impl From<&Notice> for NoticeResponse {
    fn from(notice: &Notice) -> Self {
        Self {
            id: notice.id.clone(),
            kind: notice.kind.tag().to_string(),
            course_id: notice.object_id,
            context_id: notice.context_id,
            level: notice.payload.level(),
            dismissible: notice.payload.is_dismissible(),
            actions: notice.payload.actions(),
        }
    }
}

/// Create an arbitrary notice (admin + sesskey).
async fn create_notification(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(req): Json<CreateNotificationRequest>,
) -> AppResult<ApiResponse<NoticeResponse>> {
    require_admin(user)?;
    req.validate()?;

    if !state.notification_service.verify_sesskey(user.id, &req.sesskey) {
        return Err(AppError::InvalidSesskey);
    }

    info!(user_id = user.id, course_id = req.course_id, "Creating notification");

    let notice = state
        .notification_service
        .create(CreateNotificationInput {
            object_id: req.course_id,
            context_id: req.context_id,
            payload: Payload::Arbitrary(ArbitraryPayload {
                level: req.level,
                message: req.message,
                dismissable: req.dismissable,
                actions: req.actions,
            }),
        })
        .await?;

    Ok(ApiResponse::ok(NoticeResponse::from(&notice)))
}

/// Sesskey query for mutating calls that carry it in the URL.
#[derive(Debug, Deserialize)]
pub struct SesskeyQuery {
    pub sesskey: String,
}

/// Soft-delete a notification (admin + sesskey).
async fn delete_notification(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<SesskeyQuery>,
) -> AppResult<ApiResponse<()>> {
    require_admin(user)?;

    if !state.notification_service.verify_sesskey(user.id, &query.sesskey) {
        return Err(AppError::InvalidSesskey);
    }

    info!(user_id = user.id, notification_id = %id, "Deleting notification");

    state.notification_service.delete(&id).await?;

    Ok(ApiResponse::ok(()))
}

/// Record the acting user's dismissal.
async fn dismiss_notification(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.notification_service.mark_seen(&id, user.id).await?;

    Ok(ApiResponse::ok(()))
}

/// Expansion toggle request.
#[derive(Debug, Deserialize)]
pub struct ExpandedRequest {
    pub value: bool,
}

/// Persist the acting user's expansion preference for a notice.
async fn set_expanded(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ExpandedRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .notification_service
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotificationNotFound(id.clone()))?;

    state
        .notification_service
        .set_expanded(user.id, &id, req.value)
        .await?;

    Ok(ApiResponse::ok(()))
}

/// Sesskey response.
#[derive(Debug, Serialize)]
pub struct SesskeyResponse {
    pub sesskey: String,
}

/// The acting user's forgery token, embedded by LMS page templates.
async fn get_sesskey(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<SesskeyResponse>> {
    Ok(ApiResponse::ok(SesskeyResponse {
        sesskey: state.notification_service.sesskey(user.id),
    }))
}

/// Course listing response.
#[derive(Debug, Serialize)]
pub struct CourseNoticesResponse {
    pub notifications: Vec<NoticeResponse>,
    pub total: u64,
}

/// Decoded notices for a course.
async fn list_for_course(
    _user: CurrentUser,
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> AppResult<ApiResponse<CourseNoticesResponse>> {
    let notices = state.notification_service.list_for_course(course_id).await?;
    let total = notices.len() as u64;

    Ok(ApiResponse::ok(CourseNoticesResponse {
        notifications: notices.iter().map(NoticeResponse::from).collect(),
        total,
    }))
}

/// Rendered alerts response.
#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub html: String,
}

/// Rendered HTML of all alerts visible to the acting user.
async fn render_for_course(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> AppResult<ApiResponse<RenderResponse>> {
    let html = state
        .notification_service
        .render_for_course(course_id, user.id)
        .await?;

    Ok(ApiResponse::ok(RenderResponse { html }))
}

/// Purge response.
#[derive(Debug, Serialize)]
pub struct PurgeResponse {
    pub purged: u64,
}

/// Course-deletion observer hook (admin only): hard-delete every
/// notification the course owns.
async fn purge_for_course(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> AppResult<ApiResponse<PurgeResponse>> {
    require_admin(user)?;

    info!(user_id = user.id, course_id, "Purging notifications for course");

    let purged = state.notification_service.purge_for_course(course_id).await?;

    Ok(ApiResponse::ok(PurgeResponse { purged }))
}

fn require_admin(user: CurrentUser) -> AppResult<()> {
    if user.is_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only admins can manage notifications".to_string(),
        ))
    }
}
