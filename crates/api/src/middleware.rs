//! API middleware.

use courseboard_core::NotificationService;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub notification_service: NotificationService,
}

impl AppState {
    /// Create the shared state.
    #[must_use]
    pub const fn new(notification_service: NotificationService) -> Self {
        Self {
            notification_service,
        }
    }
}
