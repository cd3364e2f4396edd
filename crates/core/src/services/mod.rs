//! Business logic services.

#![allow(missing_docs)]

pub mod event_publisher;
pub mod notification;

pub use event_publisher::{
    EventPublisher, EventPublisherService, NoOpEventPublisher, TracingEventPublisher,
};
pub use notification::{CreateNotificationInput, NotificationService};
