//! Database entities.

#![allow(missing_docs)]

pub mod enrolment;
pub mod notification;
pub mod notification_seen;
pub mod user_preference;

pub use enrolment::Entity as Enrolment;
pub use notification::Entity as Notification;
pub use notification_seen::Entity as NotificationSeen;
pub use user_preference::Entity as UserPreference;
