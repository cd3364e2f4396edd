//! Repository layer.

#![allow(missing_docs)]

pub mod enrolment;
pub mod notification;
pub mod user_preference;

pub use enrolment::EnrolmentRepository;
pub use notification::{NotificationFilter, NotificationRepository};
pub use user_preference::UserPreferenceRepository;
