//! Core business logic for courseboard.

pub mod notice;
pub mod render;
pub mod services;

pub use notice::{DecodeError, Level, ListItem, Notice, NoticeKind, Payload};
pub use services::*;
