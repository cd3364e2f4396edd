//! Common utilities and shared types for courseboard.
//!
//! This crate provides foundational components used across all
//! courseboard crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Sesskey**: HMAC request-forgery tokens via [`sesskey`]
//!
//! # Example
//!
//! ```no_run
//! use courseboard_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod sesskey;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use sesskey::{issue_sesskey, verify_sesskey};
