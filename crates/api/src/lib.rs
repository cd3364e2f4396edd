//! HTTP API layer for courseboard.
//!
//! This crate provides the REST surface the host LMS calls:
//!
//! - **Endpoints**: registry CRUD, dismissal, rendering
//! - **Extractors**: the forwarded acting user (trust-boundary headers)
//! - **Response**: the JSON envelope shared by all endpoints
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
