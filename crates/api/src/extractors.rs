//! Request extractors.
//!
//! Courseboard sits behind the host LMS, which terminates the real
//! session and forwards the acting user in trusted headers:
//! `X-Lms-User` carries the numeric user id, `X-Lms-Admin` is set to
//! `1` when the user holds the site admin capability. Nothing here
//! authenticates; the trust boundary is the deployment.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};

const USER_HEADER: &str = "x-lms-user";
const ADMIN_HEADER: &str = "x-lms-admin";

/// The acting user, as forwarded by the host LMS.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    /// Host LMS user id.
    pub id: i64,
    /// Whether the host granted the admin capability for this request.
    pub is_admin: bool,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<i64>().ok())
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))?;

        let is_admin = parts
            .headers
            .get(ADMIN_HEADER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));

        Ok(Self { id, is_admin })
    }
}
