//! Request-forgery tokens ("sesskeys").
//!
//! Mutating admin calls carry a per-user token derived from the session
//! secret, in the style of an LMS session key. The token is an
//! HMAC-SHA256 of the user id, hex encoded, so it can be verified
//! statelessly on any instance sharing the secret.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Derive the forgery token for a user.
#[must_use]
pub fn issue_sesskey(secret: &str, user_id: i64) -> String {
    // HMAC accepts keys of any length
    #[allow(clippy::unwrap_used)]
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(user_id.to_string().as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Check a presented token against the one derived for the user.
#[must_use]
pub fn verify_sesskey(secret: &str, user_id: i64, presented: &str) -> bool {
    // Hex decode first so comparison runs over raw MAC bytes
    let Ok(bytes) = hex::decode(presented) else {
        return false;
    };

    #[allow(clippy::unwrap_used)]
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(user_id.to_string().as_bytes());
    mac.verify_slice(&bytes).is_ok()
}
