//! App user identity.
//!
//! A user the host has not identified gets a generated anonymous ID of the
//! form `$RCAnonymousID:<32 lowercase hex chars>`. Both backends and every
//! plugin use the same format so the IDs are interchangeable.

use uuid::Uuid;

/// Prefix of generated anonymous app user IDs.
pub const ANONYMOUS_ID_PREFIX: &str = "$RCAnonymousID:";

/// Fresh anonymous app user ID.
#[must_use]
pub fn anonymous_app_user_id() -> String {
    format!("{ANONYMOUS_ID_PREFIX}{}", Uuid::new_v4().simple())
}
