//! Domain entities.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Current Unix time in milliseconds, the timestamp unit stored on entities.
#[must_use]
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// A registered user. The password hash never leaves the service.
#[derive(Debug, Clone)]
pub struct User {
    /// Stable identifier (UUID string).
    pub id: String,
    /// Login name, unique per user.
    pub username: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Creation time, Unix milliseconds.
    pub created_at: u64,
    /// Last update time, Unix milliseconds.
    pub updated_at: u64,
}

/// A rating left by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    /// Stable identifier (UUID string).
    pub id: String,
    /// Owner of the rating.
    pub user_id: String,
    /// Score in `[1, 5]`.
    pub rating: f64,
    /// Free-text comment, 1 to 255 characters.
    pub comment: String,
    /// Creation time, Unix milliseconds.
    pub created_at: u64,
    /// Last update time, Unix milliseconds.
    pub updated_at: u64,
}
