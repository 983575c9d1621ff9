//! User entity.

use crate::UserStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User account.
///
/// `id` is storage-internal and `password_hash` is never serialized, so any
/// `User` written out as JSON (API responses, cache entries) carries neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(skip)]
    pub id: i64,
    pub username: String,
    #[cfg_attr(feature = "openapi", schema(value_type = i32, example = 1))]
    pub status: UserStatus,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Checks if the account is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Returns the user with the password hash cleared.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.password_hash.clear();
        self
    }
}
