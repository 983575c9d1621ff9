//! User service inputs and results.

use usergate_core::UserStatus;

/// Input for creating a user. `password` is plaintext and is hashed by the
/// service before it reaches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub description: String,
    pub status: UserStatus,
}

/// Partial update keyed by `username`.
///
/// `None` and empty strings mean "no change", so an update can never clear
/// the email or description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub username: String,
    pub status: Option<UserStatus>,
    pub email: String,
    pub description: String,
    pub password: String,
}

impl UserUpdate {
    /// Creates an update for `username` that changes nothing yet.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }
}

/// Outcome of a password check. Only storage failures are errors; both ways
/// of failing the check are ordinary values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordCheck {
    Verified,
    UserNotFound,
    Mismatch,
}

impl PasswordCheck {
    #[must_use]
    pub const fn is_verified(self) -> bool {
        matches!(self, Self::Verified)
    }

    /// Human-readable reason, empty when verified.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::Verified => "",
            Self::UserNotFound => "user not found",
            Self::Mismatch => "password mismatch",
        }
    }
}
