//! User status value object.

use crate::UsergateError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// User account status, stored and serialized as a small integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum UserStatus {
    /// Account is usable.
    #[default]
    Active,
    /// Account is disabled.
    Inactive,
}

impl UserStatus {
    /// Integer code used in storage and on the wire.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Active => 1,
            Self::Inactive => 2,
        }
    }

    /// Checks if the account is considered active.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl TryFrom<i32> for UserStatus {
    type Error = UsergateError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Active),
            2 => Ok(Self::Inactive),
            other => Err(UsergateError::validation(format!(
                "status must be one of 1, 2; got {other}"
            ))),
        }
    }
}

impl From<UserStatus> for i32 {
    fn from(status: UserStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(UserStatus::Active.code(), 1);
        assert_eq!(UserStatus::Inactive.code(), 2);
        assert_eq!(UserStatus::try_from(2).unwrap(), UserStatus::Inactive);
    }

    #[test]
    fn test_invalid_status_code() {
        assert!(UserStatus::try_from(0).is_err());
        assert!(UserStatus::try_from(3).is_err());
    }

    #[test]
    fn test_status_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&UserStatus::Inactive).unwrap(), "2");
        let parsed: UserStatus = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, UserStatus::Active);
        assert!(serde_json::from_str::<UserStatus>("7").is_err());
    }

    #[test]
    fn test_is_active() {
        assert!(UserStatus::Active.is_active());
        assert!(!UserStatus::Inactive.is_active());
    }
}
