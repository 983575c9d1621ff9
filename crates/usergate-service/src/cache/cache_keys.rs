//! Cache key generators.

/// Namespace for cached users.
const USER_PREFIX: &str = "cache:user:";

/// Cache key for a user. One slot per username.
#[must_use]
pub fn user(username: &str) -> String {
    format!("{USER_PREFIX}{username}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_key() {
        assert_eq!(user("alice"), "cache:user:alice");
    }

    #[test]
    fn test_user_key_is_case_sensitive() {
        assert_ne!(user("Alice"), user("alice"));
    }
}
