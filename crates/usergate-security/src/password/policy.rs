//! Raw password format policy.

use usergate_core::{UsergateError, UsergateResult};

/// Minimum password length in bytes.
pub const PASSWORD_MIN_LEN: usize = 8;
/// Maximum password length in bytes.
pub const PASSWORD_MAX_LEN: usize = 32;

pub const MSG_MISMATCH: &str = "password and confirm password do not match";
pub const MSG_LENGTH: &str = "password must be between 8 and 32 characters";
pub const MSG_CHARACTER_CLASSES: &str =
    "password must contain at least one number, one letter, and one special character";

/// Checks a new password and its confirmation.
///
/// Rules are checked in a fixed order and the first failure is reported:
/// the two values must match, the length must be 8 to 32 bytes, and the
/// password must contain an ASCII digit, an ASCII letter and a symbol.
/// A symbol is any character that is not an ASCII letter, digit,
/// underscore or whitespace.
pub fn validate_password(password: &str, confirm_password: &str) -> UsergateResult<()> {
    if password != confirm_password {
        return Err(UsergateError::validation(MSG_MISMATCH));
    }

    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&password.len()) {
        return Err(UsergateError::validation(MSG_LENGTH));
    }

    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_symbol = password.chars().any(is_symbol);
    if !(has_digit && has_letter && has_symbol) {
        return Err(UsergateError::validation(MSG_CHARACTER_CLASSES));
    }

    Ok(())
}

fn is_symbol(c: char) -> bool {
    !(c.is_ascii_alphanumeric() || c == '_' || c.is_ascii_whitespace())
}
