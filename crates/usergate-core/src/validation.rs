//! Validation utilities.

use crate::UsergateError;
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `UsergateError` on failure.
    fn validate_request(&self) -> Result<(), UsergateError> {
        self.validate().map_err(validation_errors_to_usergate_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Converts `validator::ValidationErrors` into a single validation error.
///
/// Fields are reported in name order so the message is deterministic.
#[must_use]
pub fn validation_errors_to_usergate_error(errors: ValidationErrors) -> UsergateError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let message = fields
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let detail = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                format!("{field}: {detail}")
            })
        })
        .collect::<Vec<_>>()
        .join("; ");

    UsergateError::Validation(message)
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Maximum username length.
    pub const USERNAME_MAX_LEN: usize = 64;

    /// Validates a username: 1 to 64 ASCII letters, digits or underscores.
    pub fn valid_username(username: &str) -> Result<(), ValidationError> {
        if username.is_empty() || username.len() > USERNAME_MAX_LEN {
            return Err(ValidationError::new("username_length")
                .with_message("username must be between 1 and 64 characters".into()));
        }
        if !username
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            return Err(ValidationError::new("username_charset")
                .with_message("username may only contain letters, digits and underscores".into()));
        }
        Ok(())
    }
}
