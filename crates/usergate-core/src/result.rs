//! Result type aliases for Usergate.

use crate::UsergateError;

/// A specialized `Result` type for Usergate operations.
pub type UsergateResult<T> = Result<T, UsergateError>;
