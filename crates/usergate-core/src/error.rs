//! Unified error types for all layers of the service.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for Usergate.
///
/// Storage and cache failures are classified into one of these variants at
/// the point where they happen. After that the variant travels unchanged up
/// to the request layer, which maps it onto a status code.
#[derive(Error, Debug)]
pub enum UsergateError {
    /// Resource not found
    #[error("Resource not found: {resource_type} {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Input validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflict with existing state (e.g. duplicate username)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Password did not match the stored hash
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Cache transport or serialization error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Storage or cache call exceeded its deadline
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse classification of an error, stable across message changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Conflict,
    NotFound,
    BadRequest,
    Unauthorized,
    Timeout,
    Internal,
}

impl UsergateError {
    /// Returns the error kind, for matching without inspecting messages.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::BadRequest,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::InvalidCredentials => ErrorKind::Unauthorized,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Database(_)
            | Self::Cache(_)
            | Self::Configuration(_)
            | Self::Internal(_)
            | Self::Other(_) => ErrorKind::Internal,
        }
    }

    /// Returns true if this error belongs to `kind`.
    #[must_use]
    pub fn is_kind(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::NotFound => 404,
            ErrorKind::BadRequest => 400,
            ErrorKind::Conflict => 409,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Timeout => 503,
            ErrorKind::Internal => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::BadRequest => "BAD_REQUEST",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Timeout => "TIMEOUT",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }

    /// Returns the message that is safe to show to API clients.
    ///
    /// Internal failures are collapsed into a generic message so raw
    /// storage or driver text never leaves the process.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            _ => match self.kind() {
                ErrorKind::Internal => "internal server error".to_string(),
                ErrorKind::Timeout => "service temporarily unavailable".to_string(),
                _ => self.to_string(),
            },
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Prefixes infrastructure and timeout messages with `context`.
    ///
    /// Client-facing variants are returned unchanged, as is the kind.
    #[must_use]
    pub fn context(self, context: impl std::fmt::Display) -> Self {
        match self {
            Self::Database(msg) => Self::Database(format!("{context}: {msg}")),
            Self::Cache(msg) => Self::Cache(format!("{context}: {msg}")),
            Self::Configuration(msg) => Self::Configuration(format!("{context}: {msg}")),
            Self::Timeout(msg) => Self::Timeout(format!("{context}: {msg}")),
            Self::Internal(msg) => Self::Internal(format!("{context}: {msg}")),
            Self::Other(err) => Self::Other(err.context(context.to_string())),
            other => other,
        }
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for UsergateError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "row",
                id: "unknown".to_string(),
            },
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::Conflict(db_err.message().to_string())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for UsergateError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {err}"))
    }
}

/// Serializable error body returned by the HTTP layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Human-readable error message
    pub message: String,
    /// Machine-readable error code
    pub code: String,
    /// Correlation id of the failed request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    /// Creates a new error response from a `UsergateError`.
    #[must_use]
    pub fn from_error(error: &UsergateError) -> Self {
        Self {
            message: error.public_message(),
            code: error.error_code().to_string(),
            request_id: None,
        }
    }

    /// Sets the request id.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

impl From<&UsergateError> for ErrorResponse {
    fn from(error: &UsergateError) -> Self {
        Self::from_error(error)
    }
}
