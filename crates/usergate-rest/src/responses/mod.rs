//! Error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};
use usergate_core::{ErrorKind, ErrorResponse, UsergateError};

/// Application error type for Axum.
///
/// The rendered [`ErrorResponse`] is also stored in the response extensions
/// so the request-id middleware can stamp the correlation id into the body.
#[derive(Debug)]
pub struct AppError(pub UsergateError);

impl From<UsergateError> for AppError {
    fn from(err: UsergateError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match self.0.kind() {
            ErrorKind::Internal | ErrorKind::Timeout => error!(error = %self.0, "Request failed"),
            _ => warn!(error = %self.0, "Request rejected"),
        }

        let body = ErrorResponse::from_error(&self.0);
        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Helper to create a success response.
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_follows_error_kind() {
        let cases = [
            (UsergateError::not_found("User", "bob"), StatusCode::NOT_FOUND),
            (UsergateError::validation("bad"), StatusCode::BAD_REQUEST),
            (UsergateError::conflict("dup"), StatusCode::CONFLICT),
            (UsergateError::Database("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (UsergateError::Timeout("get user".into()), StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (err, expected) in cases {
            assert_eq!(AppError(err).into_response().status(), expected);
        }
    }

    #[test]
    fn test_body_is_kept_in_extensions() {
        let response = AppError(UsergateError::conflict("dup")).into_response();
        let body = response.extensions().get::<ErrorResponse>().unwrap();
        assert_eq!(body.code, "CONFLICT");
        assert!(body.request_id.is_none());
    }
}
