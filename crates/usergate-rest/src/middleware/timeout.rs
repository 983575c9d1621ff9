//! Whole-request deadline.

use crate::responses::AppError;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Duration;
use usergate_core::with_timeout;

/// Answers 503 `TIMEOUT` when the inner handler runs past `deadline`.
pub async fn timeout_middleware(
    State(deadline): State<Duration>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match with_timeout(deadline, "request", async { Ok(next.run(request).await) }).await {
        Ok(response) => response,
        Err(err) => AppError(err).into_response(),
    }
}
