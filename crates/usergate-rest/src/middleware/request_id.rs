//! Correlation ids.
//!
//! `X-Request-Id` itself is generated and echoed by the `tower-http`
//! request-id layers. This module copies the id into error bodies.

use axum::{
    body::Body,
    http::{header::CONTENT_LENGTH, Request},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tower_http::request_id::RequestId;
use usergate_core::ErrorResponse;

/// Returns the request id assigned by `SetRequestIdLayer`, if any.
pub fn request_id_of<B>(request: &Request<B>) -> Option<String> {
    request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .map(ToOwned::to_owned)
}

/// Rewrites error bodies produced by `AppError` to carry the request id.
pub async fn error_request_id_middleware(request: Request<Body>, next: Next) -> Response {
    let request_id = request_id_of(&request);
    let mut response = next.run(request).await;

    let Some(request_id) = request_id else {
        return response;
    };
    let Some(error) = response.extensions_mut().remove::<ErrorResponse>() else {
        return response;
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(CONTENT_LENGTH);
    let body = Json(error.with_request_id(request_id))
        .into_response()
        .into_body();
    Response::from_parts(parts, body)
}
