//! Audit trail for mutating requests.

use super::request_id_of;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use serde_json::Value;
use tracing::info;

/// Largest request body the audit middleware buffers.
pub const AUDIT_BODY_LIMIT: usize = 64 * 1024;

const REDACTED_FIELDS: [&str; 2] = ["password", "confirmPassword"];

/// Logs who changed what under the `audit` target.
///
/// The body is buffered so it can be logged and then handed on unchanged.
/// Password fields never reach the log.
pub async fn audit_middleware(request: Request<Body>, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, AUDIT_BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(e) => {
            info!(target: "audit", error = %e, "Request body could not be buffered");
            axum::body::Bytes::new()
        }
    };

    let request = Request::from_parts(parts, Body::from(bytes.clone()));
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let raw_query = request.uri().query().unwrap_or_default().to_owned();
    let host = header_str(&request, header::HOST);
    let user_agent = header_str(&request, header::USER_AGENT);
    let request_id = request_id_of(&request).unwrap_or_default();

    let response = next.run(request).await;

    info!(
        target: "audit",
        method = %method,
        host = %host,
        path = %path,
        raw_query = %raw_query,
        user_agent = %user_agent,
        body = %redact_body(&bytes),
        status = response.status().as_u16(),
        request_id = %request_id,
        "Audit"
    );

    response
}

fn header_str(request: &Request<Body>, name: header::HeaderName) -> String {
    request
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned()
}

/// Renders a request body for the audit log with password fields masked.
///
/// Non-JSON bodies are logged as lossy UTF-8.
pub fn redact_body(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return String::new();
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(mut fields)) => {
            for name in REDACTED_FIELDS {
                if let Some(value) = fields.get_mut(name) {
                    *value = Value::String("***".to_string());
                }
            }
            Value::Object(fields).to_string()
        }
        Ok(other) => other.to_string(),
        Err(_) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_masks_password_fields() {
        let body = br#"{"username":"alice","password":"s3cret!!","confirmPassword":"s3cret!!"}"#;
        let logged = redact_body(body);
        assert!(!logged.contains("s3cret"));
        assert!(logged.contains(r#""password":"***""#));
        assert!(logged.contains(r#""confirmPassword":"***""#));
        assert!(logged.contains(r#""username":"alice""#));
    }

    #[test]
    fn test_redact_leaves_other_bodies() {
        assert_eq!(redact_body(b""), "");
        assert_eq!(redact_body(br#"{"status":2}"#), r#"{"status":2}"#);
        assert_eq!(redact_body(b"not json"), "not json");
    }
}
