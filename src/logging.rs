//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

/// The JSON fields that are never written to the logs.
const REDACTED_FIELDS: [&str; 2] = ["password", "token"];
const REDACTED: &str = "********";

/// The longest request or response body logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
///
/// Passwords and tokens in JSON bodies, and the `Authorization` header, are redacted.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    tracing::info!(
        "Received request: {} {}\nheaders: {:#?}",
        parts.method,
        parts.uri,
        redact_headers(&parts.headers)
    );
    log_body("request", &display_body(&parts.headers, &body_bytes));

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    tracing::info!("Sending response: {}", parts.status);
    log_body("response", &display_body(&parts.headers, &body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

fn redact_headers(headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();

    if headers.contains_key(AUTHORIZATION) {
        headers.insert(AUTHORIZATION, HeaderValue::from_static(REDACTED));
    }

    headers
}

fn display_body(headers: &HeaderMap, body: &Bytes) -> String {
    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|content_type| content_type.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("application/json"));

    if is_json {
        if let Ok(json) = serde_json::from_slice::<Value>(body) {
            return redact_json(json).to_string();
        }
    }

    String::from_utf8_lossy(body).to_string()
}

fn redact_json(mut json: Value) -> Value {
    if let Value::Object(ref mut object) = json {
        for field in REDACTED_FIELDS {
            if let Some(value) = object.get_mut(field) {
                *value = Value::String(REDACTED.to_owned());
            }
        }
    }

    json
}

fn log_body(kind: &str, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        let end = (0..=LOG_BODY_LENGTH_LIMIT)
            .rev()
            .find(|&index| body.is_char_boundary(index))
            .unwrap_or(0);
        tracing::info!("{kind} body: {}...", &body[..end]);
        tracing::debug!("Full {kind} body: {body:?}");
    } else {
        tracing::info!("{kind} body: {body:?}");
    }
}
