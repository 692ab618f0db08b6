//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Bodies longer than this many bytes are truncated in `info` logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body = match read_body(body).await {
        Ok(body) => body,
        Err(error) => {
            tracing::warn!("Could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };
    tracing::info!(
        "Received request: {} {}\nbody: {}",
        parts.method,
        parts.uri,
        truncate_body(&body)
    );
    tracing::debug!("Full request: {parts:#?}\nbody: {body:?}");

    let response = next.run(Request::from_parts(parts, Body::from(body))).await;

    let (parts, body) = response.into_parts();
    let body = match read_body(body).await {
        Ok(body) => body,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    tracing::info!(
        "Sending response: {}\nbody: {}",
        parts.status,
        truncate_body(&body)
    );
    tracing::debug!("Full response: {parts:#?}\nbody: {body:?}");

    Response::from_parts(parts, Body::from(body))
}

async fn read_body(body: Body) -> Result<Bytes, axum::Error> {
    axum::body::to_bytes(body, usize::MAX).await
}

/// The body as text, cut to [LOG_BODY_LENGTH_LIMIT] bytes with a trailing
/// ellipsis if it is longer.
fn truncate_body(body: &[u8]) -> String {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        format!(
            "{}...",
            String::from_utf8_lossy(&body[..LOG_BODY_LENGTH_LIMIT])
        )
    } else {
        String::from_utf8_lossy(body).to_string()
    }
}
