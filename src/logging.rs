//! Middleware for logging requests and responses.

use axum::{extract::Request, middleware::Next, response::Response};

/// How many bytes of a request or response body to log at the `info`
/// level. Longer bodies are truncated and logged in full at `debug`.
const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response bodies for each request.
///
/// # Panics
///
/// Panics if a request or response body cannot be buffered.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_text = buffer_body(body).await;

    log_payload(
        &format!("{} {}", parts.method, parts.uri),
        "received request",
        &body_text,
    );

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_text = buffer_body(body).await;

    log_payload(
        &format!("{}", parts.status),
        "sending response",
        &body_text,
    );

    Response::from_parts(parts, body_text.into())
}

async fn buffer_body(body: axum::body::Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("failed to buffer body for logging");

    String::from_utf8_lossy(&bytes).to_string()
}

fn log_payload(heading: &str, direction: &str, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "{direction}: {heading} body: {}...",
            &body[..LOG_BODY_LENGTH_LIMIT]
        );
        tracing::debug!("{direction}: {heading} full body: {body}");
    } else {
        tracing::info!("{direction}: {heading} body: {body:?}");
    }
}
