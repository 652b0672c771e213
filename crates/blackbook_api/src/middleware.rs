//! Request logging.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use log::{info, warn};
use std::time::Instant;

/// Emits one `event=http_request` line per request.
pub async fn log_request(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    let status = response.status();
    let duration_ms = started_at.elapsed().as_millis();
    if status.is_server_error() {
        warn!(
            "event=http_request module=api status=error method={} path={} http_status={} duration_ms={}",
            method,
            path,
            status.as_u16(),
            duration_ms
        );
    } else {
        info!(
            "event=http_request module=api status=ok method={} path={} http_status={} duration_ms={}",
            method,
            path,
            status.as_u16(),
            duration_ms
        );
    }
    response
}
