use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use uuid::Uuid;

/// Request logging middleware
pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let request_id = Uuid::new_v4();
    let start = Instant::now();

    // Process request
    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        uri = %uri,
        request_id = %request_id,
        status = %status,
        duration_ms = %duration.as_millis(),
        "Request processed"
    );

    response
}
