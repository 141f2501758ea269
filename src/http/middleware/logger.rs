//! Request/response logging.

use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};

use crate::http::request::request_id;
use crate::observability::metrics;

/// Logs each request on arrival and again with its status and latency.
pub async fn request_logger(request: Request<Body>, next: Next) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request_id(request.headers()).to_string();

    tracing::info!(request_id = %request_id, method = %method, uri = %uri, "request started");

    let response = next.run(request).await;
    let status = response.status().as_u16();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status,
        duration_ms = start_time.elapsed().as_millis() as u64,
        "request finished"
    );
    metrics::record_request(method.as_str(), status, start_time);

    response
}
