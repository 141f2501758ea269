//! Artificial latency.

use std::time::Duration;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

/// Sleeps for the configured duration before passing the request on.
pub async fn delay_middleware(
    State(delay): State<Duration>,
    request: Request<Body>,
    next: Next,
) -> Response {
    tokio::time::sleep(delay).await;
    next.run(request).await
}
