//! Default success status per HTTP method.

use axum::http::StatusCode;

use crate::routing::HttpMethod;

/// Status a successful response is sent with.
pub fn determine_status(method: HttpMethod) -> StatusCode {
    match method {
        HttpMethod::Get => StatusCode::OK,
        HttpMethod::Post => StatusCode::CREATED,
        HttpMethod::Put | HttpMethod::Patch => StatusCode::OK,
        HttpMethod::Delete => StatusCode::NO_CONTENT,
    }
}
