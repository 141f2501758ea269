//! Request extraction.
//!
//! # Responsibilities
//! - Collect method, path, captures, query, headers and body into a `RequestContext`
//!
//! # Design Decisions
//! - A body that is not JSON is dropped rather than rejected

use axum::extract::RawPathParams;
use axum::http::{HeaderMap, Uri};
use serde_json::Value;

use crate::dispatch::RequestContext;
use crate::query::QueryParams;
use crate::routing::HttpMethod;

/// Header carrying the per-request correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Build the dispatcher input for one request.
pub fn build_context(
    method: HttpMethod,
    uri: &Uri,
    params: &RawPathParams,
    headers: HeaderMap,
    body: &[u8],
) -> RequestContext {
    let mut ctx = RequestContext::new(method, uri.path())
        .with_query(QueryParams::from_raw(uri.query()));

    for (name, value) in params.iter() {
        ctx = ctx.with_param(name, value);
    }
    if let Some(json) = parse_body(body) {
        ctx = ctx.with_body(json);
    }
    ctx.headers = headers;
    ctx
}

fn parse_body(body: &[u8]) -> Option<Value> {
    if body.is_empty() {
        return None;
    }
    match serde_json::from_slice(body) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring non-JSON request body");
            None
        }
    }
}

/// Request id assigned by the request-id layer, if any.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}
