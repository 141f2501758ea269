//! Response emission.
//!
//! # Responsibilities
//! - Serialize dispatch outcomes as JSON with their status
//! - Answer unmatched routes with the error body shape

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::dispatch::DispatchOutcome;

impl IntoResponse for DispatchOutcome {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Fallback for paths and methods with no registered route.
pub async fn route_not_found() -> DispatchOutcome {
    DispatchOutcome::error(StatusCode::NOT_FOUND, "Route not found")
}
