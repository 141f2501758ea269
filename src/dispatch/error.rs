//! Dispatch error taxonomy.
//!
//! # Kinds
//! - `NotFound`: expected, user-facing; carries its own message and maps to 404
//! - `InvalidRouteConfig`: the route's response is unusable; maps to 500
//! - `Internal`: everything else; maps to a generic 500
//!
//! Only `NotFound` exposes its message to the client.

use axum::http::StatusCode;
use thiserror::Error;

/// Boxed error used for causes raised by user-supplied code.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Body message for requests that failed with an internal error.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Body message for routes whose response is neither a template nor a function.
pub const INVALID_RESPONSE_TYPE_MESSAGE: &str = "Invalid route configuration: response type";

/// Errors raised while producing a response for one request.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The requested resource does not exist.
    #[error("{message}")]
    NotFound { message: String },

    /// The route was registered with an unusable response.
    #[error("Invalid route configuration: {detail}")]
    InvalidRouteConfig { detail: String },

    /// Any other failure during response resolution or query handling.
    #[error("Internal error: {cause}")]
    Internal { cause: BoxError },
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

impl DispatchError {
    /// Create a not-found error with the given message.
    pub fn not_found(message: impl Into<String>) -> Self {
        DispatchError::NotFound {
            message: message.into(),
        }
    }

    /// Create an invalid-configuration error.
    pub fn invalid_config(detail: impl Into<String>) -> Self {
        DispatchError::InvalidRouteConfig {
            detail: detail.into(),
        }
    }

    /// Wrap any error as an internal failure.
    pub fn internal(cause: impl Into<BoxError>) -> Self {
        DispatchError::Internal {
            cause: cause.into(),
        }
    }

    /// HTTP status this error is answered with.
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::NotFound { .. } => StatusCode::NOT_FOUND,
            DispatchError::InvalidRouteConfig { .. } | DispatchError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message placed in the `{"error": ...}` body.
    pub fn client_message(&self) -> String {
        match self {
            DispatchError::NotFound { message } => message.clone(),
            DispatchError::InvalidRouteConfig { .. } => INVALID_RESPONSE_TYPE_MESSAGE.to_string(),
            DispatchError::Internal { .. } => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}
