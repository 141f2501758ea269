//! Observer interface for registration and dispatch events.
//!
//! The registry and the dispatcher never log directly; they call into a
//! `Reporter`. `TracingReporter` is the production sink.

use crate::dispatch::error::DispatchError;
use crate::routing::HttpMethod;

/// Receives registration and dispatch events.
pub trait Reporter: Send + Sync {
    /// A route was added to the registry.
    fn route_registered(&self, method: HttpMethod, path: &str);

    /// A route replaced an earlier registration with the same key.
    fn route_overridden(&self, method: HttpMethod, path: &str);

    /// A route's response could not be used.
    fn invalid_route_config(&self, method: HttpMethod, path: &str, detail: &str);

    /// A request failed with an internal error.
    fn internal_error(&self, method: HttpMethod, path: &str, error: &DispatchError);
}

/// Reporter that emits `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn route_registered(&self, method: HttpMethod, path: &str) {
        tracing::info!(method = %method, path = %path, "Registered mock route");
    }

    fn route_overridden(&self, method: HttpMethod, path: &str) {
        tracing::warn!(method = %method, path = %path, "Route overridden by later definition");
    }

    fn invalid_route_config(&self, method: HttpMethod, path: &str, detail: &str) {
        tracing::error!(method = %method, path = %path, detail = %detail, "Invalid response type");
    }

    fn internal_error(&self, method: HttpMethod, path: &str, error: &DispatchError) {
        tracing::error!(method = %method, path = %path, error = %error, "Unexpected error handling route");
    }
}
