//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with one handler per registered route
//! - Mount routes through the explicit method table
//! - Wire up middleware (request ID, CORS, logging, delay, tracing)
//! - Bind server to listener with graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::RawPathParams,
    http::{HeaderMap, Uri},
    middleware,
    routing::MethodRouter,
    Router,
};
use indexmap::IndexMap;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{MiddlewareConfig, MockConfig};
use crate::dispatch::Dispatcher;
use crate::http::middleware::{cors_middleware, delay_middleware, request_logger};
use crate::http::request::build_context;
use crate::http::response::route_not_found;
use crate::lifecycle::signals::shutdown_signal;
use crate::lifecycle::ShutdownListener;
use crate::routing::{Route, RouteRegistry};

/// HTTP server for the mock routes.
pub struct MockServer {
    router: Router,
    config: MockConfig,
    route_count: usize,
}

impl MockServer {
    /// Create a new server serving every route in `registry`.
    pub fn new(config: MockConfig, registry: RouteRegistry) -> Self {
        let dispatcher = Dispatcher::new(registry.resolver().clone(), registry.reporter().clone());
        let router = Self::build_router(&config.middleware, &registry, dispatcher);
        Self {
            router,
            config,
            route_count: registry.len(),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(middleware_config: &MiddlewareConfig, registry: &RouteRegistry, dispatcher: Dispatcher) -> Router {
        // One MethodRouter per normalized path; the router rejects a path mounted twice.
        // Unregistered methods on a known path answer 404, not 405.
        let mut paths: IndexMap<String, MethodRouter> = IndexMap::new();
        for route in registry.routes() {
            let slot = paths
                .entry(route.key().path)
                .or_insert_with(|| MethodRouter::new().fallback(route_not_found));
            let method_router = std::mem::replace(slot, MethodRouter::new());
            *slot = mount(method_router, route.clone(), dispatcher.clone());
        }

        let mut router = paths
            .into_iter()
            .fold(Router::new(), |router, (path, method_router)| router.route(&path, method_router))
            .fallback(route_not_found);

        if middleware_config.delay_ms > 0 {
            router = router.layer(middleware::from_fn_with_state(
                Duration::from_millis(middleware_config.delay_ms),
                delay_middleware,
            ));
        }
        if middleware_config.request_log {
            router = router.layer(middleware::from_fn(request_logger));
        }
        if middleware_config.cors {
            router = router.layer(middleware::from_fn(cors_middleware));
        }

        router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for serving on a custom listener or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// Ctrl+C or the shutdown signal fires.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.route_count,
            delay_ms = self.config.middleware.delay_ms,
            "Mock server running"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_signal() => {}
                    _ = shutdown.wait() => {
                        tracing::info!("Shutdown requested");
                    }
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    pub fn route_count(&self) -> usize {
        self.route_count
    }
}

/// Register `route` on `method_router` under its method's filter.
fn mount(method_router: MethodRouter, route: Arc<Route>, dispatcher: Dispatcher) -> MethodRouter {
    let filter = route.method.filter();
    let handler = move |uri: Uri, params: RawPathParams, headers: HeaderMap, body: Bytes| {
        let route = route.clone();
        let dispatcher = dispatcher.clone();
        async move {
            let ctx = build_context(route.method, &uri, &params, headers, &body);
            dispatcher.dispatch(&route, ctx).await
        }
    };
    method_router.on(filter, handler)
}
