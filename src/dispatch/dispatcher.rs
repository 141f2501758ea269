//! Per-request dispatch.
//!
//! # States
//! ```text
//! ResolveResponse → ApplyQueryPipeline (static only) → DetermineStatus → Emit
//!        │                    │
//!        └────────────────────┴──→ HandleError → Emit
//! ```
//!
//! Every failure, including a panic in user code, ends in `HandleError`;
//! nothing escapes to the HTTP layer.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use axum::http::StatusCode;
use futures_util::FutureExt;
use serde_json::{json, Value};

use crate::config::ResolvePolicy;
use crate::dispatch::context::RequestContext;
use crate::dispatch::error::{DispatchError, DispatchResult};
use crate::dispatch::reporter::Reporter;
use crate::dispatch::status::determine_status;
use crate::query;
use crate::routing::registry::validate_template;
use crate::routing::{Route, RouteResponse, StaticRoute};
use crate::template::TemplateResolver;

/// Status and JSON body produced for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    pub status: StatusCode,
    pub body: Value,
}

impl DispatchOutcome {
    /// An `{"error": message}` outcome.
    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }
}

/// Produces isolated results for registered routes.
#[derive(Clone)]
pub struct Dispatcher {
    resolver: Arc<TemplateResolver>,
    policy: ResolvePolicy,
    reporter: Arc<dyn Reporter>,
}

impl Dispatcher {
    /// Create a dispatcher using the resolver's configured policy.
    pub fn new(resolver: Arc<TemplateResolver>, reporter: Arc<dyn Reporter>) -> Self {
        let policy = resolver.config().policy;
        Self {
            resolver,
            policy,
            reporter,
        }
    }

    pub fn policy(&self) -> ResolvePolicy {
        self.policy
    }

    /// Run one request against `route`.
    pub async fn dispatch(&self, route: &Route, ctx: RequestContext) -> DispatchOutcome {
        match self.resolve(route, ctx).await {
            Ok(body) => DispatchOutcome {
                status: determine_status(route.method),
                body,
            },
            Err(err) => self.handle_error(route, err),
        }
    }

    async fn resolve(&self, route: &Route, ctx: RequestContext) -> DispatchResult<Value> {
        match &route.response {
            RouteResponse::Static(response) => panic::catch_unwind(AssertUnwindSafe(|| -> DispatchResult<Value> {
                let mut result = self.fresh_result(response)?;
                query::apply(&ctx.query, &mut result, &route.query)?;
                Ok(result)
            }))
            .map_err(panic_error)?,
            RouteResponse::Dynamic(response) => {
                let future = panic::catch_unwind(AssertUnwindSafe(|| response.call(ctx)))
                    .map_err(panic_error)?;
                AssertUnwindSafe(future).catch_unwind().await.map_err(panic_error)?
            }
        }
    }

    /// A per-request value the query pipeline may mutate freely.
    fn fresh_result(&self, response: &StaticRoute) -> DispatchResult<Value> {
        if let Err(detail) = validate_template(&response.baseline) {
            return Err(DispatchError::invalid_config(detail));
        }

        Ok(match self.policy {
            ResolvePolicy::PerRequest if response.generated => self.resolver.resolve(&response.template),
            _ => response.baseline.as_ref().clone(),
        })
    }

    fn handle_error(&self, route: &Route, err: DispatchError) -> DispatchOutcome {
        match &err {
            DispatchError::NotFound { message } => {
                tracing::debug!(method = %route.method, path = %route.path, message = %message, "Resource not found");
            }
            DispatchError::InvalidRouteConfig { detail } => {
                self.reporter.invalid_route_config(route.method, &route.path, detail);
            }
            DispatchError::Internal { .. } => {
                self.reporter.internal_error(route.method, &route.path, &err);
            }
        }
        DispatchOutcome::error(err.status(), err.client_message())
    }
}

fn panic_error(payload: Box<dyn Any + Send>) -> DispatchError {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    DispatchError::internal(format!("handler panicked: {message}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::dispatch::reporter::TracingReporter;
    use crate::query::{QueryParams, QueryTransform};
    use crate::routing::{HttpMethod, ResponseSpec, RouteDescriptor, RouteRegistry};

    fn setup(policy: ResolvePolicy) -> (RouteRegistry, Dispatcher) {
        let resolver = Arc::new(TemplateResolver::new(GenerationConfig {
            policy,
            ..GenerationConfig::default()
        }));
        let reporter: Arc<dyn Reporter> = Arc::new(TracingReporter);
        let registry = RouteRegistry::new(resolver.clone(), reporter.clone());
        (registry, Dispatcher::new(resolver, reporter))
    }

    fn ctx(method: HttpMethod, query: &str) -> RequestContext {
        RequestContext::new(method, "/test").with_query(QueryParams::parse(query))
    }

    #[tokio::test]
    async fn test_static_response() {
        let (mut registry, dispatcher) = setup(ResolvePolicy::Once);
        let route = registry
            .register(RouteDescriptor::get("/test", ResponseSpec::literal(json!({ "data": "test data" }))))
            .unwrap();

        let outcome = dispatcher.dispatch(&route, ctx(HttpMethod::Get, "")).await;
        assert_eq!(outcome.status, StatusCode::OK);
        assert_eq!(outcome.body, json!({ "data": "test data" }));
    }

    #[tokio::test]
    async fn test_status_follows_method() {
        let (mut registry, dispatcher) = setup(ResolvePolicy::Once);
        for (method, status) in [
            (HttpMethod::Post, StatusCode::CREATED),
            (HttpMethod::Put, StatusCode::OK),
            (HttpMethod::Patch, StatusCode::OK),
            (HttpMethod::Delete, StatusCode::NO_CONTENT),
        ] {
            let route = registry
                .register(RouteDescriptor::new(method, "/x", ResponseSpec::literal(json!({}))))
                .unwrap();
            let outcome = dispatcher.dispatch(&route, ctx(method, "")).await;
            assert_eq!(outcome.status, status);
        }
    }

    #[tokio::test]
    async fn test_query_mutation_does_not_touch_baseline() {
        let (mut registry, dispatcher) = setup(ResolvePolicy::Once);
        let route = registry
            .register(
                RouteDescriptor::get("/test", ResponseSpec::literal(json!({ "data": "test data" })))
                    .with_query(QueryTransform::infallible("filterable", |data, value| {
                        if value == Some("true") {
                            data["filterable"] = json!(true);
                        }
                    })),
            )
            .unwrap();

        let first = dispatcher.dispatch(&route, ctx(HttpMethod::Get, "filterable=true")).await;
        assert_eq!(first.body["filterable"], json!(true));

        let second = dispatcher.dispatch(&route, ctx(HttpMethod::Get, "")).await;
        assert!(second.body.get("filterable").is_none());
    }

    #[tokio::test]
    async fn test_query_handler_error_is_internal() {
        let (mut registry, dispatcher) = setup(ResolvePolicy::Once);
        let route = registry
            .register(
                RouteDescriptor::get("/test", ResponseSpec::literal(json!({ "data": "test data" })))
                    .with_query(QueryTransform::new("filter", |_, _| {
                        Err("Query parameter processing error".into())
                    })),
            )
            .unwrap();

        let outcome = dispatcher.dispatch(&route, ctx(HttpMethod::Get, "")).await;
        assert_eq!(outcome.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(outcome.body, json!({ "error": "Internal Server Error" }));
    }

    #[tokio::test]
    async fn test_query_handler_panic_is_internal() {
        let (mut registry, dispatcher) = setup(ResolvePolicy::Once);
        let route = registry
            .register(
                RouteDescriptor::get("/test", ResponseSpec::literal(json!([])))
                    .with_query(QueryTransform::infallible("boom", |_, _| panic!("boom"))),
            )
            .unwrap();

        let outcome = dispatcher.dispatch(&route, ctx(HttpMethod::Get, "")).await;
        assert_eq!(outcome.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_dynamic_skips_pipeline() {
        let (mut registry, dispatcher) = setup(ResolvePolicy::Once);
        let route = registry
            .register(
                RouteDescriptor::get(
                    "/func-test",
                    ResponseSpec::dynamic_sync(|ctx| {
                        Ok(json!({ "dynamic": "data", "param": ctx.query.first("param") }))
                    }),
                )
                .with_query(QueryTransform::infallible("param", |data, _| data["touched"] = json!(true))),
            )
            .unwrap();

        let outcome = dispatcher.dispatch(&route, ctx(HttpMethod::Get, "param=value")).await;
        assert_eq!(outcome.status, StatusCode::OK);
        assert_eq!(outcome.body, json!({ "dynamic": "data", "param": "value" }));
    }

    #[tokio::test]
    async fn test_async_dynamic_post() {
        let (mut registry, dispatcher) = setup(ResolvePolicy::Once);
        let route = registry
            .register(RouteDescriptor::post(
                "/async-func-test",
                ResponseSpec::dynamic(|ctx: RequestContext| async move {
                    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                    Ok(json!({ "asyncData": "fetched", "path": ctx.path }))
                }),
            ))
            .unwrap();

        let outcome = dispatcher
            .dispatch(&route, RequestContext::new(HttpMethod::Post, "/async-func-test"))
            .await;
        assert_eq!(outcome.status, StatusCode::CREATED);
        assert_eq!(outcome.body, json!({ "asyncData": "fetched", "path": "/async-func-test" }));
    }

    #[tokio::test]
    async fn test_dynamic_not_found() {
        let (mut registry, dispatcher) = setup(ResolvePolicy::Once);
        let route = registry
            .register(RouteDescriptor::get(
                "/not-found",
                ResponseSpec::dynamic(|_| async { Err(DispatchError::not_found("Resource not found")) }),
            ))
            .unwrap();

        let outcome = dispatcher.dispatch(&route, ctx(HttpMethod::Get, "")).await;
        assert_eq!(outcome.status, StatusCode::NOT_FOUND);
        assert_eq!(outcome.body, json!({ "error": "Resource not found" }));
    }

    #[tokio::test]
    async fn test_dynamic_panic_is_internal() {
        let (mut registry, dispatcher) = setup(ResolvePolicy::Once);
        let route = registry
            .register(RouteDescriptor::get(
                "/panics",
                ResponseSpec::dynamic_sync(|_| panic!("generator bug")),
            ))
            .unwrap();

        let outcome = dispatcher.dispatch(&route, ctx(HttpMethod::Get, "")).await;
        assert_eq!(outcome.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(outcome.body, json!({ "error": "Internal Server Error" }));
    }

    #[tokio::test]
    async fn test_invalid_response_type_at_request_time() {
        let (registry, dispatcher) = setup(ResolvePolicy::Once);
        let mut registry = registry.with_fail_fast(false);
        let route = registry
            .register(RouteDescriptor::get(
                "/invalid",
                ResponseSpec::literal(json!("this is not a valid response type")),
            ))
            .unwrap();

        let outcome = dispatcher.dispatch(&route, ctx(HttpMethod::Get, "")).await;
        assert_eq!(outcome.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            outcome.body,
            json!({ "error": "Invalid route configuration: response type" })
        );
    }

    #[tokio::test]
    async fn test_once_policy_reuses_baseline() {
        let (mut registry, dispatcher) = setup(ResolvePolicy::Once);
        let route = registry
            .register(RouteDescriptor::get("/id", ResponseSpec::template(json!({ "id": "uuid" }))))
            .unwrap();

        let a = dispatcher.dispatch(&route, ctx(HttpMethod::Get, "")).await;
        let b = dispatcher.dispatch(&route, ctx(HttpMethod::Get, "")).await;
        assert_eq!(a.body, b.body);
    }

    #[tokio::test]
    async fn test_per_request_policy_regenerates() {
        let (mut registry, dispatcher) = setup(ResolvePolicy::PerRequest);
        let route = registry
            .register(RouteDescriptor::get("/id", ResponseSpec::template(json!({ "id": "uuid" }))))
            .unwrap();

        let a = dispatcher.dispatch(&route, ctx(HttpMethod::Get, "")).await;
        let b = dispatcher.dispatch(&route, ctx(HttpMethod::Get, "")).await;
        assert_ne!(a.body["id"], b.body["id"]);
    }

    #[tokio::test]
    async fn test_per_request_with_huge_date_span() {
        let resolver = Arc::new(TemplateResolver::new(GenerationConfig {
            policy: ResolvePolicy::PerRequest,
            date_span_days: u32::MAX,
            ..GenerationConfig::default()
        }));
        let reporter: Arc<dyn Reporter> = Arc::new(TracingReporter);
        let mut registry = RouteRegistry::new(resolver.clone(), reporter.clone());
        let dispatcher = Dispatcher::new(resolver, reporter);
        let route = registry
            .register(RouteDescriptor::get(
                "/dates",
                ResponseSpec::template(json!({ "at": "future", "far": "future.4294967295" })),
            ))
            .unwrap();

        for _ in 0..20 {
            let outcome = dispatcher.dispatch(&route, ctx(HttpMethod::Get, "")).await;
            assert_eq!(outcome.status, StatusCode::OK);
            assert!(outcome.body["at"].as_str().unwrap().ends_with('Z'));
            assert_eq!(outcome.body["far"], json!("Invalid key: future.4294967295"));
        }
    }
}
