//! Route descriptors and their registered form.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::config::RouteConfig;
use crate::dispatch::context::RequestContext;
use crate::dispatch::error::DispatchResult;
use crate::query::{transforms, QueryTransform};
use crate::routing::HttpMethod;

/// Future returned by a dynamic response function.
pub type DynamicFuture = BoxFuture<'static, DispatchResult<Value>>;

/// Dynamic response function signature.
pub type DynamicFn = dyn Fn(RequestContext) -> DynamicFuture + Send + Sync;

/// A response computed per request by user code.
#[derive(Clone)]
pub struct DynamicResponse(Arc<DynamicFn>);

impl DynamicResponse {
    /// Wrap an async function.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = DispatchResult<Value>> + Send + 'static,
    {
        Self(Arc::new(move |ctx| -> DynamicFuture { Box::pin(f(ctx)) }))
    }

    /// Wrap a synchronous function.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(RequestContext) -> DispatchResult<Value> + Send + Sync + 'static,
    {
        Self::new(move |ctx| std::future::ready(f(ctx)))
    }

    pub fn call(&self, ctx: RequestContext) -> DynamicFuture {
        (self.0)(ctx)
    }
}

impl fmt::Debug for DynamicResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DynamicResponse(..)")
    }
}

/// A response template, resolved by the template engine unless `generated` is false.
#[derive(Debug, Clone)]
pub struct StaticResponse {
    pub template: Value,
    pub generated: bool,
}

/// What a route answers with.
#[derive(Debug, Clone)]
pub enum ResponseSpec {
    Static(StaticResponse),
    Dynamic(DynamicResponse),
}

impl ResponseSpec {
    /// Template whose directives are resolved.
    pub fn template(template: Value) -> Self {
        ResponseSpec::Static(StaticResponse {
            template,
            generated: true,
        })
    }

    /// Value served verbatim.
    pub fn literal(value: Value) -> Self {
        ResponseSpec::Static(StaticResponse {
            template: value,
            generated: false,
        })
    }

    /// Async function evaluated per request.
    pub fn dynamic<F, Fut>(f: F) -> Self
    where
        F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = DispatchResult<Value>> + Send + 'static,
    {
        ResponseSpec::Dynamic(DynamicResponse::new(f))
    }

    /// Sync function evaluated per request.
    pub fn dynamic_sync<F>(f: F) -> Self
    where
        F: Fn(RequestContext) -> DispatchResult<Value> + Send + Sync + 'static,
    {
        ResponseSpec::Dynamic(DynamicResponse::from_fn(f))
    }
}

/// Composite route identity, rendered as `METHOD:path`.
///
/// The path is held in router syntax, so `/users/:id` and `/users/{id}`
/// are the same route.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub method: HttpMethod,
    pub path: String,
}

impl RouteKey {
    pub fn new(method: HttpMethod, path: &str) -> Self {
        Self {
            method,
            path: normalize_path(path),
        }
    }
}

/// Convert a route path to router syntax: `/users/:id` becomes `/users/{id}`
/// and `/files/*rest` becomes `/files/{*rest}`.
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if let Some(name) = segment.strip_prefix(':') {
                format!("{{{name}}}")
            } else if let Some(name) = segment.strip_prefix('*') {
                format!("{{*{name}}}")
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// A normalized path with capture names erased. Two different paths with
/// the same shape would match the same requests.
pub fn path_shape(normalized: &str) -> String {
    normalized
        .split('/')
        .map(|segment| match capture(segment) {
            Some((_, true)) => "{*}",
            Some((_, false)) => "{}",
            None => segment,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// `{name}` gives `(name, false)`, `{*name}` gives `(name, true)`.
pub(crate) fn capture(segment: &str) -> Option<(&str, bool)> {
    let inner = segment.strip_prefix('{')?.strip_suffix('}')?;
    Some(match inner.strip_prefix('*') {
        Some(name) => (name, true),
        None => (inner, false),
    })
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.method, self.path)
    }
}

/// A route as declared, before registration.
#[derive(Debug, Clone)]
pub struct RouteDescriptor {
    pub path: String,
    pub method: HttpMethod,
    pub response: ResponseSpec,
    pub query: Vec<QueryTransform>,
}

impl RouteDescriptor {
    pub fn new(method: HttpMethod, path: impl Into<String>, response: ResponseSpec) -> Self {
        Self {
            path: path.into(),
            method,
            response,
            query: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>, response: ResponseSpec) -> Self {
        Self::new(HttpMethod::Get, path, response)
    }

    pub fn post(path: impl Into<String>, response: ResponseSpec) -> Self {
        Self::new(HttpMethod::Post, path, response)
    }

    pub fn put(path: impl Into<String>, response: ResponseSpec) -> Self {
        Self::new(HttpMethod::Put, path, response)
    }

    pub fn patch(path: impl Into<String>, response: ResponseSpec) -> Self {
        Self::new(HttpMethod::Patch, path, response)
    }

    pub fn delete(path: impl Into<String>, response: ResponseSpec) -> Self {
        Self::new(HttpMethod::Delete, path, response)
    }

    /// Append a query transform; transforms run in the order they are added.
    pub fn with_query(mut self, transform: QueryTransform) -> Self {
        self.query.push(transform);
        self
    }

    pub fn key(&self) -> RouteKey {
        RouteKey::new(self.method, &self.path)
    }
}

impl From<&RouteConfig> for RouteDescriptor {
    fn from(config: &RouteConfig) -> Self {
        let response = if config.generated {
            ResponseSpec::template(config.response.clone())
        } else {
            ResponseSpec::literal(config.response.clone())
        };

        Self {
            path: config.path.clone(),
            method: config.method,
            response,
            query: config.query.iter().map(transforms::from_config).collect(),
        }
    }
}

/// Resolved form of a static response.
#[derive(Debug, Clone)]
pub struct StaticRoute {
    /// Snapshot shared read-only by every request.
    pub baseline: Arc<Value>,
    /// Original template, kept for per-request regeneration.
    pub template: Value,
    pub generated: bool,
}

/// Resolved response of a registered route.
#[derive(Debug, Clone)]
pub enum RouteResponse {
    Static(StaticRoute),
    Dynamic(DynamicResponse),
}

/// A registered route. Immutable once created.
#[derive(Debug, Clone)]
pub struct Route {
    pub path: String,
    pub method: HttpMethod,
    pub response: RouteResponse,
    pub query: Vec<QueryTransform>,
}

impl Route {
    pub fn key(&self) -> RouteKey {
        RouteKey::new(self.method, &self.path)
    }
}
