//! Route registration and table merging.
//!
//! # Responsibilities
//! - Validate descriptors before they can serve traffic
//! - Resolve static templates into baseline snapshots
//! - Keep one route per `METHOD:path`, later registrations winning
//! - Reject paths the router could not mount together
//!
//! # Design Decisions
//! - Immutable after startup (shared via `Arc`, no locks)
//! - Insertion order of first-seen keys is preserved

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::dispatch::error::{DispatchError, DispatchResult};
use crate::dispatch::reporter::Reporter;
use crate::routing::route::{
    capture, normalize_path, path_shape, ResponseSpec, Route, RouteDescriptor, RouteKey, RouteResponse,
    StaticResponse, StaticRoute,
};
use crate::routing::HttpMethod;
use crate::template::TemplateResolver;

/// An ordered group of descriptors from one source (a route module or a file).
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    name: String,
    routes: Vec<RouteDescriptor>,
}

impl RouteTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            routes: Vec::new(),
        }
    }

    pub fn with_route(mut self, route: RouteDescriptor) -> Self {
        self.routes.push(route);
        self
    }

    pub fn push(&mut self, route: RouteDescriptor) {
        self.routes.push(route);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }
}

impl Extend<RouteDescriptor> for RouteTable {
    fn extend<I: IntoIterator<Item = RouteDescriptor>>(&mut self, iter: I) {
        self.routes.extend(iter);
    }
}

/// Result of merging route tables.
#[derive(Debug, Default)]
pub struct MergedRoutes {
    /// Duplicate-free descriptors in first-seen key order.
    pub routes: Vec<RouteDescriptor>,
    /// Keys that were defined more than once.
    pub overridden: Vec<RouteKey>,
}

/// Merge tables in order. On a key collision the later descriptor replaces
/// the earlier one but keeps its position.
pub fn merge_tables(tables: impl IntoIterator<Item = RouteTable>) -> MergedRoutes {
    let mut merged: IndexMap<RouteKey, RouteDescriptor> = IndexMap::new();
    let mut overridden = Vec::new();

    for table in tables {
        for route in table.routes {
            let key = route.key();
            if merged.insert(key.clone(), route).is_some() {
                overridden.push(key);
            }
        }
    }

    MergedRoutes {
        routes: merged.into_values().collect(),
        overridden,
    }
}

/// The validated, resolved route table.
pub struct RouteRegistry {
    routes: IndexMap<RouteKey, Arc<Route>>,
    resolver: Arc<TemplateResolver>,
    reporter: Arc<dyn Reporter>,
    fail_fast: bool,
}

impl RouteRegistry {
    /// Create an empty registry that rejects invalid responses at registration.
    pub fn new(resolver: Arc<TemplateResolver>, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            routes: IndexMap::new(),
            resolver,
            reporter,
            fail_fast: true,
        }
    }

    /// When false, routes with unusable responses are kept and fail per request.
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Validate, resolve and store a route.
    pub fn register(&mut self, descriptor: RouteDescriptor) -> DispatchResult<Arc<Route>> {
        validate_path(&descriptor.path)?;
        self.check_conflicts(&descriptor.key())?;

        if let ResponseSpec::Static(ref response) = descriptor.response {
            if let Err(detail) = validate_template(&response.template) {
                if self.fail_fast {
                    return Err(DispatchError::invalid_config(format!(
                        "{}: {detail}",
                        descriptor.key()
                    )));
                }
                self.reporter
                    .invalid_route_config(descriptor.method, &descriptor.path, &detail);
            }
        }

        let route = Arc::new(self.build(descriptor));
        let key = route.key();

        if self.routes.insert(key, route.clone()).is_some() {
            self.reporter.route_overridden(route.method, &route.path);
        } else {
            self.reporter.route_registered(route.method, &route.path);
        }

        Ok(route)
    }

    /// Merge the tables and register the result.
    pub fn register_tables(&mut self, tables: impl IntoIterator<Item = RouteTable>) -> DispatchResult<()> {
        let merged = merge_tables(tables);
        for key in &merged.overridden {
            self.reporter.route_overridden(key.method, &key.path);
        }
        for descriptor in merged.routes {
            self.register(descriptor)?;
        }
        Ok(())
    }

    /// Look up a route; `:param` and `{param}` spellings are interchangeable.
    pub fn get(&self, method: HttpMethod, path: &str) -> Option<&Arc<Route>> {
        self.routes.get(&RouteKey::new(method, path))
    }

    /// Registered routes in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &Arc<Route>> {
        self.routes.values()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn resolver(&self) -> &Arc<TemplateResolver> {
        &self.resolver
    }

    pub fn reporter(&self) -> &Arc<dyn Reporter> {
        &self.reporter
    }

    /// A path matching the same requests as a registered path under other
    /// capture names cannot be mounted next to it.
    fn check_conflicts(&self, key: &RouteKey) -> DispatchResult<()> {
        let shape = path_shape(&key.path);
        let conflict = self
            .routes
            .keys()
            .find(|existing| existing.path != key.path && path_shape(&existing.path) == shape);
        match conflict {
            Some(existing) => Err(DispatchError::invalid_config(format!(
                "route path '{}' conflicts with '{}'",
                key.path, existing.path
            ))),
            None => Ok(()),
        }
    }

    fn build(&self, descriptor: RouteDescriptor) -> Route {
        let response = match descriptor.response {
            ResponseSpec::Static(StaticResponse { template, generated }) => {
                let baseline = if generated {
                    self.resolver.resolve(&template)
                } else {
                    template.clone()
                };
                RouteResponse::Static(StaticRoute {
                    baseline: Arc::new(baseline),
                    template,
                    generated,
                })
            }
            ResponseSpec::Dynamic(f) => RouteResponse::Dynamic(f),
        };

        Route {
            path: descriptor.path,
            method: descriptor.method,
            response,
            query: descriptor.query,
        }
    }
}

impl std::fmt::Debug for RouteRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteRegistry")
            .field("routes", &self.routes.keys().map(ToString::to_string).collect::<Vec<_>>())
            .field("fail_fast", &self.fail_fast)
            .finish()
    }
}

fn validate_path(path: &str) -> DispatchResult<()> {
    if path.trim().is_empty() {
        return Err(DispatchError::invalid_config("route path must not be empty"));
    }
    if !path.starts_with('/') {
        return Err(DispatchError::invalid_config(format!(
            "route path '{path}' must start with '/'"
        )));
    }

    let normalized = normalize_path(path);
    let segments: Vec<&str> = normalized.split('/').collect();
    let mut names = Vec::new();
    for (index, segment) in segments.iter().enumerate() {
        match capture(segment) {
            Some((name, catch_all)) => {
                if name.is_empty() || name.contains(['{', '}', '*']) {
                    return Err(DispatchError::invalid_config(format!(
                        "route path '{path}' has a malformed capture '{segment}'"
                    )));
                }
                if catch_all && index + 1 != segments.len() {
                    return Err(DispatchError::invalid_config(format!(
                        "route path '{path}': catch-all '{segment}' must be the last segment"
                    )));
                }
                if names.contains(&name) {
                    return Err(DispatchError::invalid_config(format!(
                        "route path '{path}' repeats capture '{name}'"
                    )));
                }
                names.push(name);
            }
            None if segment.contains(['{', '}']) => {
                return Err(DispatchError::invalid_config(format!(
                    "route path '{path}' has a malformed capture '{segment}'"
                )));
            }
            None => {}
        }
    }
    Ok(())
}

/// Static templates must be an object or an array.
pub fn validate_template(template: &Value) -> Result<(), String> {
    match template {
        Value::Object(_) | Value::Array(_) => Ok(()),
        other => Err(format!(
            "response must be an object, an array or a function, got {}",
            value_kind(other)
        )),
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
