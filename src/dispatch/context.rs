//! Per-request input handed to the dispatcher.

use std::collections::HashMap;

use axum::http::HeaderMap;
use serde_json::Value;

use crate::query::QueryParams;
use crate::routing::HttpMethod;

/// What a dynamic response function can see of the request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Method the request arrived with.
    pub method: HttpMethod,
    /// Concrete request path (not the route pattern).
    pub path: String,
    /// Path captures, keyed by parameter name.
    pub params: HashMap<String, String>,
    /// Decoded query parameters.
    pub query: QueryParams,
    /// Request headers.
    pub headers: HeaderMap,
    /// JSON body, when the request carried one that parsed.
    pub body: Option<Value>,
}

impl RequestContext {
    /// A context with no params, query, headers or body.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: HashMap::new(),
            query: QueryParams::default(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Path capture by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}
