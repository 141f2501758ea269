//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use mock_server::config::MockConfig;
use mock_server::dispatch::{DispatchError, Reporter};
use mock_server::routing::{HttpMethod, RouteRegistry, RouteTable};
use mock_server::{MockServer, TemplateResolver};

/// What a [`RecordingReporter`] saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Registered(String),
    Overridden(String),
    InvalidConfig { route: String, detail: String },
    Internal { route: String, message: String },
}

/// Reporter that keeps every event for later assertions.
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<Event>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn internal_errors(&self) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| matches!(e, Event::Internal { .. }))
            .collect()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl Reporter for RecordingReporter {
    fn route_registered(&self, method: HttpMethod, path: &str) {
        self.push(Event::Registered(format!("{method}:{path}")));
    }

    fn route_overridden(&self, method: HttpMethod, path: &str) {
        self.push(Event::Overridden(format!("{method}:{path}")));
    }

    fn invalid_route_config(&self, method: HttpMethod, path: &str, detail: &str) {
        self.push(Event::InvalidConfig {
            route: format!("{method}:{path}"),
            detail: detail.to_string(),
        });
    }

    fn internal_error(&self, method: HttpMethod, path: &str, error: &DispatchError) {
        self.push(Event::Internal {
            route: format!("{method}:{path}"),
            message: error.to_string(),
        });
    }
}

/// Config with no artificial delay and no built-in routes.
pub fn test_config() -> MockConfig {
    let mut config = MockConfig::default();
    config.middleware.delay_ms = 0;
    config.middleware.request_log = false;
    config.registry.builtin_routes = false;
    config
}

/// Router serving `tables` under `config`, plus the reporter it reports to.
pub fn build_router(config: MockConfig, tables: Vec<RouteTable>) -> (Router, Arc<RecordingReporter>) {
    let reporter = Arc::new(RecordingReporter::default());
    let resolver = Arc::new(TemplateResolver::new(config.generation.clone()));
    let mut registry = RouteRegistry::new(resolver, reporter.clone()).with_fail_fast(config.registry.fail_fast);
    registry.register_tables(tables).unwrap();
    let server = MockServer::new(config, registry);
    (server.router(), reporter)
}

/// Response as seen by a client.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Send one request through `router`. An empty body reads as `null`.
pub async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse { status, headers, body }
}

pub async fn get(router: &Router, uri: &str) -> TestResponse {
    send(router, Method::GET, uri, None).await
}
