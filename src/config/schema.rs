//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the mock server.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::routing::HttpMethod;

/// Root configuration for the mock server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MockConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Request middleware toggles.
    pub middleware: MiddlewareConfig,

    /// Synthetic value generation settings.
    pub generation: GenerationConfig,

    /// Route registration settings.
    pub registry: RegistryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Route definitions declared inline.
    pub routes: Vec<RouteConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Middleware applied before every mock route.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MiddlewareConfig {
    /// Add permissive CORS headers and answer preflight requests.
    pub cors: bool,

    /// Log every request and its outcome.
    pub request_log: bool,

    /// Artificial latency added to every request, in milliseconds (0 disables).
    pub delay_ms: u64,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            cors: true,
            request_log: true,
            delay_ms: 300,
        }
    }
}

/// When static templates are turned into concrete values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResolvePolicy {
    /// Resolve once at registration; every request gets a copy of that baseline.
    #[default]
    Once,
    /// Resolve the template again for every request.
    PerRequest,
}

/// Synthetic value generation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Resolution policy for static templates.
    pub policy: ResolvePolicy,

    /// Number of elements produced by `array.<directive>`.
    pub array_length: usize,

    /// Word count lower bound for a bare `lorem`.
    pub lorem_min_words: u32,

    /// Word count upper bound for a bare `lorem`, and for `lorem.<min>`.
    pub lorem_max_words: u32,

    /// Lower bound for a bare `number`.
    pub number_min: i64,

    /// Upper bound for a bare `number`, and for `number.<min>`.
    pub number_max: i64,

    /// Window used by `past` and `future` without an explicit day count.
    pub date_span_days: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            policy: ResolvePolicy::Once,
            array_length: 5,
            lorem_min_words: 3,
            lorem_max_words: 12,
            number_min: 0,
            number_max: 1000,
            date_span_days: 365,
        }
    }
}

/// Route registration settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Reject routes with unusable responses at startup.
    /// When false they are registered and answer 500 at request time.
    pub fail_fast: bool,

    /// Register the built-in `users` and `products` route modules first.
    pub builtin_routes: bool,

    /// Additional route files, merged in order after inline routes.
    pub include: Vec<PathBuf>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            fail_fast: true,
            builtin_routes: true,
            include: Vec::new(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// A mock route declared in a config file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route path, `:param` or `{param}` captures allowed.
    pub path: String,

    /// HTTP method.
    pub method: HttpMethod,

    /// Response template.
    pub response: serde_json::Value,

    /// Resolve directives in `response` (false serves it verbatim).
    #[serde(default = "default_generated")]
    pub generated: bool,

    /// Query transforms, applied in declaration order.
    #[serde(default)]
    pub query: Vec<QueryTransformConfig>,
}

fn default_generated() -> bool {
    true
}

/// Built-in query transform behaviours available to config-declared routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformAction {
    /// Drop the first `n` elements of the target array.
    Offset,
    /// Keep at most `n` elements of the target array.
    Limit,
    /// Keep target array items whose `key` field equals the value.
    Filter,
    /// Write the value, as a string, at the target.
    Set,
}

/// A query transform declared in a config file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryTransformConfig {
    /// Query parameter name.
    pub name: String,

    /// Behaviour to run.
    pub action: TransformAction,

    /// Dotted path to the value the transform operates on; empty for the root.
    #[serde(default)]
    pub target: String,

    /// Item field compared by `filter`.
    #[serde(default)]
    pub key: Option<String>,
}

/// Contents of a file listed in `registry.include`.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouteFile {
    pub routes: Vec<RouteConfig>,
}
