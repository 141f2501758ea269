//! Configurable mock HTTP server library.

pub mod config;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod query;
pub mod routes;
pub mod routing;
pub mod template;

pub use config::schema::MockConfig;
pub use dispatch::{DispatchError, Dispatcher, Reporter, RequestContext, TracingReporter};
pub use http::MockServer;
pub use lifecycle::{build_registry, Shutdown, ShutdownListener};
pub use routing::{ResponseSpec, RouteDescriptor, RouteRegistry, RouteTable};
pub use template::TemplateResolver;
