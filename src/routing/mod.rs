//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     RouteTable[] (built-in modules, config routes, included files)
//!     → registry.rs merge_tables (last wins per METHOD:path)
//!     → registry.rs register (validate, resolve baseline)
//!     → Freeze as immutable RouteRegistry
//!
//! Incoming Request (method, path)
//!     → router mounted from the registry
//!     → Return: matched Route
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Closed method set; mounting goes through `HttpMethod::filter`
//! - Static and dynamic responses are separate variants

pub mod method;
pub mod registry;
pub mod route;

pub use method::{HttpMethod, UnknownMethod};
pub use registry::{merge_tables, MergedRoutes, RouteRegistry, RouteTable};
pub use route::{
    normalize_path, path_shape, DynamicResponse, ResponseSpec, Route, RouteDescriptor, RouteKey, RouteResponse,
    StaticResponse, StaticRoute,
};
