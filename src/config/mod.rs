//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → MockConfig (validated, immutable)
//!     → startup builds the route registry from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_route_file, ConfigError};
pub use schema::{
    GenerationConfig, ListenerConfig, LogFormat, MiddlewareConfig, MockConfig, ObservabilityConfig,
    QueryTransformConfig, RegistryConfig, ResolvePolicy, RouteConfig, RouteFile, TransformAction,
};
pub use validation::{validate_config, validate_routes, ValidationError};
