//! Startup orchestration.
//!
//! Route sources are merged in a fixed order: built-in modules, inline
//! `[[routes]]`, then every `registry.include` file. Any startup error is
//! fatal.

use std::sync::Arc;

use thiserror::Error;

use crate::config::{load_route_file, ConfigError, MockConfig, RouteConfig};
use crate::dispatch::{DispatchError, Reporter};
use crate::routes;
use crate::routing::{RouteDescriptor, RouteRegistry, RouteTable};
use crate::template::TemplateResolver;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("route registration failed: {0}")]
    Routes(#[from] DispatchError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Build the route registry described by `config`.
pub fn build_registry(config: &MockConfig, reporter: Arc<dyn Reporter>) -> Result<RouteRegistry, StartupError> {
    let resolver = Arc::new(TemplateResolver::new(config.generation.clone()));

    let mut tables = Vec::new();
    if config.registry.builtin_routes {
        tables.extend(routes::builtin(&resolver));
    }
    tables.push(config_table("config", &config.routes));
    for path in &config.registry.include {
        let file = load_route_file(path)?;
        tables.push(config_table(&path.display().to_string(), &file.routes));
    }

    let mut registry = RouteRegistry::new(resolver, reporter).with_fail_fast(config.registry.fail_fast);
    registry.register_tables(tables)?;

    tracing::info!(
        routes = registry.len(),
        policy = ?config.generation.policy,
        "Route registry built"
    );
    Ok(registry)
}

fn config_table(name: &str, routes: &[RouteConfig]) -> RouteTable {
    let mut table = RouteTable::new(name);
    table.extend(routes.iter().map(RouteDescriptor::from));
    table
}
