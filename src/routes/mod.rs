//! Built-in route modules, registered before any config-declared routes.

pub mod products;
pub mod users;

use std::sync::Arc;

use crate::routing::RouteTable;
use crate::template::TemplateResolver;

/// Built-in tables in registration order.
pub fn builtin(resolver: &Arc<TemplateResolver>) -> Vec<RouteTable> {
    vec![users::table(resolver.clone()), products::table()]
}
