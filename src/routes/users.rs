//! `users` route module.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::dispatch::DispatchError;
use crate::query::transforms;
use crate::routing::{ResponseSpec, RouteDescriptor, RouteTable};
use crate::template::TemplateResolver;

pub const USER_COUNT: usize = 10;

fn user_template() -> Value {
    json!({
        "id": "uuid",
        "name": "lorem.2.2",
        "bio": "lorem.5.10",
        "active": "boolean",
        "createdAt": "past.90"
    })
}

/// `GET /users` lists users, `POST /users` echoes the body back with a fresh id.
pub fn table(resolver: Arc<TemplateResolver>) -> RouteTable {
    let users: Vec<Value> = (0..USER_COUNT).map(|_| user_template()).collect();

    RouteTable::new("users")
        .with_route(
            RouteDescriptor::get("/users", ResponseSpec::template(json!({ "users": users })))
                .with_query(transforms::limit("limit", "users".to_string()))
                .with_query(transforms::offset("offset", "users".to_string())),
        )
        .with_route(RouteDescriptor::post(
            "/users",
            ResponseSpec::dynamic_sync(move |ctx| {
                let body = match ctx.body {
                    Some(Value::Object(fields)) => fields,
                    Some(_) => return Err(DispatchError::internal("user body must be a JSON object")),
                    None => Map::new(),
                };
                let mut user = resolver.resolve(&user_template());
                if let Value::Object(ref mut generated) = user {
                    generated.extend(body);
                }
                Ok(user)
            }),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;

    #[test]
    fn test_table_routes() {
        let table = table(Arc::new(TemplateResolver::new(GenerationConfig::default())));
        assert_eq!(table.name(), "users");
        let keys: Vec<String> = table.routes().iter().map(|r| r.key().to_string()).collect();
        assert_eq!(keys, vec!["GET:/users", "POST:/users"]);
        assert_eq!(table.routes()[0].query.len(), 2);
    }
}
