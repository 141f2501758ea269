//! `products` route module.

use serde_json::{json, Value};

use crate::dispatch::DispatchError;
use crate::query::transforms;
use crate::routing::{ResponseSpec, RouteDescriptor, RouteTable};

pub const PRODUCT_COUNT: usize = 25;

fn product_template() -> Value {
    json!({
        "id": "uuid",
        "name": "lorem.2.4",
        "description": "lorem.5.10",
        "price": "number.1.100"
    })
}

/// Product listing, detail and deletion.
pub fn table() -> RouteTable {
    let products: Vec<Value> = (0..PRODUCT_COUNT).map(|_| product_template()).collect();

    let mut show = product_template();
    show["company"] = json!({
        "id": "uuid",
        "name": "lorem.2.4",
        "description": "lorem.5.10"
    });

    RouteTable::new("products")
        .with_route(
            RouteDescriptor::get("/products", ResponseSpec::template(json!({ "products": products })))
                .with_query(transforms::offset("offset", "products".to_string()))
                .with_query(transforms::limit("limit", "products".to_string())),
        )
        .with_route(RouteDescriptor::get("/products/:id", ResponseSpec::template(show)))
        .with_route(RouteDescriptor::delete(
            "/products/:id",
            ResponseSpec::dynamic_sync(|ctx| {
                let id = ctx.param("id").unwrap_or_default();
                if uuid::Uuid::parse_str(id).is_err() {
                    return Err(DispatchError::not_found(format!("Product {id} not found")));
                }
                Ok(json!({ "id": id, "deleted": true }))
            }),
        ))
}
