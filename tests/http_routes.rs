//! End-to-end behaviour of mounted routes.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::{build_router, get, send, test_config, Event};
use mock_server::dispatch::DispatchError;
use mock_server::query::transforms;
use mock_server::routing::{ResponseSpec, RouteDescriptor, RouteTable};

fn items_table() -> RouteTable {
    let items: Vec<Value> = (0..20).map(|i| json!({ "index": i, "id": "uuid" })).collect();
    RouteTable::new("items").with_route(
        RouteDescriptor::get("/items", ResponseSpec::template(json!({ "items": items })))
            .with_query(transforms::offset("offset", "items".to_string()))
            .with_query(transforms::limit("limit", "items".to_string())),
    )
}

fn indices(body: &Value) -> Vec<i64> {
    body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["index"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_query_transforms_do_not_leak_between_requests() {
    let (router, _) = build_router(test_config(), vec![items_table()]);

    let first = get(&router, "/items?offset=10").await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(indices(&first.body), (10..20).collect::<Vec<_>>());

    let second = get(&router, "/items?limit=5").await;
    assert_eq!(indices(&second.body), vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn test_transforms_run_in_declaration_order() {
    let (router, _) = build_router(test_config(), vec![items_table()]);
    let response = get(&router, "/items?offset=10&limit=5").await;
    assert_eq!(indices(&response.body), vec![10, 11, 12, 13, 14]);
}

#[tokio::test]
async fn test_baseline_is_stable_across_requests() {
    let (router, _) = build_router(test_config(), vec![items_table()]);
    let a = get(&router, "/items").await;
    let b = get(&router, "/items").await;
    assert_eq!(a.body, b.body);
}

#[tokio::test]
async fn test_status_follows_method() {
    let table = RouteTable::new("status")
        .with_route(RouteDescriptor::get("/thing", ResponseSpec::literal(json!({ "ok": true }))))
        .with_route(RouteDescriptor::post("/thing", ResponseSpec::literal(json!({ "ok": true }))))
        .with_route(RouteDescriptor::put("/thing", ResponseSpec::literal(json!({ "ok": true }))))
        .with_route(RouteDescriptor::patch("/thing", ResponseSpec::literal(json!({ "ok": true }))))
        .with_route(RouteDescriptor::delete("/thing", ResponseSpec::literal(json!({ "ok": true }))));
    let (router, _) = build_router(test_config(), vec![table]);

    for (method, status) in [
        (Method::GET, StatusCode::OK),
        (Method::POST, StatusCode::CREATED),
        (Method::PUT, StatusCode::OK),
        (Method::PATCH, StatusCode::OK),
        (Method::DELETE, StatusCode::NO_CONTENT),
    ] {
        let response = send(&router, method.clone(), "/thing", None).await;
        assert_eq!(response.status, status, "{method}");
    }
}

#[tokio::test]
async fn test_not_found_from_handler_is_not_reported() {
    let table = RouteTable::new("orders").with_route(RouteDescriptor::get(
        "/orders/:id",
        ResponseSpec::dynamic_sync(|ctx| {
            let id = ctx.param("id").unwrap_or_default().to_string();
            Err(DispatchError::not_found(format!("Order {id} not found")))
        }),
    ));
    let (router, reporter) = build_router(test_config(), vec![table]);

    let response = get(&router, "/orders/99").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, json!({ "error": "Order 99 not found" }));
    assert!(reporter.internal_errors().is_empty());
}

#[tokio::test]
async fn test_scalar_response_fails_per_request_when_lenient() {
    let mut config = test_config();
    config.registry.fail_fast = false;
    let table = RouteTable::new("broken").with_route(RouteDescriptor::get(
        "/broken",
        ResponseSpec::template(json!("hello")),
    ));
    let (router, reporter) = build_router(config, vec![table]);

    let response = get(&router, "/broken").await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.body,
        json!({ "error": "Invalid route configuration: response type" })
    );

    let invalid: Vec<Event> = reporter
        .events()
        .into_iter()
        .filter(|e| matches!(e, Event::InvalidConfig { .. }))
        .collect();
    assert!(!invalid.is_empty());
    assert!(invalid
        .iter()
        .all(|e| matches!(e, Event::InvalidConfig { route, .. } if route == "GET:/broken")));
}

#[tokio::test]
async fn test_handler_failure_is_internal_error() {
    let table = RouteTable::new("fail").with_route(RouteDescriptor::get(
        "/fail",
        ResponseSpec::dynamic(|_ctx| async { Err(DispatchError::internal("database exploded")) }),
    ));
    let (router, reporter) = build_router(test_config(), vec![table]);

    let response = get(&router, "/fail").await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, json!({ "error": "Internal Server Error" }));

    let errors = reporter.internal_errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(&errors[0], Event::Internal { route, .. } if route == "GET:/fail"));
}

#[tokio::test]
async fn test_dynamic_route_sees_params_query_and_body() {
    let table = RouteTable::new("echo").with_route(RouteDescriptor::post(
        "/echo/{name}",
        ResponseSpec::dynamic_sync(|ctx| {
            Ok(json!({
                "name": ctx.param("name"),
                "tag": ctx.query.first("tag"),
                "body": ctx.body,
            }))
        }),
    ));
    let (router, _) = build_router(test_config(), vec![table]);

    let response = send(&router, Method::POST, "/echo/ada?tag=x", Some(json!({ "n": 1 }))).await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body, json!({ "name": "ada", "tag": "x", "body": { "n": 1 } }));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (router, _) = build_router(test_config(), vec![items_table()]);

    let response = get(&router, "/nowhere").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, json!({ "error": "Route not found" }));

    let wrong_method = send(&router, Method::PATCH, "/items", None).await;
    assert_eq!(wrong_method.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_preflight_and_headers() {
    let (router, _) = build_router(test_config(), vec![items_table()]);

    let preflight = send(&router, Method::OPTIONS, "/items", None).await;
    assert_eq!(preflight.status, StatusCode::NO_CONTENT);
    assert_eq!(preflight.headers["access-control-allow-origin"], "*");
    assert_eq!(
        preflight.headers["access-control-allow-methods"],
        "GET, POST, PUT, DELETE, OPTIONS"
    );
    assert_eq!(
        preflight.headers["access-control-allow-headers"],
        "Content-Type, Authorization"
    );

    let response = get(&router, "/items").await;
    assert_eq!(response.headers["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_cors_disabled() {
    let mut config = test_config();
    config.middleware.cors = false;
    let (router, _) = build_router(config, vec![items_table()]);

    let response = get(&router, "/items").await;
    assert!(response.headers.get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn test_request_id_is_assigned() {
    let (router, _) = build_router(test_config(), vec![items_table()]);
    let response = get(&router, "/items").await;
    assert!(response.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_later_table_overrides_earlier() {
    let first = RouteTable::new("first")
        .with_route(RouteDescriptor::get("/who", ResponseSpec::literal(json!({ "from": "first" }))));
    let second = RouteTable::new("second")
        .with_route(RouteDescriptor::get("/who", ResponseSpec::literal(json!({ "from": "second" }))));
    let (router, reporter) = build_router(test_config(), vec![first, second]);

    let response = get(&router, "/who").await;
    assert_eq!(response.body, json!({ "from": "second" }));
    assert!(reporter.events().contains(&Event::Overridden("GET:/who".to_string())));
}

#[tokio::test]
async fn test_delay_is_applied() {
    let mut config = test_config();
    config.middleware.delay_ms = 50;
    let (router, _) = build_router(config, vec![items_table()]);

    let start = std::time::Instant::now();
    get(&router, "/items").await;
    assert!(start.elapsed() >= std::time::Duration::from_millis(50));
}

#[tokio::test]
async fn test_capture_spellings_override_each_other() {
    let builtin = RouteTable::new("builtin")
        .with_route(RouteDescriptor::get("/things/:id", ResponseSpec::literal(json!({ "from": "builtin" }))));
    let config = RouteTable::new("config")
        .with_route(RouteDescriptor::get("/things/{id}", ResponseSpec::literal(json!({ "from": "config" }))));
    let (router, reporter) = build_router(test_config(), vec![builtin, config]);

    let response = get(&router, "/things/42").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "from": "config" }));
    assert!(reporter
        .events()
        .contains(&Event::Overridden("GET:/things/{id}".to_string())));
}
