//! Revalidation webhook driven through the router.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use shopfront_integration_tests::{
    REVALIDATION_SECRET, app_config, client_for, collection_node, edges, graphql_data, operation,
    product_node,
};
use shopfront_storefront::routes;
use shopfront_storefront::shopify::StorefrontClient;
use shopfront_storefront::state::AppState;
use tower::ServiceExt;
use wiremock::MockServer;

fn app(server: &MockServer) -> (Router, StorefrontClient) {
    let client = client_for(server);
    let state = AppState::with_client(app_config(server), client.clone());
    (routes::routes().with_state(state), client)
}

/// Post to the webhook and return the JSON body.
async fn post_webhook(app: &Router, uri: &str, topic: Option<&str>) -> Value {
    let mut request = Request::builder().method("POST").uri(uri);
    if let Some(topic) = topic {
        request = request.header("x-shopify-topic", topic);
    }

    let response = app
        .clone()
        .oneshot(request.body(Body::empty()).expect("valid request"))
        .await
        .expect("infallible router");

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    serde_json::from_slice(&bytes).expect("JSON body")
}

fn secret_uri() -> String {
    format!("/api/revalidate?secret={REVALIDATION_SECRET}")
}

async fn mount_products(server: &MockServer, expected_calls: u64) {
    operation("getProducts")
        .respond_with(graphql_data(json!({ "products": edges(vec![product_node("a", false)]) })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_wrong_secret_is_acknowledged_without_revalidating() {
    let server = MockServer::start().await;
    mount_products(&server, 1).await;
    let (app, client) = app(&server);

    client.get_products(None, None, None).await.expect("warm cache");

    let body = post_webhook(
        &app,
        "/api/revalidate?secret=wrong",
        Some("products/update"),
    )
    .await;
    assert_eq!(body, json!({ "status": 200 }));

    client.get_products(None, None, None).await.expect("still cached");
}

#[tokio::test]
async fn test_missing_or_malformed_secret_is_acknowledged() {
    let server = MockServer::start().await;
    let (app, _client) = app(&server);

    for uri in ["/api/revalidate", "/api/revalidate?secret", "/api/revalidate?&&=x"] {
        let body = post_webhook(&app, uri, Some("products/update")).await;
        assert_eq!(body, json!({ "status": 200 }), "uri: {uri}");
    }
}

#[tokio::test]
async fn test_product_update_revalidates_products() {
    let server = MockServer::start().await;
    mount_products(&server, 2).await;
    let (app, client) = app(&server);

    client.get_products(None, None, None).await.expect("warm cache");

    let body = post_webhook(&app, &secret_uri(), Some("products/update")).await;
    assert_eq!(body.get("status"), Some(&json!(200)));
    assert_eq!(body.get("revalidated"), Some(&json!(true)));
    assert!(body.get("now").and_then(Value::as_i64).is_some_and(|now| now > 0));

    client.get_products(None, None, None).await.expect("refetched");
}

#[tokio::test]
async fn test_collection_topic_leaves_products_cached() {
    let server = MockServer::start().await;
    mount_products(&server, 1).await;

    operation("getCollections")
        .respond_with(graphql_data(json!({ "collections": edges(vec![collection_node("shirts")]) })))
        .expect(2)
        .mount(&server)
        .await;

    let (app, client) = app(&server);

    client.get_products(None, None, None).await.expect("warm products");
    client.get_collections().await.expect("warm collections");

    let body = post_webhook(&app, &secret_uri(), Some("collections/delete")).await;
    assert_eq!(body.get("revalidated"), Some(&json!(true)));

    client.get_products(None, None, None).await.expect("cached products");
    client.get_collections().await.expect("refetched collections");
}

#[tokio::test]
async fn test_unrelated_topic_is_ignored() {
    let server = MockServer::start().await;
    mount_products(&server, 1).await;
    let (app, client) = app(&server);

    client.get_products(None, None, None).await.expect("warm cache");

    for topic in [Some("orders/create"), None] {
        let body = post_webhook(&app, &secret_uri(), topic).await;
        assert_eq!(body, json!({ "status": 200 }));
    }

    client.get_products(None, None, None).await.expect("still cached");
}
