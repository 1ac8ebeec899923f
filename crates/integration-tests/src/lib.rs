//! Integration tests for Shopfront.
//!
//! Shopify is replaced by a `wiremock` server speaking the Storefront GraphQL
//! envelope; the webhook router is driven in-process with `tower::ServiceExt`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! This library holds the shared fixtures.

use std::net::{IpAddr, Ipv4Addr};

use serde_json::{Value, json};
use shopfront_storefront::config::{ShopifyStorefrontConfig, StorefrontConfig};
use shopfront_storefront::shopify::{HIDDEN_PRODUCT_TAG, StorefrontClient};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

/// Path the client posts every document to.
pub const GRAPHQL_PATH: &str = "/api/2025-01/graphql.json";

/// Access token configured on test clients.
pub const ACCESS_TOKEN: &str = "test-storefront-token";

/// Revalidation secret configured on test apps.
pub const REVALIDATION_SECRET: &str = "Wh7-Qz!pL2x9-kR4";

/// Storefront config pointing at a mock server.
#[must_use]
pub fn shopify_config(server: &MockServer) -> ShopifyStorefrontConfig {
    ShopifyStorefrontConfig::new(&server.uri(), ACCESS_TOKEN, REVALIDATION_SECRET)
}

/// Full app config pointing at a mock server.
#[must_use]
pub fn app_config(server: &MockServer) -> StorefrontConfig {
    StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        shopify: shopify_config(server),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Client talking to a mock server.
#[must_use]
pub fn client_for(server: &MockServer) -> StorefrontClient {
    StorefrontClient::new(&shopify_config(server))
}

/// Mock matching one GraphQL operation by name.
#[must_use]
pub fn operation(name: &str) -> MockBuilder {
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({ "operationName": name })))
}

/// A 200 response with `data`.
#[must_use]
pub fn graphql_data(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "data": data }))
}

/// A `Connection` of nodes.
#[must_use]
pub fn edges(nodes: Vec<Value>) -> Value {
    json!({ "edges": nodes.into_iter().map(|node| json!({ "node": node })).collect::<Vec<_>>() })
}

fn money(amount: &str) -> Value {
    json!({ "amount": amount, "currencyCode": "USD" })
}

/// A product node as returned by the `product` fragment.
#[must_use]
pub fn product_node(handle: &str, hidden: bool) -> Value {
    let tags = if hidden {
        vec!["featured", HIDDEN_PRODUCT_TAG]
    } else {
        vec!["featured"]
    };

    json!({
        "id": format!("gid://shopify/Product/{handle}"),
        "handle": handle,
        "availableForSale": true,
        "title": format!("Product {handle}"),
        "description": "",
        "descriptionHtml": "",
        "options": [],
        "priceRange": { "maxVariantPrice": money("10.0"), "minVariantPrice": money("10.0") },
        "variants": edges(vec![json!({
            "id": format!("gid://shopify/ProductVariant/{handle}"),
            "title": "Default Title",
            "availableForSale": true,
            "selectedOptions": [{ "name": "Title", "value": "Default Title" }],
            "price": money("10.0")
        })]),
        "featuredImage": null,
        "images": edges(vec![json!({
            "url": format!("https://cdn.shopify.com/files/{handle}.jpg"),
            "altText": null,
            "width": 640,
            "height": 480
        })]),
        "seo": { "title": null, "description": null },
        "tags": tags,
        "updatedAt": "2024-05-01T12:00:00Z"
    })
}

/// A collection node as returned by the `collection` fragment.
#[must_use]
pub fn collection_node(handle: &str) -> Value {
    json!({
        "handle": handle,
        "title": handle,
        "description": "",
        "seo": { "title": null, "description": null },
        "updatedAt": "2024-05-01T12:00:00Z"
    })
}

/// A cart node as returned by the `cart` fragment, without a tax amount.
#[must_use]
pub fn cart_node(id: &str, quantity: i64) -> Value {
    json!({
        "id": id,
        "checkoutUrl": format!("https://shop.example/cart/c/{id}"),
        "totalQuantity": quantity,
        "cost": { "subtotalAmount": money("10.0"), "totalAmount": money("10.0") },
        "lines": edges(vec![json!({
            "id": "gid://shopify/CartLine/1",
            "quantity": quantity,
            "cost": { "totalAmount": money("10.0") },
            "merchandise": {
                "id": "gid://shopify/ProductVariant/shirt",
                "title": "Default Title",
                "selectedOptions": [],
                "product": {
                    "id": "gid://shopify/Product/shirt",
                    "handle": "shirt",
                    "title": "Shirt",
                    "featuredImage": null
                }
            }
        })])
    })
}
