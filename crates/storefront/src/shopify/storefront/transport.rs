//! HTTP transport for Storefront API documents.
//!
//! One POST per document. The JSON envelope is classified into
//! [`ShopifyError::Transport`] (no usable response) or
//! [`ShopifyError::Application`] (GraphQL `errors`), and successful responses
//! go through the tag-aware [`ResponseCache`] once they decode.

use std::sync::Arc;
use std::time::Duration;

use graphql_client::{QueryBody, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, error};

use crate::config::ShopifyStorefrontConfig;
use crate::shopify::ShopifyError;

use super::cache::{CachePolicy, CacheTag, ResponseCache, TagStore};
use super::queries::Document;

/// Header carrying the public Storefront access token.
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// Status reported when no HTTP response was received.
const NO_RESPONSE_STATUS: u16 = 500;

/// How much of an unexpected body ends up in logs.
const LOGGED_BODY_CHARS: usize = 500;

/// A successful GraphQL response whose `data` has not been decoded yet.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    /// HTTP status of the response.
    pub status: u16,
    /// The `data` member, if present.
    pub data: Option<Value>,
}

impl RawResponse {
    /// Decode `data` into the operation's response shape.
    ///
    /// # Errors
    ///
    /// Returns a transport error if `data` is missing or has the wrong shape.
    pub fn decode<T: DeserializeOwned>(&self, query: &'static str) -> Result<T, ShopifyError> {
        let Some(data) = &self.data else {
            error!("Shopify GraphQL response has no data and no errors");
            return Err(ShopifyError::Transport {
                cause: "No data in response".to_string(),
                status: self.status,
                query,
            });
        };

        T::deserialize(data).map_err(|e| {
            error!(error = %e, "Shopify response data has an unexpected shape");
            ShopifyError::Transport {
                cause: format!("Unexpected response data: {e}"),
                status: self.status,
                query,
            }
        })
    }
}

/// Authenticated, cached POST transport for one Storefront endpoint.
#[derive(Clone)]
pub struct Transport {
    client: reqwest::Client,
    endpoint: String,
    access_token: SecretString,
    timeout: Duration,
    cache: ResponseCache,
}

impl Transport {
    /// Create a transport whose cache validates against `tags`.
    #[must_use]
    pub fn new(config: &ShopifyStorefrontConfig, tags: Arc<TagStore>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint(),
            access_token: config.access_token.clone(),
            timeout: config.request_timeout,
            cache: ResponseCache::new(tags, config.cache_ttl),
        }
    }

    /// The tag store consulted by the response cache.
    #[must_use]
    pub const fn tag_store(&self) -> &Arc<TagStore> {
        self.cache.tags()
    }

    /// Send a document and decode its data, answering from the cache when
    /// `policy` allows it.
    ///
    /// Only responses whose data decodes into `T` are cached.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Transport`] when no usable response arrives and
    /// [`ShopifyError::Application`] when the response carries GraphQL errors.
    pub async fn send<T: DeserializeOwned>(
        &self,
        document: &Document,
        variables: Map<String, Value>,
        tags: &[CacheTag],
        policy: CachePolicy,
    ) -> Result<T, ShopifyError> {
        if policy == CachePolicy::NoStore {
            return self
                .fetch(document, variables)
                .await?
                .decode(document.query);
        }

        let key = format!(
            "{}:{}",
            document.operation_name,
            Value::Object(variables.clone())
        );

        if let Some(response) = self.cache.get(&key).await {
            debug!(operation = document.operation_name, "Cache hit");
            return response.decode(document.query);
        }

        let stamp = self.cache.tags().stamp(tags);
        let response = self.fetch(document, variables).await?;
        let decoded = response.decode(document.query)?;
        self.cache.insert(key, stamp, Arc::new(response)).await;

        Ok(decoded)
    }

    async fn fetch(
        &self,
        document: &Document,
        variables: Map<String, Value>,
    ) -> Result<RawResponse, ShopifyError> {
        let query = document.query;
        let body = QueryBody {
            variables,
            query,
            operation_name: document.operation_name,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCESS_TOKEN_HEADER, self.access_token.expose_secret())
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| request_error(&e, query))?;

        let status = response.status();

        // Read as text first so unparseable bodies can be logged
        let text = response
            .text()
            .await
            .map_err(|e| request_error(&e, query))?;

        classify(status, &text, query)
    }
}

fn request_error(e: &reqwest::Error, query: &'static str) -> ShopifyError {
    error!(error = %e, "Shopify request failed");
    ShopifyError::Transport {
        cause: e.to_string(),
        status: e.status().map_or(NO_RESPONSE_STATUS, |s| s.as_u16()),
        query,
    }
}

fn truncated(text: &str) -> String {
    text.chars().take(LOGGED_BODY_CHARS).collect()
}

/// Turn a status and body into a [`RawResponse`] or the matching error.
fn classify(
    status: reqwest::StatusCode,
    text: &str,
    query: &'static str,
) -> Result<RawResponse, ShopifyError> {
    let code = status.as_u16();

    let json: Value = serde_json::from_str(text).map_err(|e| {
        error!(
            error = %e,
            status = code,
            body = %truncated(text),
            "Failed to parse Shopify GraphQL response"
        );
        ShopifyError::Transport {
            cause: e.to_string(),
            status: code,
            query,
        }
    })?;

    // Shopify reports auth and throttling failures as `{"errors": "..."}`
    if let Some(Value::String(message)) = json.get("errors") {
        error!(status = code, message = %message, "Shopify rejected the request");
        return Err(ShopifyError::Transport {
            cause: message.clone(),
            status: code,
            query,
        });
    }

    let envelope: Response<Value> = serde_json::from_value(json).map_err(|e| {
        error!(error = %e, status = code, body = %truncated(text), "Unexpected Shopify response body");
        ShopifyError::Transport {
            cause: format!("Unexpected response body: {e}"),
            status: code,
            query,
        }
    })?;

    if let Some(first) = envelope.errors.and_then(|errors| errors.into_iter().next()) {
        debug!(error = ?first, "GraphQL errors in response");
        return Err(ShopifyError::Application {
            error: first.into(),
            query,
        });
    }

    if !status.is_success() {
        error!(status = code, body = %truncated(text), "Shopify API returned non-success status");
        return Err(ShopifyError::Transport {
            cause: format!("HTTP {status}"),
            status: code,
            query,
        });
    }

    Ok(RawResponse {
        status: code,
        data: envelope.data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    const DOC: &str = "query getMenu { menu { items { title } } }";

    #[test]
    fn test_classify_success() {
        let response = classify(StatusCode::OK, r#"{"data":{"menu":null}}"#, DOC)
            .expect("successful response");
        assert_eq!(response.status, 200);
        assert_eq!(response.data, Some(serde_json::json!({ "menu": null })));
    }

    #[test]
    fn test_classify_graphql_errors_use_first_error() {
        let body = r#"{
            "errors": [
                { "message": "Field 'foo' doesn't exist", "locations": [{ "line": 1, "column": 9 }] },
                { "message": "second" }
            ]
        }"#;

        let err = classify(StatusCode::OK, body, DOC).expect_err("application error");
        match err {
            ShopifyError::Application { error, query } => {
                assert_eq!(error.message, "Field 'foo' doesn't exist");
                assert_eq!(error.locations.len(), 1);
                assert_eq!(query, DOC);
            }
            other @ ShopifyError::Transport { .. } => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_classify_malformed_json_keeps_http_status() {
        let err = classify(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>", DOC)
            .expect_err("transport error");
        assert!(matches!(err, ShopifyError::Transport { status: 502, .. }));
        assert_eq!(err.query(), DOC);
    }

    #[test]
    fn test_classify_string_errors_is_transport() {
        let err = classify(
            StatusCode::UNAUTHORIZED,
            r#"{"errors":"[API] Invalid API key or access token"}"#,
            DOC,
        )
        .expect_err("transport error");
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.message(), "[API] Invalid API key or access token");
    }

    #[test]
    fn test_classify_non_success_without_errors() {
        let err = classify(StatusCode::SERVICE_UNAVAILABLE, r#"{"data":null}"#, DOC)
            .expect_err("transport error");
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn test_empty_errors_array_is_success() {
        let response = classify(StatusCode::OK, r#"{"data":{"menu":null},"errors":[]}"#, DOC)
            .expect("successful response");
        assert!(response.data.is_some());
    }

    #[test]
    fn test_decode_missing_data() {
        let response = RawResponse {
            status: 200,
            data: None,
        };
        let err = response
            .decode::<serde_json::Value>(DOC)
            .expect_err("missing data");
        assert!(matches!(err, ShopifyError::Transport { status: 200, .. }));
    }

    #[test]
    fn test_decode_wrong_shape() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Shape {
            menu: Vec<String>,
        }

        let response = RawResponse {
            status: 200,
            data: Some(serde_json::json!({ "menu": 42 })),
        };
        let err = response.decode::<Shape>(DOC).expect_err("wrong shape");
        assert!(err.message().starts_with("Unexpected response data"));
    }
}
