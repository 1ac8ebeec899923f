//! Shopify webhook endpoint for cache revalidation.
//!
//! Always answers 200 so Shopify never retries or disables the webhook; the
//! body says whether anything was invalidated.

use axum::{
    Json,
    extract::{RawQuery, State},
    http::HeaderMap,
};
use serde::Serialize;
use tracing::instrument;

use crate::services::{RevalidationOutcome, revalidate as revalidate_tags};
use crate::state::AppState;

/// Header carrying the webhook topic.
const TOPIC_HEADER: &str = "x-shopify-topic";

/// Webhook response body.
#[derive(Debug, Serialize)]
pub struct RevalidationResponse {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revalidated: Option<bool>,
    /// Milliseconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub now: Option<i64>,
}

impl RevalidationResponse {
    const fn ok() -> Self {
        Self {
            status: 200,
            revalidated: None,
            now: None,
        }
    }
}

/// Find `secret` in a query string. Malformed input just yields no secret.
fn secret_param(query: Option<&str>) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == "secret")
        .map(|(_, value)| value.into_owned())
}

/// Handle a catalog webhook.
#[instrument(skip_all)]
pub async fn revalidate(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Json<RevalidationResponse> {
    let secret = secret_param(query.as_deref());
    let topic = headers.get(TOPIC_HEADER).and_then(|v| v.to_str().ok());

    let outcome = revalidate_tags(
        state.tag_store(),
        &state.config().shopify.revalidation_secret,
        secret.as_deref(),
        topic,
    );

    match outcome {
        RevalidationOutcome::Revalidated(_) => Json(RevalidationResponse {
            status: 200,
            revalidated: Some(true),
            now: Some(chrono::Utc::now().timestamp_millis()),
        }),
        RevalidationOutcome::InvalidSecret | RevalidationOutcome::IgnoredTopic => {
            Json(RevalidationResponse::ok())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_param() {
        assert_eq!(secret_param(Some("secret=abc")), Some("abc".to_string()));
        assert_eq!(
            secret_param(Some("x=1&secret=a%2Bb")),
            Some("a+b".to_string())
        );
        assert_eq!(secret_param(Some("other=1")), None);
        assert_eq!(secret_param(None), None);
        assert_eq!(secret_param(Some("%%%&&==")), None);
    }

    #[test]
    fn test_plain_response_omits_optional_fields() {
        let body = serde_json::to_value(RevalidationResponse::ok()).expect("serializable");
        assert_eq!(body, serde_json::json!({ "status": 200 }));
    }
}
