//! Webhook-driven cache invalidation.
//!
//! Shopify webhooks for catalog changes carry their topic in the
//! `x-shopify-topic` header. A request is acted on only when it carries the
//! shared revalidation secret; the topic then decides which cache tag goes
//! stale.

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::shopify::{CacheTag, TagStore};

/// Topics that invalidate collection data.
pub const COLLECTION_WEBHOOKS: [&str; 3] = [
    "collections/create",
    "collections/delete",
    "collections/update",
];

/// Topics that invalidate product data.
pub const PRODUCT_WEBHOOKS: [&str; 3] = [
    "products/create",
    "products/delete",
    "products/update",
];

/// Topic reported when the header is absent.
pub const UNKNOWN_TOPIC: &str = "unknown";

/// A webhook topic, grouped by what it invalidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookTopic {
    Collections,
    Products,
    Other(String),
}

impl WebhookTopic {
    /// Classify a topic header value. `None` is the unknown topic.
    #[must_use]
    pub fn parse(topic: Option<&str>) -> Self {
        let topic = topic.unwrap_or(UNKNOWN_TOPIC);

        if COLLECTION_WEBHOOKS.contains(&topic) {
            Self::Collections
        } else if PRODUCT_WEBHOOKS.contains(&topic) {
            Self::Products
        } else {
            Self::Other(topic.to_string())
        }
    }

    /// The cache tag this topic invalidates, if any.
    #[must_use]
    pub const fn tag(&self) -> Option<CacheTag> {
        match self {
            Self::Collections => Some(CacheTag::Collections),
            Self::Products => Some(CacheTag::Products),
            Self::Other(_) => None,
        }
    }
}

/// What a revalidation request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevalidationOutcome {
    /// The secret was missing or wrong; nothing was invalidated.
    InvalidSecret,
    /// The topic does not map to cached data.
    IgnoredTopic,
    /// The tag was invalidated.
    Revalidated(CacheTag),
}

/// Authenticate a webhook and invalidate the tag its topic maps to.
pub fn revalidate(
    tags: &TagStore,
    expected_secret: &SecretString,
    provided_secret: Option<&str>,
    topic: Option<&str>,
) -> RevalidationOutcome {
    let authorized = provided_secret
        .filter(|secret| !secret.is_empty())
        .is_some_and(|secret| constant_time_compare(expected_secret.expose_secret(), secret));

    if !authorized {
        warn!("Invalid revalidation secret");
        return RevalidationOutcome::InvalidSecret;
    }

    let topic = WebhookTopic::parse(topic);
    let Some(tag) = topic.tag() else {
        debug!(topic = ?topic, "Ignoring webhook topic");
        return RevalidationOutcome::IgnoredTopic;
    };

    tags.invalidate(tag);
    info!(tag = %tag, "Revalidated cache tag");
    RevalidationOutcome::Revalidated(tag)
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> SecretString {
        SecretString::from("s3cr3t-Value-42")
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("hello", "hello"));
        assert!(constant_time_compare("", ""));
        assert!(!constant_time_compare("hello", "world"));
        assert!(!constant_time_compare("hello", "hello!"));
    }

    #[test]
    fn test_topic_parse() {
        assert_eq!(
            WebhookTopic::parse(Some("collections/update")),
            WebhookTopic::Collections
        );
        assert_eq!(
            WebhookTopic::parse(Some("products/delete")),
            WebhookTopic::Products
        );
        assert_eq!(
            WebhookTopic::parse(Some("orders/create")),
            WebhookTopic::Other("orders/create".to_string())
        );
        assert_eq!(
            WebhookTopic::parse(None),
            WebhookTopic::Other("unknown".to_string())
        );
    }

    #[test]
    fn test_wrong_secret_invalidates_nothing() {
        let tags = TagStore::new();
        let outcome = revalidate(&tags, &secret(), Some("nope"), Some("products/update"));
        assert_eq!(outcome, RevalidationOutcome::InvalidSecret);
        assert_eq!(tags.epoch(CacheTag::Products), 0);

        let outcome = revalidate(&tags, &secret(), None, Some("products/update"));
        assert_eq!(outcome, RevalidationOutcome::InvalidSecret);
    }

    #[test]
    fn test_empty_secret_never_matches() {
        let tags = TagStore::new();
        let outcome = revalidate(
            &tags,
            &SecretString::from(""),
            Some(""),
            Some("products/update"),
        );
        assert_eq!(outcome, RevalidationOutcome::InvalidSecret);
        assert_eq!(tags.epoch(CacheTag::Products), 0);
    }

    #[test]
    fn test_product_topic_invalidates_products() {
        let tags = TagStore::new();
        let outcome = revalidate(
            &tags,
            &secret(),
            Some("s3cr3t-Value-42"),
            Some("products/update"),
        );
        assert_eq!(outcome, RevalidationOutcome::Revalidated(CacheTag::Products));
        assert_eq!(tags.epoch(CacheTag::Products), 1);
        assert_eq!(tags.epoch(CacheTag::Collections), 0);
    }

    #[test]
    fn test_collection_topic_invalidates_collections() {
        let tags = TagStore::new();
        let outcome = revalidate(
            &tags,
            &secret(),
            Some("s3cr3t-Value-42"),
            Some("collections/create"),
        );
        assert_eq!(
            outcome,
            RevalidationOutcome::Revalidated(CacheTag::Collections)
        );
        assert_eq!(tags.epoch(CacheTag::Collections), 1);
    }

    #[test]
    fn test_unknown_topic_is_ignored() {
        let tags = TagStore::new();
        let outcome = revalidate(&tags, &secret(), Some("s3cr3t-Value-42"), None);
        assert_eq!(outcome, RevalidationOutcome::IgnoredTopic);
        for tag in CacheTag::ALL {
            assert_eq!(tags.epoch(tag), 0);
        }
    }
}
