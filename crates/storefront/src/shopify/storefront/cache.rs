//! Tag-aware response cache for Storefront API requests.
//!
//! Every cached response remembers the epoch of each [`CacheTag`] it was
//! fetched under. Invalidating a tag bumps its epoch, which makes every entry
//! carrying that tag stale at once; the next request for it goes upstream.
//!
//! The epoch snapshot is taken *before* the request is sent, so a response
//! that races with an invalidation is never served as fresh.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache;
use serde::Serialize;
use tracing::debug;

use super::transport::RawResponse;

/// Invalidation group for cached responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheTag {
    Collections,
    Products,
    Cart,
}

impl CacheTag {
    /// All tags.
    pub const ALL: [Self; 3] = [Self::Collections, Self::Products, Self::Cart];

    /// Tag name as used in logs and webhooks.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Collections => "collections",
            Self::Products => "products",
            Self::Cart => "cart",
        }
    }
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a request may be answered from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Reuse a prior response until one of its tags is invalidated.
    #[default]
    ForceCache,
    /// Always go upstream and never store the result (mutations).
    NoStore,
}

/// Process-wide invalidation state: one monotonically increasing epoch per tag.
///
/// Shared through an `Arc` between the client and whatever invalidates it
/// (the revalidation webhook). Each invalidation is a single atomic
/// increment, so readers see either the old or the new epoch.
#[derive(Debug, Default)]
pub struct TagStore {
    collections: AtomicU64,
    products: AtomicU64,
    cart: AtomicU64,
}

/// Epochs of a set of tags, captured before a request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagStamp(Vec<(CacheTag, u64)>);

impl TagStore {
    /// Create a store with every tag at epoch zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    const fn counter(&self, tag: CacheTag) -> &AtomicU64 {
        match tag {
            CacheTag::Collections => &self.collections,
            CacheTag::Products => &self.products,
            CacheTag::Cart => &self.cart,
        }
    }

    /// Current epoch of a tag.
    #[must_use]
    pub fn epoch(&self, tag: CacheTag) -> u64 {
        self.counter(tag).load(Ordering::Acquire)
    }

    /// Mark every response carrying `tag` as stale. Returns the new epoch.
    pub fn invalidate(&self, tag: CacheTag) -> u64 {
        let epoch = self.counter(tag).fetch_add(1, Ordering::AcqRel) + 1;
        debug!(tag = %tag, epoch, "Cache tag invalidated");
        epoch
    }

    /// Snapshot the epochs of `tags`.
    #[must_use]
    pub fn stamp(&self, tags: &[CacheTag]) -> TagStamp {
        TagStamp(tags.iter().map(|&tag| (tag, self.epoch(tag))).collect())
    }

    /// Whether no tag in `stamp` has been invalidated since it was taken.
    #[must_use]
    pub fn is_current(&self, stamp: &TagStamp) -> bool {
        stamp.0.iter().all(|&(tag, epoch)| self.epoch(tag) == epoch)
    }
}

#[derive(Clone)]
struct CachedResponse {
    response: Arc<RawResponse>,
    stamp: Arc<TagStamp>,
}

/// Response cache keyed by operation and variables, validated against a [`TagStore`].
#[derive(Clone)]
pub struct ResponseCache {
    entries: Cache<String, CachedResponse>,
    tags: Arc<TagStore>,
}

impl ResponseCache {
    /// Create a cache bounded to 1000 entries with the given time-to-live.
    #[must_use]
    pub fn new(tags: Arc<TagStore>, ttl: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(1000)
            .time_to_live(ttl)
            .build();

        Self { entries, tags }
    }

    /// The tag store this cache validates against.
    #[must_use]
    pub const fn tags(&self) -> &Arc<TagStore> {
        &self.tags
    }

    /// Look up a response, dropping it if any of its tags were invalidated.
    pub async fn get(&self, key: &str) -> Option<Arc<RawResponse>> {
        let entry = self.entries.get(key).await?;

        if self.tags.is_current(&entry.stamp) {
            return Some(entry.response);
        }

        debug!(key = %key, "Cached response is stale");
        self.entries.invalidate(key).await;
        None
    }

    /// Store a response fetched under `stamp`.
    ///
    /// Skipped when a tag was invalidated while the request was in flight.
    pub async fn insert(&self, key: String, stamp: TagStamp, response: Arc<RawResponse>) {
        if !self.tags.is_current(&stamp) {
            debug!(key = %key, "Not caching response invalidated in flight");
            return;
        }

        self.entries
            .insert(
                key,
                CachedResponse {
                    response,
                    stamp: Arc::new(stamp),
                },
            )
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(marker: &str) -> Arc<RawResponse> {
        Arc::new(RawResponse {
            status: 200,
            data: Some(serde_json::json!({ "marker": marker })),
        })
    }

    #[test]
    fn test_invalidate_bumps_only_that_tag() {
        let store = TagStore::new();
        assert_eq!(store.invalidate(CacheTag::Products), 1);
        assert_eq!(store.epoch(CacheTag::Products), 1);
        assert_eq!(store.epoch(CacheTag::Collections), 0);
        assert_eq!(store.epoch(CacheTag::Cart), 0);
    }

    #[test]
    fn test_stamp_goes_stale_after_invalidation() {
        let store = TagStore::new();
        let stamp = store.stamp(&[CacheTag::Collections, CacheTag::Products]);
        assert!(store.is_current(&stamp));

        store.invalidate(CacheTag::Cart);
        assert!(store.is_current(&stamp));

        store.invalidate(CacheTag::Products);
        assert!(!store.is_current(&stamp));
    }

    #[test]
    fn test_empty_stamp_is_always_current() {
        let store = TagStore::new();
        let stamp = store.stamp(&[]);
        for tag in CacheTag::ALL {
            store.invalidate(tag);
        }
        assert!(store.is_current(&stamp));
    }

    #[tokio::test]
    async fn test_cache_hit_until_tag_invalidated() {
        let tags = Arc::new(TagStore::new());
        let cache = ResponseCache::new(Arc::clone(&tags), Duration::from_secs(60));

        let stamp = tags.stamp(&[CacheTag::Products]);
        cache.insert("getProducts:{}".to_string(), stamp, response("a")).await;

        let hit = cache.get("getProducts:{}").await;
        assert_eq!(hit.map(|r| r.data.clone()), Some(Some(serde_json::json!({ "marker": "a" }))));

        tags.invalidate(CacheTag::Products);
        assert!(cache.get("getProducts:{}").await.is_none());
    }

    #[tokio::test]
    async fn test_unrelated_invalidation_keeps_entry() {
        let tags = Arc::new(TagStore::new());
        let cache = ResponseCache::new(Arc::clone(&tags), Duration::from_secs(60));

        let stamp = tags.stamp(&[CacheTag::Collections]);
        cache.insert("getCollections:{}".to_string(), stamp, response("c")).await;

        tags.invalidate(CacheTag::Products);
        assert!(cache.get("getCollections:{}").await.is_some());
    }

    #[tokio::test]
    async fn test_response_invalidated_in_flight_is_not_stored() {
        let tags = Arc::new(TagStore::new());
        let cache = ResponseCache::new(Arc::clone(&tags), Duration::from_secs(60));

        let stamp = tags.stamp(&[CacheTag::Products]);
        tags.invalidate(CacheTag::Products);
        cache.insert("getProduct:{}".to_string(), stamp, response("old")).await;

        assert!(cache.get("getProduct:{}").await.is_none());
    }

    #[test]
    fn test_tag_names() {
        assert_eq!(CacheTag::Collections.to_string(), "collections");
        assert_eq!(CacheTag::Products.to_string(), "products");
        assert_eq!(CacheTag::Cart.to_string(), "cart");
    }
}
