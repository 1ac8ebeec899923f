//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::shopify::{StorefrontClient, TagStore};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The webhook handler and the storefront client
/// share one [`TagStore`], so invalidations reach the client's cache.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    storefront: StorefrontClient,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let storefront = StorefrontClient::new(&config.shopify);
        Self::with_client(config, storefront)
    }

    /// Create state around an existing client.
    #[must_use]
    pub fn with_client(config: StorefrontConfig, storefront: StorefrontClient) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, storefront }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Shopify Storefront API client.
    #[must_use]
    pub fn storefront(&self) -> &StorefrontClient {
        &self.inner.storefront
    }

    /// The process-wide cache tag store.
    #[must_use]
    pub fn tag_store(&self) -> &TagStore {
        self.inner.storefront.tag_store()
    }
}
