//! Shopify Storefront API client implementation.
//!
//! Each operation builds its variables, sends a fixed document through the
//! [`Transport`] with the cache tags it depends on, and reshapes the result.
//! Reads are cached until one of their tags is invalidated; cart mutations
//! always go upstream.

mod cache;
pub mod conversions;
pub mod queries;
mod transport;

pub use cache::{CachePolicy, CacheTag, ResponseCache, TagStamp, TagStore};
pub use transport::{RawResponse, Transport};

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::config::ShopifyStorefrontConfig;
use crate::shopify::types::{
    Cart, CartLineInput, CartLineUpdateInput, Collection, MenuItem, Product,
};
use crate::shopify::{GraphQLError, HIDDEN_COLLECTION_PREFIX, ShopifyError};
use shopfront_core::ProductSortKey;

use conversions::{
    all_collection, flatten_edges, reshape_cart, reshape_collections, reshape_menu,
    reshape_product, reshape_products,
};
use queries::{
    CartMutationPayload, Document, add_to_cart, create_cart, edit_cart_items, get_cart,
    get_collection_products, get_collections, get_menu, get_product,
    get_product_recommendations, get_products, remove_from_cart,
};

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Cheap to clone; clones share the transport, the response cache and the
/// tag store.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    transport: Transport,
    store_url: String,
}

/// Build a variables object, leaving out unset values.
fn variables<const N: usize>(pairs: [(&str, Option<Value>); N]) -> Map<String, Value> {
    pairs
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name.to_string(), v)))
        .collect()
}

fn to_value<T: Serialize>(value: &T, query: &'static str) -> Result<Value, ShopifyError> {
    serde_json::to_value(value).map_err(|e| ShopifyError::Transport {
        cause: format!("Failed to encode variables: {e}"),
        status: 500,
        query,
    })
}

impl StorefrontClient {
    /// Create a client with its own tag store.
    #[must_use]
    pub fn new(config: &ShopifyStorefrontConfig) -> Self {
        Self::with_tag_store(config, Arc::new(TagStore::new()))
    }

    /// Create a client whose cache is invalidated through `tags`.
    #[must_use]
    pub fn with_tag_store(config: &ShopifyStorefrontConfig, tags: Arc<TagStore>) -> Self {
        Self {
            inner: Arc::new(StorefrontClientInner {
                transport: Transport::new(config, tags),
                store_url: config.store_domain.clone(),
            }),
        }
    }

    /// The tag store backing this client's cache.
    #[must_use]
    pub fn tag_store(&self) -> &Arc<TagStore> {
        self.inner.transport.tag_store()
    }

    /// Invalidate every cached response carrying `tag`.
    pub fn revalidate_tag(&self, tag: CacheTag) {
        self.tag_store().invalidate(tag);
    }

    /// Send a read and decode its data.
    async fn query<T: serde::de::DeserializeOwned>(
        &self,
        document: &Document,
        variables: Map<String, Value>,
        tags: &[CacheTag],
    ) -> Result<T, ShopifyError> {
        self.inner
            .transport
            .send(document, variables, tags, CachePolicy::ForceCache)
            .await
    }

    // =========================================================================
    // Menu
    // =========================================================================

    /// Get a navigation menu with storefront-local paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_menu(&self, handle: &str) -> Result<Vec<MenuItem>, ShopifyError> {
        let data: get_menu::ResponseData = self
            .query(
                &get_menu::DOCUMENT,
                variables([("handle", Some(Value::from(handle)))]),
                &[CacheTag::Collections],
            )
            .await?;

        Ok(reshape_menu(data.menu, &self.inner.store_url))
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Search and sort products. Hidden products are left out.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(
        &self,
        query: Option<&str>,
        sort_key: Option<ProductSortKey>,
        reverse: Option<bool>,
    ) -> Result<Vec<Product>, ShopifyError> {
        let data: get_products::ResponseData = self
            .query(
                &get_products::DOCUMENT,
                variables([
                    ("query", query.map(Value::from)),
                    ("sortKey", sort_key.map(|k| Value::from(k.as_products_key()))),
                    ("reverse", reverse.map(Value::from)),
                ]),
                &[CacheTag::Products],
            )
            .await?;

        Ok(reshape_products(flatten_edges(data.products)))
    }

    /// Get a product by its handle.
    ///
    /// Hidden products are returned too; only listings filter them.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_product(&self, handle: &str) -> Result<Option<Product>, ShopifyError> {
        let data: get_product::ResponseData = self
            .query(
                &get_product::DOCUMENT,
                variables([("handle", Some(Value::from(handle)))]),
                &[CacheTag::Products],
            )
            .await?;

        Ok(data
            .product
            .and_then(|product| reshape_product(product, false)))
    }

    /// Get product recommendations.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product_recommendations(
        &self,
        product_id: &str,
    ) -> Result<Vec<Product>, ShopifyError> {
        let data: get_product_recommendations::ResponseData = self
            .query(
                &get_product_recommendations::DOCUMENT,
                variables([("productId", Some(Value::from(product_id)))]),
                &[CacheTag::Products],
            )
            .await?;

        Ok(reshape_products(
            data.product_recommendations.unwrap_or_default(),
        ))
    }

    // =========================================================================
    // Collection Methods
    // =========================================================================

    /// List visible collections, the synthetic "All" collection first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_collections(&self) -> Result<Vec<Collection>, ShopifyError> {
        let data: get_collections::ResponseData = self
            .query(
                &get_collections::DOCUMENT,
                Map::new(),
                &[CacheTag::Collections],
            )
            .await?;

        let mut collections = vec![all_collection(chrono::Utc::now().to_rfc3339())];
        collections.extend(
            reshape_collections(flatten_edges(data.collections))
                .into_iter()
                .filter(|c| !c.handle.starts_with(HIDDEN_COLLECTION_PREFIX)),
        );
        Ok(collections)
    }

    /// Products of one collection. A missing collection has no products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_collection_products(
        &self,
        handle: &str,
        sort_key: Option<ProductSortKey>,
        reverse: Option<bool>,
    ) -> Result<Vec<Product>, ShopifyError> {
        let data: get_collection_products::ResponseData = self
            .query(
                &get_collection_products::DOCUMENT,
                variables([
                    ("handle", Some(Value::from(handle))),
                    (
                        "sortKey",
                        sort_key.map(|k| Value::from(k.as_collection_key())),
                    ),
                    ("reverse", reverse.map(Value::from)),
                ]),
                &[CacheTag::Collections, CacheTag::Products],
            )
            .await?;

        let Some(collection) = data.collection else {
            info!("No collection found for `{handle}`");
            return Ok(vec![]);
        };

        Ok(reshape_products(flatten_edges(collection.products)))
    }

    // =========================================================================
    // Cart Methods
    // =========================================================================

    /// Get a cart. No cart id means no cart, without contacting Shopify.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_cart(&self, cart_id: Option<&str>) -> Result<Option<Cart>, ShopifyError> {
        let Some(cart_id) = cart_id else {
            return Ok(None);
        };

        let data: get_cart::ResponseData = self
            .query(
                &get_cart::DOCUMENT,
                variables([("cartId", Some(Value::from(cart_id)))]),
                &[CacheTag::Cart],
            )
            .await?;

        // Old carts become null after checkout
        if data.cart.is_none() {
            info!(cart_id = %cart_id, "Cart not found");
        }

        Ok(data.cart.map(reshape_cart))
    }

    /// Create a new cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or Shopify rejects the lines.
    #[instrument(skip(self, lines))]
    pub async fn create_cart(&self, lines: &[CartLineInput]) -> Result<Cart, ShopifyError> {
        let document = &create_cart::DOCUMENT;
        let line_items = if lines.is_empty() {
            None
        } else {
            Some(to_value(&lines, document.query)?)
        };

        let data: create_cart::ResponseData = self
            .mutate(document, variables([("lineItems", line_items)]))
            .await?;

        self.finish_mutation(document, data.cart_create)
    }

    /// Add lines to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or Shopify rejects the lines.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn add_to_cart(
        &self,
        cart_id: &str,
        lines: &[CartLineInput],
    ) -> Result<Cart, ShopifyError> {
        let document = &add_to_cart::DOCUMENT;
        let data: add_to_cart::ResponseData = self
            .mutate(
                document,
                variables([
                    ("cartId", Some(Value::from(cart_id))),
                    ("lines", Some(to_value(&lines, document.query)?)),
                ]),
            )
            .await?;

        self.finish_mutation(document, data.cart_lines_add)
    }

    /// Update quantities or merchandise of cart lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or Shopify rejects the lines.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn update_cart(
        &self,
        cart_id: &str,
        lines: &[CartLineUpdateInput],
    ) -> Result<Cart, ShopifyError> {
        let document = &edit_cart_items::DOCUMENT;
        let data: edit_cart_items::ResponseData = self
            .mutate(
                document,
                variables([
                    ("cartId", Some(Value::from(cart_id))),
                    ("lines", Some(to_value(&lines, document.query)?)),
                ]),
            )
            .await?;

        self.finish_mutation(document, data.cart_lines_update)
    }

    /// Remove lines from a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or Shopify rejects the lines.
    #[instrument(skip(self, line_ids), fields(cart_id = %cart_id))]
    pub async fn remove_from_cart(
        &self,
        cart_id: &str,
        line_ids: &[String],
    ) -> Result<Cart, ShopifyError> {
        let document = &remove_from_cart::DOCUMENT;
        let data: remove_from_cart::ResponseData = self
            .mutate(
                document,
                variables([
                    ("cartId", Some(Value::from(cart_id))),
                    ("lineIds", Some(to_value(&line_ids, document.query)?)),
                ]),
            )
            .await?;

        self.finish_mutation(document, data.cart_lines_remove)
    }

    async fn mutate<T: serde::de::DeserializeOwned>(
        &self,
        document: &Document,
        variables: Map<String, Value>,
    ) -> Result<T, ShopifyError> {
        self.inner
            .transport
            .send(document, variables, &[], CachePolicy::NoStore)
            .await
    }

    /// Check a mutation payload for user errors and reshape its cart.
    ///
    /// A successful mutation makes cached carts stale.
    fn finish_mutation(
        &self,
        document: &Document,
        payload: Option<CartMutationPayload>,
    ) -> Result<Cart, ShopifyError> {
        let payload = payload.unwrap_or(CartMutationPayload {
            cart: None,
            user_errors: vec![],
        });

        if let Some(user_error) = payload.user_errors.into_iter().next() {
            return Err(ShopifyError::Application {
                error: GraphQLError {
                    message: user_error.message,
                    locations: vec![],
                    path: user_error
                        .field
                        .unwrap_or_default()
                        .into_iter()
                        .map(Value::String)
                        .collect(),
                },
                query: document.query,
            });
        }

        let Some(cart) = payload.cart else {
            return Err(ShopifyError::Application {
                error: GraphQLError::from_message(format!(
                    "{} returned no cart",
                    document.operation_name
                )),
                query: document.query,
            });
        };

        self.revalidate_tag(CacheTag::Cart);
        Ok(reshape_cart(cart))
    }
}
