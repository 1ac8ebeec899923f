//! Shopify Storefront API client.
//!
//! # Architecture
//!
//! - Hand-written GraphQL documents, framed with `graphql_client::QueryBody`
//! - Shopify is source of truth - NO local sync, direct API calls
//! - In-memory response cache via `moka`, invalidated per [`CacheTag`]
//!
//! # Layers
//!
//! - **Transport** - one POST per document, classifies failures into
//!   [`ShopifyError::Transport`] and [`ShopifyError::Application`]
//! - **Conversions** - flatten `edges { node }` lists and fill in derived fields
//! - **Operations** - [`StorefrontClient`] methods (menu, products, collections, cart)
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_storefront::shopify::StorefrontClient;
//!
//! let client = StorefrontClient::new(&config.shopify);
//!
//! // Get a product
//! let product = client.get_product("my-product").await?;
//!
//! // Create a cart and add items
//! let cart = client.create_cart(&[]).await?;
//! let cart = client.add_to_cart(&cart.id, &[CartLineInput {
//!     merchandise_id: product.variants[0].id.clone(),
//!     quantity: 1,
//! }]).await?;
//! ```

mod storefront;
pub mod types;

pub use storefront::queries;
pub use storefront::{
    CachePolicy, CacheTag, RawResponse, ResponseCache, StorefrontClient, TagStamp, TagStore,
    Transport, conversions,
};
pub use types::*;

use thiserror::Error;

/// Products carrying this tag are left out of every listing.
pub const HIDDEN_PRODUCT_TAG: &str = "nextjs-frontend-hidden";

/// Collections whose handle starts with this prefix are left out of listings.
pub const HIDDEN_COLLECTION_PREFIX: &str = "hidden";

/// Errors that can occur when interacting with the Storefront API.
///
/// Both variants keep the GraphQL document that was sent so failures can be
/// traced back to the operation that caused them.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// No usable GraphQL response: connection failure, timeout, non-success
    /// status or a body that is not the expected JSON.
    #[error("Shopify transport error (status {status}): {cause}")]
    Transport {
        cause: String,
        status: u16,
        query: &'static str,
    },

    /// Shopify answered with a GraphQL error payload or mutation user errors.
    #[error("Shopify API error: {}", format_graphql_error(.error))]
    Application {
        error: GraphQLError,
        query: &'static str,
    },
}

impl ShopifyError {
    /// The GraphQL document of the failed request.
    #[must_use]
    pub const fn query(&self) -> &'static str {
        match self {
            Self::Transport { query, .. } | Self::Application { query, .. } => *query,
        }
    }

    /// HTTP-like status of a transport failure (`500` when none was received).
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            Self::Application { .. } => None,
        }
    }

    /// The failure cause or upstream error message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Transport { cause, .. } => cause,
            Self::Application { error, .. } => &error.message,
        }
    }
}

/// A GraphQL error returned by the Shopify API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

impl GraphQLError {
    /// An error with only a message.
    #[must_use]
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: vec![],
            path: vec![],
        }
    }
}

impl From<graphql_client::Error> for GraphQLError {
    fn from(e: graphql_client::Error) -> Self {
        Self {
            message: e.message,
            locations: e.locations.map_or_else(Vec::new, |locs| {
                locs.into_iter()
                    .map(|l| GraphQLErrorLocation {
                        line: i64::from(l.line),
                        column: i64::from(l.column),
                    })
                    .collect()
            }),
            path: e.path.map_or_else(Vec::new, |p| {
                p.into_iter()
                    .map(|fragment| match fragment {
                        graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                        graphql_client::PathFragment::Index(i) => {
                            serde_json::Value::Number(i.into())
                        }
                    })
                    .collect()
            }),
        }
    }
}

fn format_graphql_error(error: &GraphQLError) -> String {
    let mut parts = Vec::new();

    if !error.message.is_empty() {
        parts.push(error.message.clone());
    }

    if !error.path.is_empty() {
        let path_str = error
            .path
            .iter()
            .map(|p| match p {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(".");
        parts.push(format!("path: {path_str}"));
    }

    if let Some(loc) = error.locations.first() {
        parts.push(format!("at line {}:{}", loc.line, loc.column));
    }

    if parts.is_empty() {
        "(no error details provided)".to_string()
    } else {
        parts.join(" ")
    }
}
