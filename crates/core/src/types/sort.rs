//! Product sort options offered by the storefront.
//!
//! Shopify exposes two different enums for sorting: `ProductSortKeys` for the
//! top-level `products` connection and `ProductCollectionSortKeys` for a
//! collection's products. They disagree on the creation-date key, so
//! [`ProductSortKey`] knows how to render itself for either one.

use serde::{Deserialize, Serialize};

/// Sort key for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductSortKey {
    #[default]
    Relevance,
    BestSelling,
    CreatedAt,
    Price,
    Title,
}

impl ProductSortKey {
    /// Value for the `products` connection's `ProductSortKeys` enum.
    #[must_use]
    pub const fn as_products_key(self) -> &'static str {
        match self {
            Self::Relevance => "RELEVANCE",
            Self::BestSelling => "BEST_SELLING",
            Self::CreatedAt => "CREATED_AT",
            Self::Price => "PRICE",
            Self::Title => "TITLE",
        }
    }

    /// Value for a collection's `ProductCollectionSortKeys` enum.
    ///
    /// Collections call the creation date `CREATED`, not `CREATED_AT`.
    #[must_use]
    pub const fn as_collection_key(self) -> &'static str {
        match self {
            Self::CreatedAt => "CREATED",
            other => other.as_products_key(),
        }
    }
}

/// A named sort option as shown in the storefront's sort menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortFilter {
    /// Label shown to shoppers.
    pub title: &'static str,
    /// URL slug (`?sort=`); `None` for the default option.
    pub slug: Option<&'static str>,
    /// Upstream sort key.
    pub sort_key: ProductSortKey,
    /// Whether to reverse the upstream order.
    pub reverse: bool,
}

/// The default sort (relevance, no slug).
pub const DEFAULT_SORT: SortFilter = SortFilter {
    title: "Relevance",
    slug: None,
    sort_key: ProductSortKey::Relevance,
    reverse: false,
};

/// All sort options in menu order.
pub static SORTING: [SortFilter; 5] = [
    DEFAULT_SORT,
    SortFilter {
        title: "Trending",
        slug: Some("trending-desc"),
        sort_key: ProductSortKey::BestSelling,
        reverse: false,
    },
    SortFilter {
        title: "Latest arrivals",
        slug: Some("latest-desc"),
        sort_key: ProductSortKey::CreatedAt,
        reverse: true,
    },
    SortFilter {
        title: "Price: Low to high",
        slug: Some("price-asc"),
        sort_key: ProductSortKey::Price,
        reverse: false,
    },
    SortFilter {
        title: "Price: High to low",
        slug: Some("price-desc"),
        sort_key: ProductSortKey::Price,
        reverse: true,
    },
];

impl SortFilter {
    /// Find the sort option for a `?sort=` slug, falling back to [`DEFAULT_SORT`].
    #[must_use]
    pub fn from_slug(slug: Option<&str>) -> Self {
        slug.and_then(|s| SORTING.iter().find(|item| item.slug == Some(s)))
            .copied()
            .unwrap_or(DEFAULT_SORT)
    }
}

impl Default for SortFilter {
    fn default() -> Self {
        DEFAULT_SORT
    }
}
