//! Domain types for the Shopify Storefront API.
//!
//! These are the flat values handed to callers. The raw response shapes live
//! in [`queries`](super::queries) and are turned into these types by
//! [`conversions`](super::conversions).

use serde::{Deserialize, Serialize};

pub use shopfront_core::Money;

// =============================================================================
// Shared Types
// =============================================================================

/// Price range for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    /// Maximum price among all variants.
    pub max_variant_price: Money,
    /// Minimum price among all variants.
    pub min_variant_price: Money,
}

/// Product or collection image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility. Never empty.
    pub alt_text: String,
    /// Image width in pixels.
    pub width: Option<i64>,
    /// Image height in pixels.
    pub height: Option<i64>,
}

/// SEO metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seo {
    /// Page title for search engines.
    pub title: Option<String>,
    /// Meta description.
    pub description: Option<String>,
}

// =============================================================================
// Product Types
// =============================================================================

/// Selected option on a product variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Size", "Color").
    pub name: String,
    /// Selected value (e.g., "Large", "Blue").
    pub value: String,
}

/// Product option definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    /// Option ID.
    pub id: String,
    /// Option name (e.g., "Size").
    pub name: String,
    /// Available values (e.g., `["Small", "Medium", "Large"]`).
    pub values: Vec<String>,
}

/// A product variant (specific combination of options).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// Variant ID.
    pub id: String,
    /// Variant title (combination of option values).
    pub title: String,
    /// Whether this variant is available for sale.
    pub available_for_sale: bool,
    /// Selected options for this variant.
    pub selected_options: Vec<SelectedOption>,
    /// Current price.
    pub price: Money,
}

/// A product in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product ID.
    pub id: String,
    /// URL handle.
    pub handle: String,
    /// Whether any variant is available.
    pub available_for_sale: bool,
    /// Product title.
    pub title: String,
    /// Plain text description.
    pub description: String,
    /// HTML description.
    pub description_html: String,
    /// Product options.
    pub options: Vec<ProductOption>,
    /// Price range across variants.
    pub price_range: PriceRange,
    /// Product variants.
    pub variants: Vec<ProductVariant>,
    /// Featured image.
    pub featured_image: Option<Image>,
    /// All product images.
    pub images: Vec<Image>,
    /// SEO metadata.
    pub seo: Seo,
    /// Product tags.
    pub tags: Vec<String>,
    /// Last update timestamp.
    pub updated_at: String,
}

// =============================================================================
// Collection Types
// =============================================================================

/// A collection of products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// URL handle (empty for the synthetic "All" collection).
    pub handle: String,
    /// Collection title.
    pub title: String,
    /// Plain text description.
    pub description: String,
    /// SEO metadata.
    pub seo: Seo,
    /// Local storefront path (`/search/{handle}`).
    pub path: String,
    /// Last update timestamp.
    pub updated_at: String,
}

// =============================================================================
// Menu Types
// =============================================================================

/// A navigation menu entry with a storefront-local path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Link text.
    pub title: String,
    /// Local path (e.g., `/search/shirts`).
    pub path: String,
}

// =============================================================================
// Cart Types
// =============================================================================

/// A shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Cart ID.
    pub id: String,
    /// URL to Shopify checkout.
    pub checkout_url: String,
    /// Total quantity of all items.
    pub total_quantity: i64,
    /// Cost breakdown.
    pub cost: CartCost,
    /// Line items.
    pub lines: Vec<CartLine>,
}

/// Cart cost breakdown. Every amount is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCost {
    /// Subtotal before taxes and shipping.
    pub subtotal_amount: Money,
    /// Total including taxes.
    pub total_amount: Money,
    /// Total tax amount.
    pub total_tax_amount: Money,
}

/// A line item in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Line ID.
    pub id: String,
    /// Quantity.
    pub quantity: i64,
    /// Line cost.
    pub cost: CartLineCost,
    /// Merchandise (product variant).
    pub merchandise: CartMerchandise,
}

/// Cost for a single cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineCost {
    /// Total cost for this line.
    pub total_amount: Money,
}

/// Merchandise in a cart line (product variant).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMerchandise {
    /// Variant ID.
    pub id: String,
    /// Variant title.
    pub title: String,
    /// Selected options.
    pub selected_options: Vec<SelectedOption>,
    /// Parent product info.
    pub product: CartMerchandiseProduct,
}

/// Product info for cart merchandise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMerchandiseProduct {
    /// Product ID.
    pub id: String,
    /// Product handle.
    pub handle: String,
    /// Product title.
    pub title: String,
    /// Featured image.
    pub featured_image: Option<Image>,
}

// =============================================================================
// Cart Input Types
// =============================================================================

/// Input for adding a line to a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    /// Product variant ID.
    pub merchandise_id: String,
    /// Quantity to add.
    pub quantity: i64,
}

/// Input for updating a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineUpdateInput {
    /// Line ID to update.
    pub id: String,
    /// Product variant ID.
    pub merchandise_id: String,
    /// New quantity.
    pub quantity: i64,
}
