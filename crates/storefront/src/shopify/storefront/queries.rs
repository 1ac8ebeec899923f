//! GraphQL documents for the Shopify Storefront API and their response shapes.
//!
//! Each operation lives in its own module with a `DOCUMENT` and the
//! `ResponseData` that its `data` member decodes into. Shared fragments are
//! spliced in with `concat!`, so every document is a single `&'static str`.

use serde::Deserialize;

use crate::shopify::types::{
    Money, PriceRange, ProductOption, ProductVariant, SelectedOption, Seo,
};

/// A named GraphQL document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Document {
    /// Operation name, sent as `operationName`.
    pub operation_name: &'static str,
    /// Full document text including fragments.
    pub query: &'static str,
}

// =============================================================================
// Fragments
// =============================================================================

macro_rules! image_fragment {
    () => {
        r"
fragment image on Image {
  url
  altText
  width
  height
}
"
    };
}

macro_rules! seo_fragment {
    () => {
        r"
fragment seo on SEO {
  description
  title
}
"
    };
}

macro_rules! product_fragment {
    () => {
        r"
fragment product on Product {
  id
  handle
  availableForSale
  title
  description
  descriptionHtml
  options {
    id
    name
    values
  }
  priceRange {
    maxVariantPrice {
      amount
      currencyCode
    }
    minVariantPrice {
      amount
      currencyCode
    }
  }
  variants(first: 250) {
    edges {
      node {
        id
        title
        availableForSale
        selectedOptions {
          name
          value
        }
        price {
          amount
          currencyCode
        }
      }
    }
  }
  featuredImage {
    ...image
  }
  images(first: 20) {
    edges {
      node {
        ...image
      }
    }
  }
  seo {
    ...seo
  }
  tags
  updatedAt
}
"
    };
}

macro_rules! collection_fragment {
    () => {
        r"
fragment collection on Collection {
  handle
  title
  description
  seo {
    ...seo
  }
  updatedAt
}
"
    };
}

macro_rules! cart_fragment {
    () => {
        r"
fragment cart on Cart {
  id
  checkoutUrl
  cost {
    subtotalAmount {
      amount
      currencyCode
    }
    totalAmount {
      amount
      currencyCode
    }
    totalTaxAmount {
      amount
      currencyCode
    }
  }
  lines(first: 100) {
    edges {
      node {
        id
        quantity
        cost {
          totalAmount {
            amount
            currencyCode
          }
        }
        merchandise {
          ... on ProductVariant {
            id
            title
            selectedOptions {
              name
              value
            }
            product {
              id
              handle
              title
              featuredImage {
                ...image
              }
            }
          }
        }
      }
    }
  }
  totalQuantity
}
"
    };
}

// =============================================================================
// Shared Response Shapes
// =============================================================================

/// The `{ edges: [{ node }] }` list encoding used by Storefront connections.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
}

/// One element of a [`Connection`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

/// Image as returned by the API (alt text may be missing).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFields {
    pub url: String,
    pub alt_text: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

/// Product as returned by the `product` fragment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFields {
    pub id: String,
    pub handle: String,
    pub available_for_sale: bool,
    pub title: String,
    pub description: String,
    pub description_html: String,
    pub options: Vec<ProductOption>,
    pub price_range: PriceRange,
    pub variants: Connection<ProductVariant>,
    pub featured_image: Option<ImageFields>,
    pub images: Connection<ImageFields>,
    pub seo: Seo,
    pub tags: Vec<String>,
    pub updated_at: String,
}

/// Collection as returned by the `collection` fragment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionFields {
    pub handle: String,
    pub title: String,
    pub description: String,
    pub seo: Seo,
    pub updated_at: String,
}

/// Cart as returned by the `cart` fragment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartFields {
    pub id: String,
    pub checkout_url: String,
    pub cost: CartCostFields,
    pub lines: Connection<CartLineFields>,
    pub total_quantity: i64,
}

/// Cart cost; Shopify leaves `totalTaxAmount` null when no tax applies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCostFields {
    pub subtotal_amount: Money,
    pub total_amount: Money,
    #[serde(default)]
    pub total_tax_amount: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineFields {
    pub id: String,
    pub quantity: i64,
    pub cost: CartLineCostFields,
    pub merchandise: MerchandiseFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineCostFields {
    pub total_amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchandiseFields {
    pub id: String,
    pub title: String,
    pub selected_options: Vec<SelectedOption>,
    pub product: MerchandiseProductFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchandiseProductFields {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub featured_image: Option<ImageFields>,
}

/// `cartCreate` / `cartLines*` mutation payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMutationPayload {
    pub cart: Option<CartFields>,
    #[serde(default)]
    pub user_errors: Vec<CartUserError>,
}

/// A user error from a cart mutation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CartUserError {
    pub field: Option<Vec<String>>,
    pub message: String,
}

// =============================================================================
// Menu
// =============================================================================

pub mod get_menu {
    use serde::Deserialize;

    use super::Document;

    pub const DOCUMENT: Document = Document {
        operation_name: "getMenu",
        query: r"
query getMenu($handle: String!) {
  menu(handle: $handle) {
    items {
      title
      url
    }
  }
}
",
    };

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub menu: Option<Menu>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Menu {
        pub items: Vec<MenuItemFields>,
    }

    /// Menu items are a plain list in the schema, not a connection.
    #[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
    pub struct MenuItemFields {
        pub title: String,
        pub url: Option<String>,
    }
}

// =============================================================================
// Products
// =============================================================================

pub mod get_products {
    use serde::Deserialize;

    use super::{Connection, Document, ProductFields};

    pub const DOCUMENT: Document = Document {
        operation_name: "getProducts",
        query: concat!(
            r"
query getProducts($sortKey: ProductSortKeys, $reverse: Boolean, $query: String) {
  products(sortKey: $sortKey, reverse: $reverse, query: $query, first: 100) {
    edges {
      node {
        ...product
      }
    }
  }
}
",
            product_fragment!(),
            image_fragment!(),
            seo_fragment!()
        ),
    };

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: Connection<ProductFields>,
    }
}

pub mod get_product {
    use serde::Deserialize;

    use super::{Document, ProductFields};

    pub const DOCUMENT: Document = Document {
        operation_name: "getProduct",
        query: concat!(
            r"
query getProduct($handle: String!) {
  product(handle: $handle) {
    ...product
  }
}
",
            product_fragment!(),
            image_fragment!(),
            seo_fragment!()
        ),
    };

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub product: Option<ProductFields>,
    }
}

pub mod get_product_recommendations {
    use serde::Deserialize;

    use super::{Document, ProductFields};

    pub const DOCUMENT: Document = Document {
        operation_name: "getProductRecommendations",
        query: concat!(
            r"
query getProductRecommendations($productId: ID!) {
  productRecommendations(productId: $productId) {
    ...product
  }
}
",
            product_fragment!(),
            image_fragment!(),
            seo_fragment!()
        ),
    };

    /// `productRecommendations` is a plain list, not a connection.
    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_recommendations: Option<Vec<ProductFields>>,
    }
}

// =============================================================================
// Collections
// =============================================================================

pub mod get_collections {
    use serde::Deserialize;

    use super::{CollectionFields, Connection, Document};

    pub const DOCUMENT: Document = Document {
        operation_name: "getCollections",
        query: concat!(
            r"
query getCollections {
  collections(first: 100, sortKey: TITLE) {
    edges {
      node {
        ...collection
      }
    }
  }
}
",
            collection_fragment!(),
            seo_fragment!()
        ),
    };

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub collections: Connection<CollectionFields>,
    }
}

pub mod get_collection_products {
    use serde::Deserialize;

    use super::{Connection, Document, ProductFields};

    pub const DOCUMENT: Document = Document {
        operation_name: "getCollectionProducts",
        query: concat!(
            r"
query getCollectionProducts($handle: String!, $sortKey: ProductCollectionSortKeys, $reverse: Boolean) {
  collection(handle: $handle) {
    products(sortKey: $sortKey, reverse: $reverse, first: 100) {
      edges {
        node {
          ...product
        }
      }
    }
  }
}
",
            product_fragment!(),
            image_fragment!(),
            seo_fragment!()
        ),
    };

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub collection: Option<CollectionProducts>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CollectionProducts {
        pub products: Connection<ProductFields>,
    }
}

// =============================================================================
// Cart
// =============================================================================

pub mod get_cart {
    use serde::Deserialize;

    use super::{CartFields, Document};

    pub const DOCUMENT: Document = Document {
        operation_name: "getCart",
        query: concat!(
            r"
query getCart($cartId: ID!) {
  cart(id: $cartId) {
    ...cart
  }
}
",
            cart_fragment!(),
            image_fragment!()
        ),
    };

    /// `cart` is null once the cart has been checked out.
    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub cart: Option<CartFields>,
    }
}

pub mod create_cart {
    use serde::Deserialize;

    use super::{CartMutationPayload, Document};

    pub const DOCUMENT: Document = Document {
        operation_name: "createCart",
        query: concat!(
            r"
mutation createCart($lineItems: [CartLineInput!]) {
  cartCreate(input: { lines: $lineItems }) {
    cart {
      ...cart
    }
    userErrors {
      field
      message
    }
  }
}
",
            cart_fragment!(),
            image_fragment!()
        ),
    };

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_create: Option<CartMutationPayload>,
    }
}

pub mod add_to_cart {
    use serde::Deserialize;

    use super::{CartMutationPayload, Document};

    pub const DOCUMENT: Document = Document {
        operation_name: "addToCart",
        query: concat!(
            r"
mutation addToCart($cartId: ID!, $lines: [CartLineInput!]!) {
  cartLinesAdd(cartId: $cartId, lines: $lines) {
    cart {
      ...cart
    }
    userErrors {
      field
      message
    }
  }
}
",
            cart_fragment!(),
            image_fragment!()
        ),
    };

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_add: Option<CartMutationPayload>,
    }
}

pub mod edit_cart_items {
    use serde::Deserialize;

    use super::{CartMutationPayload, Document};

    pub const DOCUMENT: Document = Document {
        operation_name: "editCartItems",
        query: concat!(
            r"
mutation editCartItems($cartId: ID!, $lines: [CartLineUpdateInput!]!) {
  cartLinesUpdate(cartId: $cartId, lines: $lines) {
    cart {
      ...cart
    }
    userErrors {
      field
      message
    }
  }
}
",
            cart_fragment!(),
            image_fragment!()
        ),
    };

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_update: Option<CartMutationPayload>,
    }
}

pub mod remove_from_cart {
    use serde::Deserialize;

    use super::{CartMutationPayload, Document};

    pub const DOCUMENT: Document = Document {
        operation_name: "removeFromCart",
        query: concat!(
            r"
mutation removeFromCart($cartId: ID!, $lineIds: [ID!]!) {
  cartLinesRemove(cartId: $cartId, lineIds: $lineIds) {
    cart {
      ...cart
    }
    userErrors {
      field
      message
    }
  }
}
",
            cart_fragment!(),
            image_fragment!()
        ),
    };

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_remove: Option<CartMutationPayload>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_include_their_fragments() {
        for doc in [
            get_products::DOCUMENT,
            get_product::DOCUMENT,
            get_product_recommendations::DOCUMENT,
            get_collection_products::DOCUMENT,
        ] {
            assert!(doc.query.contains("fragment product on Product"));
            assert!(doc.query.contains("fragment image on Image"));
            assert!(doc.query.contains("fragment seo on SEO"));
        }

        for doc in [
            get_cart::DOCUMENT,
            create_cart::DOCUMENT,
            add_to_cart::DOCUMENT,
            edit_cart_items::DOCUMENT,
            remove_from_cart::DOCUMENT,
        ] {
            assert!(doc.query.contains("fragment cart on Cart"));
            assert!(doc.query.contains("fragment image on Image"));
        }
    }

    #[test]
    fn test_operation_names_match_documents() {
        for doc in [
            get_menu::DOCUMENT,
            get_products::DOCUMENT,
            get_product::DOCUMENT,
            get_product_recommendations::DOCUMENT,
            get_collections::DOCUMENT,
            get_collection_products::DOCUMENT,
            get_cart::DOCUMENT,
            create_cart::DOCUMENT,
            add_to_cart::DOCUMENT,
            edit_cart_items::DOCUMENT,
            remove_from_cart::DOCUMENT,
        ] {
            assert!(
                doc.query.contains(&format!(" {}(", doc.operation_name))
                    || doc.query.contains(&format!(" {} {{", doc.operation_name)),
                "{} does not declare its operation",
                doc.operation_name
            );
        }
    }

    #[test]
    fn test_cart_cost_tolerates_missing_tax() {
        let cost: CartCostFields = serde_json::from_value(serde_json::json!({
            "subtotalAmount": { "amount": "10.0", "currencyCode": "USD" },
            "totalAmount": { "amount": "10.0", "currencyCode": "USD" }
        }))
        .expect("cost without tax");
        assert_eq!(cost.total_tax_amount, None);
    }
}
