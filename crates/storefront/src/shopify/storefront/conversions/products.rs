//! Product and image reshaping.

use std::sync::LazyLock;

use regex::Regex;

use crate::shopify::HIDDEN_PRODUCT_TAG;
use crate::shopify::types::{Image, Product};

use super::super::queries::{Connection, ImageFields, ProductFields};
use super::flatten_edges;

/// Captures the file name (without extension) from an image URL.
static FILENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".*/(.*)\..*").expect("Invalid regex"));

fn image_filename(url: &str) -> &str {
    FILENAME_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str())
}

/// Reshape one image, synthesizing alt text from the owner title when missing.
pub fn reshape_image(image: ImageFields, owner_title: &str) -> Image {
    let alt_text = match image.alt_text {
        Some(alt) if !alt.is_empty() => alt,
        _ => format!("{owner_title} - {}", image_filename(&image.url)),
    };

    Image {
        url: image.url,
        alt_text,
        width: image.width,
        height: image.height,
    }
}

pub fn reshape_images(images: Connection<ImageFields>, owner_title: &str) -> Vec<Image> {
    flatten_edges(images)
        .into_iter()
        .map(|image| reshape_image(image, owner_title))
        .collect()
}

/// Reshape a product.
///
/// With `filter_hidden`, products tagged [`HIDDEN_PRODUCT_TAG`] yield `None`.
pub fn reshape_product(product: ProductFields, filter_hidden: bool) -> Option<Product> {
    if filter_hidden && product.tags.iter().any(|tag| tag == HIDDEN_PRODUCT_TAG) {
        return None;
    }

    let title = product.title;
    let featured_image = product
        .featured_image
        .map(|image| reshape_image(image, &title));
    let images = reshape_images(product.images, &title);

    Some(Product {
        id: product.id,
        handle: product.handle,
        available_for_sale: product.available_for_sale,
        description: product.description,
        description_html: product.description_html,
        options: product.options,
        price_range: product.price_range,
        variants: flatten_edges(product.variants),
        featured_image,
        images,
        seo: product.seo,
        tags: product.tags,
        updated_at: product.updated_at,
        title,
    })
}

/// Reshape a product list for display: hidden products dropped, order kept.
pub fn reshape_products(products: impl IntoIterator<Item = ProductFields>) -> Vec<Product> {
    products
        .into_iter()
        .filter_map(|product| reshape_product(product, true))
        .collect()
}
