//! Reshapers: raw Storefront response shapes into flat domain types.
//!
//! Everything here is pure and total. Hidden-entity filtering happens here
//! too, but whether it applies is decided by the caller.

pub mod cart;
pub mod collections;
pub mod menu;
pub mod products;

pub use cart::reshape_cart;
pub use collections::{all_collection, reshape_collection, reshape_collections};
pub use menu::{reshape_menu, reshape_menu_item};
pub use products::{reshape_image, reshape_images, reshape_product, reshape_products};

use super::queries::Connection;

/// Unwrap an `edges { node }` list, keeping order.
pub fn flatten_edges<T>(connection: Connection<T>) -> Vec<T> {
    connection.edges.into_iter().map(|edge| edge.node).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shopify::queries::Edge;

    #[test]
    fn test_flatten_empty_connection() {
        let connection: Connection<&str> = Connection { edges: vec![] };
        assert!(flatten_edges(connection).is_empty());
    }

    #[test]
    fn test_flatten_keeps_order() {
        let connection = Connection {
            edges: vec![Edge { node: "a" }, Edge { node: "b" }],
        };
        assert_eq!(flatten_edges(connection), vec!["a", "b"]);
    }
}
