//! Collection reshaping.

use crate::shopify::types::{Collection, Seo};

use super::super::queries::CollectionFields;

pub fn reshape_collection(collection: CollectionFields) -> Collection {
    let path = format!("/search/{}", collection.handle);

    Collection {
        handle: collection.handle,
        title: collection.title,
        description: collection.description,
        seo: collection.seo,
        path,
        updated_at: collection.updated_at,
    }
}

pub fn reshape_collections(
    collections: impl IntoIterator<Item = CollectionFields>,
) -> Vec<Collection> {
    collections.into_iter().map(reshape_collection).collect()
}

/// The synthetic "All" collection listed ahead of the real ones.
pub fn all_collection(updated_at: String) -> Collection {
    Collection {
        handle: String::new(),
        title: "All".to_string(),
        description: "All products".to_string(),
        seo: Seo {
            title: Some("All".to_string()),
            description: Some("All products".to_string()),
        },
        path: "/search".to_string(),
        updated_at,
    }
}
