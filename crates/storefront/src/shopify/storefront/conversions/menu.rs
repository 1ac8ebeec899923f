//! Menu reshaping.
//!
//! Shopify menu URLs point at the online store. They are rewritten into
//! storefront-local paths: the store domain is stripped, `/collections`
//! becomes `/search` and `/pages` is dropped.

use crate::shopify::types::MenuItem;

use super::super::queries::get_menu::{Menu, MenuItemFields};

pub fn reshape_menu_item(item: MenuItemFields, store_url: &str) -> MenuItem {
    let path = item
        .url
        .unwrap_or_default()
        .replacen(store_url, "", 1)
        .replacen("/collections", "/search", 1)
        .replacen("/pages", "", 1);

    MenuItem {
        title: item.title,
        path,
    }
}

/// Reshape a menu; a missing menu has no items.
pub fn reshape_menu(menu: Option<Menu>, store_url: &str) -> Vec<MenuItem> {
    menu.map(|menu| {
        menu.items
            .into_iter()
            .map(|item| reshape_menu_item(item, store_url))
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORE: &str = "https://example.myshopify.com";

    fn item(title: &str, url: Option<&str>) -> MenuItemFields {
        MenuItemFields {
            title: title.to_string(),
            url: url.map(str::to_string),
        }
    }

    #[test]
    fn test_collection_link_becomes_search_path() {
        let reshaped = reshape_menu_item(
            item("Shirts", Some("https://example.myshopify.com/collections/shirts")),
            STORE,
        );
        assert_eq!(reshaped.path, "/search/shirts");
    }

    #[test]
    fn test_page_link_loses_pages_prefix() {
        let reshaped = reshape_menu_item(
            item("About", Some("https://example.myshopify.com/pages/about")),
            STORE,
        );
        assert_eq!(reshaped.path, "/about");
    }

    #[test]
    fn test_missing_url_is_empty_path() {
        assert_eq!(reshape_menu_item(item("Nowhere", None), STORE).path, "");
    }

    #[test]
    fn test_missing_menu_is_empty() {
        assert!(reshape_menu(None, STORE).is_empty());
    }

    #[test]
    fn test_menu_keeps_order() {
        let menu = Menu {
            items: vec![
                item("All", Some("https://example.myshopify.com/collections/all")),
                item("Home", Some("https://example.myshopify.com/")),
            ],
        };
        let reshaped = reshape_menu(Some(menu), STORE);
        let paths: Vec<_> = reshaped.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["/search/all", "/"]);
    }
}
