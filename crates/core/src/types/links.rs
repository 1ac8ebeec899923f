//! Small helpers for building storefront URLs.

/// Prefix `value` with `prefix` unless it already starts with it.
#[must_use]
pub fn ensure_starts_with(value: &str, prefix: &str) -> String {
    if value.starts_with(prefix) {
        value.to_string()
    } else {
        format!("{prefix}{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_starts_with_adds_prefix() {
        assert_eq!(
            ensure_starts_with("shop.myshopify.com", "https://"),
            "https://shop.myshopify.com"
        );
    }

    #[test]
    fn test_ensure_starts_with_keeps_existing_prefix() {
        assert_eq!(
            ensure_starts_with("https://shop.myshopify.com", "https://"),
            "https://shop.myshopify.com"
        );
    }
}
