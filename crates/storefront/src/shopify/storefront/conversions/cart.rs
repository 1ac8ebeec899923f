//! Cart reshaping.

use shopfront_core::DEFAULT_CURRENCY_CODE;

use crate::shopify::types::{
    Cart, CartCost, CartLine, CartLineCost, CartMerchandise, CartMerchandiseProduct, Money,
};

use super::super::queries::{CartCostFields, CartFields, CartLineFields, MerchandiseFields};
use super::flatten_edges;
use super::products::reshape_image;

/// Reshape a cart, flattening its lines.
///
/// Carts without a computed tax amount get a zero amount so every cost is
/// always present.
pub fn reshape_cart(cart: CartFields) -> Cart {
    Cart {
        id: cart.id,
        checkout_url: cart.checkout_url,
        total_quantity: cart.total_quantity,
        cost: reshape_cost(cart.cost),
        lines: flatten_edges(cart.lines)
            .into_iter()
            .map(reshape_line)
            .collect(),
    }
}

fn reshape_cost(cost: CartCostFields) -> CartCost {
    CartCost {
        subtotal_amount: cost.subtotal_amount,
        total_amount: cost.total_amount,
        total_tax_amount: cost
            .total_tax_amount
            .unwrap_or_else(|| Money::zero(DEFAULT_CURRENCY_CODE)),
    }
}

fn reshape_line(line: CartLineFields) -> CartLine {
    CartLine {
        id: line.id,
        quantity: line.quantity,
        cost: CartLineCost {
            total_amount: line.cost.total_amount,
        },
        merchandise: reshape_merchandise(line.merchandise),
    }
}

fn reshape_merchandise(merchandise: MerchandiseFields) -> CartMerchandise {
    let product = merchandise.product;
    let featured_image = product
        .featured_image
        .map(|image| reshape_image(image, &product.title));

    CartMerchandise {
        id: merchandise.id,
        title: merchandise.title,
        selected_options: merchandise.selected_options,
        product: CartMerchandiseProduct {
            id: product.id,
            handle: product.handle,
            title: product.title,
            featured_image,
        },
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn cart_json(tax: Option<serde_json::Value>) -> serde_json::Value {
        let mut cost = json!({
            "subtotalAmount": { "amount": "40.0", "currencyCode": "EUR" },
            "totalAmount": { "amount": "44.0", "currencyCode": "EUR" }
        });
        if let (Some(tax), Some(map)) = (tax, cost.as_object_mut()) {
            map.insert("totalTaxAmount".to_string(), tax);
        }

        json!({
            "id": "gid://shopify/Cart/abc",
            "checkoutUrl": "https://example.myshopify.com/cart/c/abc",
            "totalQuantity": 2,
            "cost": cost,
            "lines": { "edges": [{ "node": {
                "id": "gid://shopify/CartLine/1",
                "quantity": 2,
                "cost": { "totalAmount": { "amount": "40.0", "currencyCode": "EUR" } },
                "merchandise": {
                    "id": "gid://shopify/ProductVariant/1",
                    "title": "M",
                    "selectedOptions": [{ "name": "Size", "value": "M" }],
                    "product": {
                        "id": "gid://shopify/Product/1",
                        "handle": "shirt",
                        "title": "Shirt",
                        "featuredImage": { "url": "https://cdn.shopify.com/files/shirt.webp", "altText": null, "width": 100, "height": 100 }
                    }
                }
            } }] }
        })
    }

    fn cart_fields(tax: Option<serde_json::Value>) -> CartFields {
        serde_json::from_value(cart_json(tax)).expect("valid cart fields")
    }

    #[test]
    fn test_missing_tax_defaults_to_zero_usd() {
        let cart = reshape_cart(cart_fields(None));
        assert_eq!(cart.cost.total_tax_amount, Money::zero("USD"));
        assert_eq!(cart.cost.total_tax_amount.amount, "0.0");
    }

    #[test]
    fn test_existing_tax_is_kept() {
        let cart = reshape_cart(cart_fields(Some(
            json!({ "amount": "4.0", "currencyCode": "EUR" }),
        )));
        assert_eq!(cart.cost.total_tax_amount.amount, "4.0");
        assert_eq!(cart.cost.total_tax_amount.currency_code, "EUR");
    }

    #[test]
    fn test_lines_are_flattened() {
        let cart = reshape_cart(cart_fields(None));
        assert_eq!(cart.total_quantity, 2);
        assert_eq!(cart.lines.len(), 1);

        let line = cart.lines.first().expect("one line");
        assert_eq!(line.merchandise.product.handle, "shirt");
        assert_eq!(
            line.merchandise
                .product
                .featured_image
                .as_ref()
                .map(|i| i.alt_text.as_str()),
            Some("Shirt - shirt")
        );
    }
}
