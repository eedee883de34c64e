//! JSON views returned by storefront handlers.

use serde::Serialize;

use chowline_core::cart::{Cart, CartLine};
use chowline_core::image::ImageResolver;
use chowline_core::{CurrencyCode, Price, ProductId};
use chowline_db::models::Product;

/// A product as shown on the menu, with its image resolved to a loadable URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub price_display: String,
    pub image_url: String,
    pub available: bool,
}

impl ProductView {
    /// Build the view. The image cache-buster is the product's last update
    /// time, so a replaced image is fetched again.
    #[must_use]
    pub fn new(product: &Product, images: &ImageResolver, currency: CurrencyCode) -> Self {
        let version = product.updated_at.timestamp().to_string();
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            price_display: product.price.format(currency),
            image_url: images.resolve(product.image_url.as_deref(), &product.name, &version),
            available: product.available,
        }
    }
}

/// One cart line with its computed total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineView {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Option<Price>,
    pub quantity: u32,
    pub line_total: Price,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id,
            name: line.name.clone(),
            unit_price: line.unit_price,
            quantity: line.quantity,
            line_total: line.line_total(),
        }
    }
}

/// The session cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub item_count: u32,
    pub total: Price,
    pub total_display: String,
}

impl CartView {
    #[must_use]
    pub fn new(cart: &Cart, currency: CurrencyCode) -> Self {
        let total = cart.total();
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            item_count: cart.item_count(),
            total,
            total_display: total.format(currency),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn product(image_url: Option<&str>) -> Product {
        let updated = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
        Product {
            id: ProductId::new(4),
            name: "Spicy Chicken Burger".into(),
            description: "Crispy".into(),
            price: Price::from_units(3500),
            image_url: image_url.map(String::from),
            available: true,
            created_at: updated,
            updated_at: updated,
        }
    }

    #[test]
    fn test_product_view_uses_fallback_image() {
        let images = ImageResolver::new("https://shop.chowline.test");
        let view = ProductView::new(&product(None), &images, CurrencyCode::NGN);
        assert_eq!(
            view.image_url,
            "https://shop.chowline.test/static/fallback/chicken.jpg"
        );
        assert_eq!(view.price_display, "₦3500.00");
    }

    #[test]
    fn test_product_view_cache_busts_with_update_time() {
        let images = ImageResolver::new("https://shop.chowline.test");
        let view = ProductView::new(
            &product(Some("https://cdn.example.com/burger.png")),
            &images,
            CurrencyCode::NGN,
        );
        assert_eq!(
            view.image_url,
            format!(
                "https://cdn.example.com/burger.png?v={}",
                Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0)
                    .unwrap()
                    .timestamp()
            )
        );
    }

    #[test]
    fn test_cart_view_totals() {
        let mut cart = Cart::new();
        cart.add(CartLine {
            product_id: ProductId::new(1),
            name: "Jollof".into(),
            unit_price: Some(Price::from_units(1000)),
            quantity: 2,
        });
        cart.add(CartLine {
            product_id: ProductId::new(2),
            name: "Zobo".into(),
            unit_price: Some(Price::from_units(500)),
            quantity: 1,
        });

        let view = CartView::new(&cart, CurrencyCode::NGN);
        assert_eq!(view.item_count, 3);
        assert_eq!(view.total, Price::from_units(2500));
        assert_eq!(view.total_display, "₦2500.00");
        assert_eq!(view.lines[0].line_total, Price::from_units(2000));
    }
}
