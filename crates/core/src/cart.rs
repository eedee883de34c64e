//! Cart lines and total computation.
//!
//! The cart lives in the customer's session until checkout. Prices on cart
//! lines are display snapshots; checkout re-reads prices from the product
//! records.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// One product in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    /// Unit price at the time the line was added. A missing price counts as
    /// zero in totals.
    pub unit_price: Option<Price>,
    pub quantity: u32,
}

impl CartLine {
    /// Price of this line (`unit_price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.unwrap_or(Price::ZERO).times(self.quantity)
    }
}

/// Sum of `unit_price * quantity` over all lines.
///
/// Lines without a price contribute zero; an empty cart totals zero.
///
/// ```
/// use chowline_core::cart::{CartLine, cart_total};
/// use chowline_core::{Price, ProductId};
///
/// let lines = [
///     CartLine { product_id: ProductId::new(1), name: "Jollof".into(), unit_price: Some(Price::from_units(1000)), quantity: 2 },
///     CartLine { product_id: ProductId::new(2), name: "Zobo".into(), unit_price: Some(Price::from_units(500)), quantity: 1 },
/// ];
/// assert_eq!(cart_total(&lines), Price::from_units(2500));
/// ```
#[must_use]
pub fn cart_total(lines: &[CartLine]) -> Price {
    lines.iter().map(CartLine::line_total).sum()
}

/// A session cart.
///
/// Lines are kept in insertion order and there is at most one line per
/// product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add a line, merging with an existing line for the same product.
    ///
    /// When merging, the price snapshot and name are refreshed from the new
    /// line. Zero-quantity lines are ignored.
    pub fn add(&mut self, line: CartLine) {
        if line.quantity == 0 {
            return;
        }

        match self
            .lines
            .iter_mut()
            .find(|existing| existing.product_id == line.product_id)
        {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
                existing.unit_price = line.unit_price;
                existing.name = line.name;
            }
            None => self.lines.push(line),
        }
    }

    /// Set the quantity for a product. A quantity of zero removes the line.
    ///
    /// Returns `false` if the product is not in the cart.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(product_id);
        }

        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove a product's line. Returns `false` if it was not in the cart.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() != before
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0_u32, |acc, l| acc.saturating_add(l.quantity))
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Cart total, see [`cart_total`].
    #[must_use]
    pub fn total(&self) -> Price {
        cart_total(&self.lines)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: i32, price: Option<i64>, quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new(id),
            name: format!("item-{id}"),
            unit_price: price.map(Price::from_units),
            quantity,
        }
    }

    #[test]
    fn test_total_of_spec_example() {
        let lines = [line(1, Some(1000), 2), line(2, Some(500), 1)];
        assert_eq!(cart_total(&lines), Price::from_units(2500));
    }

    #[test]
    fn test_empty_cart_totals_zero() {
        assert_eq!(cart_total(&[]), Price::ZERO);
        assert_eq!(Cart::new().total(), Price::ZERO);
    }

    #[test]
    fn test_missing_price_counts_as_zero() {
        let lines = [line(1, None, 3), line(2, Some(750), 2)];
        assert_eq!(cart_total(&lines), Price::from_units(1500));
    }

    #[test]
    fn test_add_merges_same_product() {
        let mut cart = Cart::new();
        cart.add(line(1, Some(1000), 1));
        cart.add(line(1, Some(1200), 2));

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 3);
        // Latest price snapshot wins
        assert_eq!(cart.total(), Price::from_units(3600));
    }

    #[test]
    fn test_add_ignores_zero_quantity() {
        let mut cart = Cart::new();
        cart.add(line(1, Some(1000), 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_and_remove() {
        let mut cart = Cart::new();
        cart.add(line(1, Some(1000), 1));
        cart.add(line(2, Some(500), 1));

        assert!(cart.set_quantity(ProductId::new(2), 4));
        assert_eq!(cart.total(), Price::from_units(3000));

        assert!(cart.set_quantity(ProductId::new(1), 0));
        assert_eq!(cart.lines().len(), 1);

        assert!(!cart.set_quantity(ProductId::new(9), 2));
        assert!(!cart.remove(ProductId::new(9)));
        assert!(cart.remove(ProductId::new(2)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut cart = Cart::new();
        cart.add(line(3, Some(100), 1));
        cart.add(line(1, Some(100), 1));
        cart.add(line(3, Some(100), 1));

        let ids: Vec<i32> = cart.lines().iter().map(|l| l.product_id.as_i32()).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_cart_survives_session_serialization() {
        let mut cart = Cart::new();
        cart.add(line(1, Some(1000), 2));
        let json = serde_json::to_value(&cart).unwrap();
        let restored: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(restored, cart);
    }
}
