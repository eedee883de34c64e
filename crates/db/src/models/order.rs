//! Orders and their line items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chowline_core::cart::{CartLine, cart_total};
use chowline_core::revenue::RevenueSource;
use chowline_core::{OrderId, OrderItemId, OrderStatus, Price, ProductId, UserId};

use super::{InputError, required_text};

/// Maximum length of a customer detail field.
pub const MAX_CUSTOMER_FIELD_LENGTH: usize = 200;

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    /// Owning customer; `None` once the account is deleted.
    pub user_id: Option<UserId>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub total: Price,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RevenueSource for Order {
    fn status(&self) -> OrderStatus {
        self.status
    }

    fn amount(&self) -> Price {
        self.total
    }

    fn placed_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// One line of a placed order, with the name and unit price captured when
/// the order was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    /// `None` once the product has been deleted.
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Price,
}

impl OrderItem {
    /// `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// An order together with its items.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Delivery details entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    pub address: String,
}

impl CustomerDetails {
    /// Trim fields and require all three.
    ///
    /// # Errors
    ///
    /// Returns `InputError` naming the first missing or overlong field.
    pub fn validate(self) -> Result<Self, InputError> {
        Ok(Self {
            name: required_text("customer name", &self.name, MAX_CUSTOMER_FIELD_LENGTH)?,
            phone: required_text("customer phone", &self.phone, MAX_CUSTOMER_FIELD_LENGTH)?,
            address: required_text(
                "customer address",
                &self.address,
                MAX_CUSTOMER_FIELD_LENGTH,
            )?,
        })
    }
}

/// An order ready to be written.
///
/// Lines carry the authoritative unit prices read from the product records.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Option<UserId>,
    pub customer: CustomerDetails,
    pub lines: Vec<CartLine>,
}

impl NewOrder {
    /// Order total computed from the lines.
    #[must_use]
    pub fn total(&self) -> Price {
        cart_total(&self.lines)
    }
}

/// Filter for the admin order list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub limit: i64,
}

impl OrderFilter {
    /// Default page size.
    pub const DEFAULT_LIMIT: i64 = 100;
    /// Largest page size a caller may ask for.
    pub const MAX_LIMIT: i64 = 500;

    /// Build a filter, clamping `limit` to `1..=MAX_LIMIT`.
    #[must_use]
    pub fn new(status: Option<OrderStatus>, limit: Option<i64>) -> Self {
        Self {
            status,
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
        }
    }
}

impl Default for OrderFilter {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Number of orders per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: i64,
    pub completed: i64,
    pub cancelled: i64,
}

impl StatusCounts {
    /// Add `count` orders of `status`.
    pub fn record(&mut self, status: OrderStatus, count: i64) {
        match status {
            OrderStatus::Pending => self.pending += count,
            OrderStatus::Completed => self.completed += count,
            OrderStatus::Cancelled => self.cancelled += count,
        }
    }

    /// Orders across all statuses.
    #[must_use]
    pub const fn total(&self) -> i64 {
        self.pending + self.completed + self.cancelled
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn line(id: i32, price: i64, quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new(id),
            name: format!("dish-{id}"),
            unit_price: Some(Price::from_units(price)),
            quantity,
        }
    }

    #[test]
    fn test_new_order_total_uses_cart_total() {
        let order = NewOrder {
            user_id: Some(UserId::new(1)),
            customer: CustomerDetails::default(),
            lines: vec![line(1, 1000, 2), line(2, 500, 1)],
        };
        assert_eq!(order.total(), Price::from_units(2500));
    }

    #[test]
    fn test_customer_details_require_all_fields() {
        let details = CustomerDetails {
            name: " Ada ".into(),
            phone: "0803".into(),
            address: String::new(),
        };
        let err = details.validate().unwrap_err();
        assert_eq!(err.to_string(), "customer address is required");
    }

    #[test]
    fn test_order_is_a_revenue_source() {
        let placed = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
        let order = Order {
            id: OrderId::new(1),
            user_id: None,
            customer_name: "Ada".into(),
            customer_phone: "0803".into(),
            customer_address: "Lagos".into(),
            total: Price::from_units(4200),
            status: OrderStatus::Completed,
            created_at: placed,
            updated_at: placed,
        };
        assert_eq!(RevenueSource::amount(&order), Price::from_units(4200));
        assert_eq!(order.placed_at(), placed);
    }

    #[test]
    fn test_order_filter_clamps_limit() {
        assert_eq!(OrderFilter::new(None, None).limit, OrderFilter::DEFAULT_LIMIT);
        assert_eq!(OrderFilter::new(None, Some(0)).limit, 1);
        assert_eq!(OrderFilter::new(None, Some(10_000)).limit, OrderFilter::MAX_LIMIT);
    }

    #[test]
    fn test_status_counts_total() {
        let mut counts = StatusCounts::default();
        counts.record(OrderStatus::Pending, 2);
        counts.record(OrderStatus::Completed, 5);
        counts.record(OrderStatus::Cancelled, 1);
        assert_eq!(counts.total(), 8);
    }
}
