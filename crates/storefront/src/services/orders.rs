//! Order placement.
//!
//! Clients only say which products they want and how many. Names and unit
//! prices are read from the product records at placement time, and missing
//! delivery details are filled from the customer's profile.

use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;

use chowline_core::cart::{Cart, CartLine};
use chowline_core::{ProductId, UserId};
use chowline_db::models::{CustomerDetails, InputError, NewOrder, OrderDetail, User};
use chowline_db::{OrderRepository, ProductRepository, RepositoryError, UserRepository};

/// Largest quantity of a single product per order.
pub const MAX_ITEM_QUANTITY: u32 = 99;

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// No items were requested.
    #[error("order must contain at least one item")]
    Empty,

    /// A quantity is zero or too large.
    #[error("quantity for product {product_id} must be between 1 and {}", MAX_ITEM_QUANTITY)]
    InvalidQuantity { product_id: ProductId },

    /// A requested product does not exist.
    #[error("product {0} does not exist")]
    UnknownProduct(ProductId),

    /// A requested product is sold out.
    #[error("{0} is currently unavailable")]
    Unavailable(String),

    /// Delivery details are incomplete.
    #[error("{0}")]
    InvalidCustomer(#[from] InputError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// One requested product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ItemRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Delivery details as submitted; missing fields come from the profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerInput {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_address: Option<String>,
}

impl CustomerInput {
    /// Fill blank fields from the profile and validate the result.
    ///
    /// # Errors
    ///
    /// Returns `InputError` if a field is still missing.
    pub fn resolve(self, profile: Option<&User>) -> Result<CustomerDetails, InputError> {
        fn pick(submitted: Option<String>, fallback: Option<&str>) -> String {
            submitted
                .filter(|v| !v.trim().is_empty())
                .or_else(|| fallback.map(String::from))
                .unwrap_or_default()
        }

        CustomerDetails {
            name: pick(self.customer_name, profile.map(|u| u.username.as_str())),
            phone: pick(self.customer_phone, profile.and_then(|u| u.phone.as_deref())),
            address: pick(
                self.customer_address,
                profile.and_then(|u| u.address.as_deref()),
            ),
        }
        .validate()
    }
}

/// Merge duplicate product requests and check quantities.
///
/// # Errors
///
/// Returns `OrderError::Empty` or `OrderError::InvalidQuantity`.
pub fn merge_items(items: &[ItemRequest]) -> Result<Vec<ItemRequest>, OrderError> {
    if items.is_empty() {
        return Err(OrderError::Empty);
    }

    let mut merged: Vec<ItemRequest> = Vec::with_capacity(items.len());
    for item in items {
        if item.quantity == 0 {
            return Err(OrderError::InvalidQuantity {
                product_id: item.product_id,
            });
        }
        match merged.iter_mut().find(|m| m.product_id == item.product_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => merged.push(*item),
        }
    }

    if let Some(too_many) = merged.iter().find(|m| m.quantity > MAX_ITEM_QUANTITY) {
        return Err(OrderError::InvalidQuantity {
            product_id: too_many.product_id,
        });
    }
    Ok(merged)
}

/// Order placement service.
pub struct OrderService<'a> {
    products: ProductRepository<'a>,
    orders: OrderRepository<'a>,
    users: UserRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool),
            orders: OrderRepository::new(pool),
            users: UserRepository::new(pool),
        }
    }

    /// Price the requested items from the product records and place the order.
    ///
    /// # Errors
    ///
    /// Returns `OrderError` if the items or delivery details are invalid, a
    /// product is missing or unavailable, or the database fails.
    pub async fn place(
        &self,
        user_id: UserId,
        customer: CustomerInput,
        items: &[ItemRequest],
    ) -> Result<OrderDetail, OrderError> {
        let items = merge_items(items)?;

        let ids: Vec<ProductId> = items.iter().map(|i| i.product_id).collect();
        let products = self.products.get_many(&ids).await?;

        let mut cart = Cart::new();
        for item in &items {
            let product = products
                .iter()
                .find(|p| p.id == item.product_id)
                .ok_or(OrderError::UnknownProduct(item.product_id))?;
            if !product.available {
                return Err(OrderError::Unavailable(product.name.clone()));
            }
            cart.add(CartLine {
                product_id: product.id,
                name: product.name.clone(),
                unit_price: Some(product.price),
                quantity: item.quantity,
            });
        }

        let profile = self.users.get_by_id(user_id).await?;
        let customer = customer.resolve(profile.as_ref())?;

        let new_order = NewOrder {
            user_id: Some(user_id),
            customer,
            lines: cart.lines().to_vec(),
        };
        let order = self.orders.create(&new_order).await?;
        let items = self.orders.items(order.id).await?;

        Ok(OrderDetail { order, items })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use chowline_core::{Email, UserRole};

    use super::*;

    fn item(id: i32, quantity: u32) -> ItemRequest {
        ItemRequest {
            product_id: ProductId::new(id),
            quantity,
        }
    }

    fn profile() -> User {
        User {
            id: UserId::new(1),
            email: Email::parse("ada@example.com").unwrap(),
            username: "Ada".into(),
            phone: Some("0803 000 0000".into()),
            address: Some("12 Marina, Lagos".into()),
            role: UserRole::Customer,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_merge_combines_duplicates() {
        let merged = merge_items(&[item(1, 2), item(2, 1), item(1, 3)]).unwrap();
        assert_eq!(merged, vec![item(1, 5), item(2, 1)]);
    }

    #[test]
    fn test_merge_rejects_empty_and_zero() {
        assert!(matches!(merge_items(&[]), Err(OrderError::Empty)));
        assert!(matches!(
            merge_items(&[item(3, 0)]),
            Err(OrderError::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn test_merge_caps_quantity_after_merging() {
        let err = merge_items(&[item(1, 60), item(1, 60)]).unwrap_err();
        assert!(matches!(err, OrderError::InvalidQuantity { product_id } if product_id == ProductId::new(1)));
    }

    #[test]
    fn test_customer_fields_fall_back_to_profile() {
        let input = CustomerInput {
            customer_name: Some("Ada L.".into()),
            customer_phone: Some("  ".into()),
            customer_address: None,
        };
        let details = input.resolve(Some(&profile())).unwrap();
        assert_eq!(details.name, "Ada L.");
        assert_eq!(details.phone, "0803 000 0000");
        assert_eq!(details.address, "12 Marina, Lagos");
    }

    #[test]
    fn test_customer_fields_required_without_profile() {
        let err = CustomerInput::default().resolve(None).unwrap_err();
        assert_eq!(err.to_string(), "customer name is required");
    }
}
