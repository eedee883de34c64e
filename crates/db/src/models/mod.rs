//! Domain models persisted in `PostgreSQL`.

pub mod order;
pub mod product;
pub mod user;

pub use order::{CustomerDetails, NewOrder, Order, OrderDetail, OrderFilter, OrderItem, StatusCounts};
pub use product::{NewProduct, Product, ProductCounts, ProductUpdate};
pub use user::{NewUser, ProfileUpdate, User};

/// A user-supplied value failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct InputError(pub String);

/// Trim a required text field, rejecting blank or oversized values.
pub(crate) fn required_text(field: &str, value: &str, max: usize) -> Result<String, InputError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(InputError(format!("{field} is required")));
    }
    if value.chars().count() > max {
        return Err(InputError(format!("{field} must be at most {max} characters")));
    }
    Ok(value.to_string())
}

/// Trim an optional text field; blank becomes `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
