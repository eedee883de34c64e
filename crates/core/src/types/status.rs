//! Status enums for orders and users.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing a status or role from a string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct ParseStatusError {
    kind: &'static str,
    value: String,
}

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed by the customer, not yet handled by the kitchen.
    #[default]
    Pending,
    /// Delivered or picked up. Only completed orders count as revenue.
    Completed,
    /// Cancelled by staff.
    Cancelled,
}

impl OrderStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Completed, Self::Cancelled];

    /// Whether an order in this status may be moved to `next`.
    ///
    /// Pending orders can be completed or cancelled, completed orders can
    /// still be cancelled (refunds), cancelled orders are final. Setting the
    /// current status again is always allowed.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, _)
                | (Self::Completed, Self::Completed | Self::Cancelled)
                | (Self::Cancelled, Self::Cancelled)
        )
    }

    /// Lowercase wire/database name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(ParseStatusError {
                kind: "order status",
                value: s.to_string(),
            }),
        }
    }
}

/// Account role. Customers use the storefront; admins use the back-office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_role", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Customer,
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            _ => Err(ParseStatusError {
                kind: "user role",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_can_move_anywhere() {
        for next in OrderStatus::ALL {
            assert!(OrderStatus::Pending.can_transition_to(next));
        }
    }

    #[test]
    fn test_completed_can_only_be_cancelled() {
        assert!(OrderStatus::Completed.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Completed.can_transition_to(OrderStatus::Completed));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn test_cancelled_is_final() {
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Completed));
        assert!(OrderStatus::Cancelled.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_order_status_parse() {
        assert_eq!(
            "Completed".parse::<OrderStatus>().unwrap(),
            OrderStatus::Completed
        );
        assert_eq!(
            "canceled".parse::<OrderStatus>().unwrap(),
            OrderStatus::Cancelled
        );
        let err = "shipped".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err.to_string(), "invalid order status: shipped");
    }

    #[test]
    fn test_order_status_serde_is_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
        let parsed: OrderStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(parsed, OrderStatus::Pending);
    }

    #[test]
    fn test_user_role_roundtrip() {
        for role in [UserRole::Customer, UserRole::Admin] {
            assert_eq!(role.to_string().parse::<UserRole>().unwrap(), role);
        }
        assert!("superuser".parse::<UserRole>().is_err());
    }
}
