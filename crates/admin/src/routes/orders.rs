//! Order management route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use chowline_core::{OrderId, OrderStatus};
use chowline_db::OrderRepository;
use chowline_db::models::{Order, OrderDetail, OrderFilter, OrderItem};

use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Order list query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

impl ListQuery {
    fn filter(&self) -> Result<OrderFilter> {
        let status = self
            .status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<OrderStatus>)
            .transpose()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        Ok(OrderFilter::new(status, self.limit))
    }
}

/// Status update request.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// What a status update should do, given the current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Already in the requested status.
    Unchanged,
    /// Allowed move.
    Apply,
    /// Not allowed.
    Rejected,
}

/// Decide how to handle moving an order from `current` to `requested`.
#[must_use]
pub fn plan_transition(current: OrderStatus, requested: OrderStatus) -> Transition {
    if current == requested {
        Transition::Unchanged
    } else if current.can_transition_to(requested) {
        Transition::Apply
    } else {
        Transition::Rejected
    }
}

/// All orders, newest first.
#[instrument(skip(state, _admin))]
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool())
        .list(query.filter()?)
        .await?;
    Ok(Json(orders))
}

/// One order with its items.
#[instrument(skip(state, _admin))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<OrderDetail>> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get(OrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;
    let items = repo.items(order.id).await?;

    Ok(Json(OrderDetail { order, items }))
}

/// Items of an order.
#[instrument(skip(state, _admin))]
pub async fn items(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Vec<OrderItem>>> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get(OrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

    Ok(Json(repo.items(order.id).await?))
}

/// Change an order's status.
///
/// Setting the current status again is a no-op. A disallowed move, or a
/// move that loses a race with another update, is a `409`.
#[instrument(skip(state, admin, update), fields(admin_id = %admin.id, status = %update.status))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<i32>,
    ApiJson(update): ApiJson<StatusUpdate>,
) -> Result<Json<Order>> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get(OrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

    match plan_transition(order.status, update.status) {
        Transition::Unchanged => Ok(Json(order)),
        Transition::Rejected => Err(AppError::Conflict(format!(
            "cannot change a {} order to {}",
            order.status, update.status
        ))),
        Transition::Apply => {
            let updated = repo
                .update_status(order.id, order.status, update.status)
                .await?
                .ok_or_else(|| {
                    AppError::Conflict("order was updated by someone else, reload".to_string())
                })?;
            tracing::info!(order_id = %updated.id, from = %order.status, "order status changed");
            Ok(Json(updated))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_transition() {
        use OrderStatus::{Cancelled, Completed, Pending};

        assert_eq!(plan_transition(Pending, Pending), Transition::Unchanged);
        assert_eq!(plan_transition(Pending, Completed), Transition::Apply);
        assert_eq!(plan_transition(Pending, Cancelled), Transition::Apply);
        assert_eq!(plan_transition(Completed, Cancelled), Transition::Apply);
        assert_eq!(plan_transition(Completed, Completed), Transition::Unchanged);
        assert_eq!(plan_transition(Completed, Pending), Transition::Rejected);
        assert_eq!(plan_transition(Cancelled, Pending), Transition::Rejected);
        assert_eq!(plan_transition(Cancelled, Completed), Transition::Rejected);
    }

    #[test]
    fn test_list_query_filter() {
        let query = ListQuery {
            status: Some("Completed".to_string()),
            limit: Some(10_000),
        };
        let filter = query.filter().unwrap();
        assert_eq!(filter.status, Some(OrderStatus::Completed));
        assert_eq!(filter.limit, OrderFilter::MAX_LIMIT);

        let blank = ListQuery {
            status: Some(String::new()),
            limit: None,
        };
        assert_eq!(blank.filter().unwrap(), OrderFilter::default());

        let bad = ListQuery {
            status: Some("shipped".to_string()),
            limit: None,
        };
        assert!(matches!(bad.filter(), Err(AppError::BadRequest(_))));
    }
}
