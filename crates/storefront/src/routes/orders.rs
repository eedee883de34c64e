//! Customer order route handlers.
//!
//! Orders are always scoped to the session user.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use chowline_core::OrderId;
use chowline_db::OrderRepository;
use chowline_db::models::{Order, OrderDetail, OrderItem};

use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::RequireAuth;
use crate::services::cart::{load_cart, save_cart};
use crate::services::orders::{CustomerInput, ItemRequest, OrderService};
use crate::state::AppState;

/// Order creation request.
#[derive(Debug, Deserialize)]
pub struct CreateOrder {
    #[serde(flatten)]
    pub customer: CustomerInput,
    pub items: Vec<ItemRequest>,
}

/// Place an order from an explicit item list.
#[instrument(skip(state, user, request), fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(request): ApiJson<CreateOrder>,
) -> Result<(StatusCode, Json<OrderDetail>)> {
    let detail = OrderService::new(state.pool())
        .place(user.id, request.customer, &request.items)
        .await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

/// Place an order from the session cart and empty the cart.
///
/// The body is optional; missing delivery details come from the profile.
#[instrument(skip(state, user, session, customer), fields(user_id = %user.id))]
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    customer: Option<ApiJson<CustomerInput>>,
) -> Result<(StatusCode, Json<OrderDetail>)> {
    let mut cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Err(AppError::BadRequest("Your cart is empty".to_string()));
    }

    let items: Vec<ItemRequest> = cart
        .lines()
        .iter()
        .map(|line| ItemRequest {
            product_id: line.product_id,
            quantity: line.quantity,
        })
        .collect();
    let customer = customer.map(|ApiJson(c)| c).unwrap_or_default();

    let detail = OrderService::new(state.pool())
        .place(user.id, customer, &items)
        .await?;

    cart.clear();
    save_cart(&session, &cart).await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

/// The logged-in customer's orders, newest first.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_own(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;
    Ok(Json(orders))
}

/// Items of one of the customer's own orders.
///
/// Another customer's order is reported as not found.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn items(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Vec<OrderItem>>> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get_for_user(OrderId::new(id), user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

    Ok(Json(repo.items(order.id).await?))
}
