//! Customer dashboard route handlers.
//!
//! These routes require authentication.

use axum::{Json, extract::State};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use chowline_core::Price;
use chowline_core::revenue::completed_revenue;
use chowline_db::models::{Order, ProfileUpdate, StatusCounts, User};
use chowline_db::{OrderRepository, UserRepository};

use crate::error::{AppError, Result};
use crate::extract::ApiJson;
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Number of orders shown on the dashboard.
const RECENT_ORDER_COUNT: usize = 5;

/// Dashboard payload.
#[derive(Debug, Serialize)]
pub struct AccountOverview {
    pub user: User,
    pub order_counts: StatusCounts,
    pub total_orders: i64,
    /// Sum of completed orders.
    pub total_spent: Price,
    pub total_spent_display: String,
    pub recent_orders: Vec<Order>,
}

/// Profile, order counts and recent orders for the signed-in customer.
#[instrument(skip(state, current), fields(user_id = %current.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<AccountOverview>> {
    let user = UserRepository::new(state.pool())
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    let mut order_counts = StatusCounts::default();
    for order in &orders {
        order_counts.record(order.status, 1);
    }
    let total_spent = completed_revenue(&orders);

    Ok(Json(AccountOverview {
        user,
        total_orders: order_counts.total(),
        order_counts,
        total_spent,
        total_spent_display: total_spent.format(state.config().currency),
        recent_orders: orders.into_iter().take(RECENT_ORDER_COUNT).collect(),
    }))
}

/// Update username, phone or address.
///
/// An empty string clears phone or address. The session identity is
/// refreshed so a new username shows up immediately.
#[instrument(skip(state, current, session, update), fields(user_id = %current.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    session: Session,
    ApiJson(update): ApiJson<ProfileUpdate>,
) -> Result<Json<User>> {
    if update.is_empty() {
        return Err(AppError::BadRequest("Nothing to update".to_string()));
    }
    let update = update
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let user = UserRepository::new(state.pool())
        .update_profile(current.id, &update)
        .await?;

    session
        .insert(session_keys::CURRENT_USER, CurrentUser::from(&user))
        .await?;
    tracing::info!("profile updated");

    Ok(Json(user))
}
