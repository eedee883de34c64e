//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                   - Liveness check
//! GET    /health/ready             - Readiness check (database ping)
//!
//! # Menu
//! GET    /api/products             - Available products (?all=true includes sold out)
//! GET    /api/products/{id}        - Product detail
//!
//! # Cart (session)
//! GET    /cart                     - Current cart
//! POST   /cart/add                 - Add a product
//! POST   /cart/update              - Set a line's quantity
//! POST   /cart/remove              - Remove a line
//! DELETE /cart                     - Empty the cart
//!
//! # Orders (requires login)
//! POST   /checkout                 - Place an order from the cart
//! POST   /api/orders               - Place an order from an item list
//! GET    /api/orders/user          - Own orders, newest first
//! GET    /api/orders/{id}/items    - Items of an own order
//!
//! # Auth
//! POST   /auth/register            - Create an account and sign in
//! POST   /auth/login               - Sign in
//! POST   /auth/logout              - Sign out
//! GET    /auth/me                  - Current user
//! POST   /auth/forgot-password     - Email a reset link
//! POST   /auth/reset-password      - Set a new password with a reset token
//!
//! # Account (requires login)
//! GET    /account                  - Profile, order counts, spend, recent orders
//! PUT    /account                  - Update profile
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Create the auth routes router.
///
/// Credential-handling endpoints are rate limited per client IP.
pub fn auth_routes() -> Router<AppState> {
    let limited = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
        .layer(auth_rate_limiter());

    Router::new()
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .merge(limited)
}

/// Create the cart, checkout and order routes router.
pub fn shop_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::show).delete(cart::clear))
        .route("/cart/add", post(cart::add))
        .route("/cart/update", post(cart::update))
        .route("/cart/remove", post(cart::remove))
        .route("/checkout", post(orders::checkout))
        .route("/api/orders", post(orders::create))
        .route("/api/orders/user", get(orders::list_own))
        .route("/api/orders/{id}/items", get(orders::items))
        .layer(api_rate_limiter())
}

/// Create the main routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(products::list))
        .route("/api/products/{id}", get(products::show))
        .route("/account", get(account::show).put(account::update))
        .merge(shop_routes())
        .nest("/auth", auth_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match chowline_db::ping(state.pool()).await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
