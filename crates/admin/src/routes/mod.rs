//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                   - Liveness check
//! GET    /health/ready             - Readiness check (database ping)
//!
//! # Auth (admin accounts only)
//! POST   /auth/login               - Sign in
//! POST   /auth/logout              - Sign out
//! GET    /auth/me                  - Current admin
//!
//! # Orders
//! GET    /api/orders               - All orders (?status=&limit=)
//! GET    /api/orders/{id}          - Order with items
//! GET    /api/orders/{id}/items    - Items of an order
//! PUT    /api/orders/{id}          - Update status
//!
//! # Products
//! GET    /api/products             - All products, unavailable included
//! POST   /api/products             - Create
//! PUT    /api/products/{id}        - Update
//! DELETE /api/products/{id}        - Delete
//! POST   /api/upload               - Upload a product image (multipart)
//!
//! # Reporting
//! GET    /api/dashboard/stats      - Dashboard figures
//! GET    /api/reports/revenue      - Revenue buckets (?period=&buckets=)
//! ```
//!
//! Every route except health and login requires an admin session.

pub mod auth;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod reports;
pub mod upload;

use std::sync::Arc;

use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::{get, post, put},
};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};

use crate::state::AppState;

/// Multipart framing allowance on top of the image size cap.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Login rate limiter: 1 request every 6 seconds per IP, burst of 5.
///
/// # Panics
///
/// This function will not panic. `per_second(6)` and `burst_size(5)` are
/// always accepted by `GovernorConfigBuilder`.
#[must_use]
pub fn login_rate_limiter()
-> GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let config = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .per_second(6)
        .burst_size(5)
        .finish()
        .expect("rate limiter config with per_second(6) and burst_size(5) is valid");
    GovernorLayer::new(Arc::new(config))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login).layer(login_rate_limiter()))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the back-office API router.
pub fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/orders", get(orders::list))
        .route("/orders/{id}", get(orders::show).put(orders::update_status))
        .route("/orders/{id}/items", get(orders::items))
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{id}",
            put(products::update).delete(products::delete),
        )
        .route(
            "/upload",
            post(upload::upload).layer(DefaultBodyLimit::max(
                max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES),
            )),
        )
        .route("/dashboard/stats", get(dashboard::stats))
        .route("/reports/revenue", get(reports::revenue))
}

/// Create the main routes router.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/api", api_routes(max_upload_bytes))
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
