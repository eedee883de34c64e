//! Integration tests for Chowline.
//!
//! # Running Tests
//!
//! ```bash
//! # Offline tests (domain pipeline across crates)
//! cargo test -p chowline-integration-tests
//!
//! # Live tests against running services
//! cargo run -p chowline-cli -- migrate
//! cargo run -p chowline-storefront &
//! cargo run -p chowline-admin &
//! cargo test -p chowline-integration-tests -- --ignored
//! ```
//!
//! Auth routes are rate limited per client IP (a burst of five requests,
//! then one every six seconds), so run the live tests a few at a time.
//!
//! # Test Categories
//!
//! - `order_pipeline` - Cart, order and revenue types working together
//! - `live_checkout` - Storefront and admin APIs over HTTP
//! - `password_reset` - Reset tokens against a migrated database
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - Migrated database for the repository tests
//! - `STOREFRONT_BASE_URL` - Storefront under test (default `http://localhost:3000`)
//! - `ADMIN_BASE_URL` - Admin service under test (default `http://localhost:3001`)
//! - `CHOWLINE_TEST_ADMIN_EMAIL` / `CHOWLINE_TEST_ADMIN_PASSWORD` - An admin
//!   account created with `chow-cli admin create`

use chrono::{DateTime, Utc};
use reqwest::Client;

use chowline_core::{OrderId, OrderStatus, Price};
use chowline_db::models::Order;

/// Base URL for the storefront API.
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the admin API.
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Admin credentials from the environment, if configured.
#[must_use]
pub fn admin_credentials() -> Option<(String, String)> {
    let email = std::env::var("CHOWLINE_TEST_ADMIN_EMAIL").ok()?;
    let password = std::env::var("CHOWLINE_TEST_ADMIN_PASSWORD").ok()?;
    Some((email, password))
}

/// An HTTP client that keeps session cookies.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
#[allow(clippy::expect_used)]
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A fresh email address so repeated runs do not collide.
#[must_use]
pub fn unique_email() -> String {
    format!("diner-{}@example.com", uuid::Uuid::new_v4().simple())
}

/// An order row as the database would return it.
#[must_use]
pub fn order(id: i32, total: i64, status: OrderStatus, placed_at: DateTime<Utc>) -> Order {
    Order {
        id: OrderId::new(id),
        user_id: None,
        customer_name: "Ada".to_string(),
        customer_phone: "+2348000000000".to_string(),
        customer_address: "12 Allen Avenue, Ikeja".to_string(),
        total: Price::from_units(total),
        status,
        created_at: placed_at,
        updated_at: placed_at,
    }
}
