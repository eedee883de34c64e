//! Database access for Chowline.
//!
//! Both services and the CLI share one `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `users` - Customers and admins, distinguished by `role`
//! - `password_reset_tokens` - Hashed single-use reset tokens
//! - `products` - The menu
//! - `orders` / `order_items` - Placed orders with price snapshots
//! - `tower_sessions.session` - Session store (created by `tower-sessions-sqlx-store`)
//!
//! # Migrations
//!
//! Migrations live in `crates/db/migrations/` and are embedded in
//! [`MIGRATOR`]. Run them with:
//! ```bash
//! cargo run -p chowline-cli -- migrate
//! ```
//!
//! Queries are checked at runtime (`sqlx::query_as`) so the crate builds
//! without a live database.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod orders;
pub mod password;
pub mod password_resets;
pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use orders::OrderRepository;
pub use password_resets::PasswordResetRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a unique violation to [`RepositoryError::Conflict`].
    pub(crate) fn from_unique_violation(err: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(format!("{what} already exists"));
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Check that the database answers a trivial query.
///
/// # Errors
///
/// Returns `sqlx::Error` if the query fails.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
