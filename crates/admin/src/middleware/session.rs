//! Session middleware configuration for admin.
//!
//! Admin sessions live in their own table so a storefront session cookie is
//! never valid here. Cookies are `SameSite=Strict` with a 24 hour
//! inactivity expiry.

use sqlx::PgPool;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::AdminConfig;

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "chowline_admin_session";

/// Table holding admin sessions.
pub const SESSION_TABLE: &str = "admin_session";

/// Session expiry time in seconds (24 hours - stricter than storefront).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// The `PostgreSQL` store for admin sessions.
///
/// # Panics
///
/// Panics if the table name is invalid (should never happen with the
/// hardcoded [`SESSION_TABLE`]).
#[must_use]
pub fn session_store(pool: &PgPool) -> PostgresStore {
    PostgresStore::new(pool.clone())
        .with_table_name(SESSION_TABLE)
        .expect("valid table name")
}

/// Create the session layer for a store.
#[must_use]
pub fn create_session_layer<Store: SessionStore>(
    store: Store,
    config: &AdminConfig,
) -> SessionManagerLayer<Store> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        // SameSite=Strict for admin (stricter than storefront's Lax)
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
