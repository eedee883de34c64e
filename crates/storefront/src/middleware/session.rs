//! Session middleware configuration.
//!
//! Production uses the `PostgreSQL` store from `tower-sessions-sqlx-store`;
//! tests pass an in-memory store.

use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "chowline_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer for a store.
///
/// Cookies are `HttpOnly`, `SameSite=Lax`, and `Secure` when the storefront
/// is served over HTTPS.
#[must_use]
pub fn create_session_layer<Store: SessionStore>(
    store: Store,
    config: &StorefrontConfig,
) -> SessionManagerLayer<Store> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
