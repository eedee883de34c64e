//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use chowline_core::image::ImageResolver;

use crate::config::StorefrontConfig;
use crate::services::email::EmailService;
use crate::services::menu::MenuCache;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    images: ImageResolver,
    menu: MenuCache,
    email: Option<EmailService>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `pool` - `PostgreSQL` connection pool
    /// * `email` - Mailer for password resets, if SMTP is configured
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool, email: Option<EmailService>) -> Self {
        let images = ImageResolver::new(&config.asset_origin);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                images,
                menu: MenuCache::default(),
                email,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the product image resolver.
    #[must_use]
    pub fn images(&self) -> &ImageResolver {
        &self.inner.images
    }

    /// Get a reference to the menu cache.
    #[must_use]
    pub fn menu(&self) -> &MenuCache {
        &self.inner.menu
    }

    /// Get the mailer, if SMTP is configured.
    #[must_use]
    pub fn email(&self) -> Option<&EmailService> {
        self.inner.email.as_ref()
    }
}
