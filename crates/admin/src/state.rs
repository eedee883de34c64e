//! Application state shared across admin handlers.

use std::sync::Arc;

use sqlx::PgPool;

use chowline_core::image::ImageResolver;

use crate::config::AdminConfig;
use crate::services::UploadStore;

/// Application state shared across all handlers.
///
/// Cheap to clone (uses `Arc` internally).
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    images: ImageResolver,
    uploads: UploadStore,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: AdminConfig, pool: PgPool) -> Self {
        let images = ImageResolver::new(&config.asset_origin);
        let uploads = UploadStore::new(config.uploads_dir.clone(), config.max_upload_bytes);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                images,
                uploads,
            }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the database pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Resolver for product image URLs.
    #[must_use]
    pub fn images(&self) -> &ImageResolver {
        &self.inner.images
    }

    /// Image upload storage.
    #[must_use]
    pub fn uploads(&self) -> &UploadStore {
        &self.inner.uploads
    }
}
