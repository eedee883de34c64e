//! Cached product listing.
//!
//! The menu changes rarely and every page load fetches it, so listings are
//! kept in a short-lived `moka` cache keyed by whether unavailable products
//! are included.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use chowline_db::models::Product;
use chowline_db::{ProductRepository, RepositoryError};

/// How long a cached listing is served.
pub const MENU_CACHE_TTL: Duration = Duration::from_secs(60);

/// Menu cache shared through `AppState`.
#[derive(Clone)]
pub struct MenuCache {
    listings: Cache<bool, Arc<Vec<Product>>>,
}

impl MenuCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            listings: Cache::builder().max_capacity(2).time_to_live(ttl).build(),
        }
    }

    /// Get the product listing, loading it on a miss.
    ///
    /// Concurrent misses for the same key share one query. A failed load
    /// is not cached.
    ///
    /// # Errors
    ///
    /// Returns the shared `RepositoryError` if the listing has to be loaded
    /// and the query fails.
    pub async fn products(
        &self,
        pool: &PgPool,
        include_unavailable: bool,
    ) -> Result<Arc<Vec<Product>>, Arc<RepositoryError>> {
        self.get_or_load(include_unavailable, || async move {
            ProductRepository::new(pool).list(include_unavailable).await
        })
        .await
    }

    async fn get_or_load<F, Fut>(
        &self,
        include_unavailable: bool,
        load: F,
    ) -> Result<Arc<Vec<Product>>, Arc<RepositoryError>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Product>, RepositoryError>>,
    {
        self.listings
            .try_get_with(include_unavailable, async {
                let products = load().await?;
                tracing::debug!(
                    count = products.len(),
                    include_unavailable,
                    "menu cache refreshed"
                );
                Ok::<_, RepositoryError>(Arc::new(products))
            })
            .await
    }
}

impl Default for MenuCache {
    fn default() -> Self {
        Self::new(MENU_CACHE_TTL)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test]
    async fn test_concurrent_misses_share_one_load() {
        let cache = MenuCache::default();
        let loads = AtomicUsize::new(0);
        let loads = &loads;
        let load = || async move {
            loads.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok::<Vec<Product>, RepositoryError>(Vec::new())
        };

        let (a, b, c) = tokio::join!(
            cache.get_or_load(false, load),
            cache.get_or_load(false, load),
            cache.get_or_load(false, load),
        );
        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        cache.get_or_load(false, load).await.unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        cache.get_or_load(true, load).await.unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_load_is_retried() {
        let cache = MenuCache::default();
        let err = cache
            .get_or_load(false, || async {
                Err::<Vec<Product>, _>(RepositoryError::Database(sqlx::Error::PoolTimedOut))
            })
            .await
            .unwrap_err();
        assert!(matches!(*err, RepositoryError::Database(_)));

        let products = cache
            .get_or_load(false, || async {
                Ok::<Vec<Product>, RepositoryError>(Vec::new())
            })
            .await
            .unwrap();
        assert!(products.is_empty());
    }
}
