//! Product repository.

use sqlx::PgPool;

use chowline_core::ProductId;

use crate::RepositoryError;
use crate::models::{NewProduct, Product, ProductCounts, ProductUpdate};

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, image_url, available, created_at, updated_at";

/// Repository for the menu.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products by name. Unavailable products are only included when
    /// `include_unavailable` is set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, include_unavailable: bool) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE available OR $1 \
             ORDER BY name, id"
        ))
        .bind(include_unavailable)
        .fetch_all(self.pool)
        .await?;
        Ok(products)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(product)
    }

    /// Get several products at once. Missing IDs are skipped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<i32> = ids.iter().map(ProductId::as_i32).collect();
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"
        ))
        .bind(raw)
        .fetch_all(self.pool)
        .await?;
        Ok(products)
    }

    /// Insert a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let created = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (name, description, price, image_url, available) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.image_url)
        .bind(product.available)
        .fetch_one(self.pool)
        .await?;
        Ok(created)
    }

    /// Apply a partial update. An empty `image_url` clears the image.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET \
                 name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 price = COALESCE($4, price), \
                 image_url = CASE WHEN $5::text IS NULL THEN image_url ELSE NULLIF($5, '') END, \
                 available = COALESCE($6, available), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(&update.name)
        .bind(&update.description)
        .bind(update.price)
        .bind(&update.image_url)
        .bind(update.available)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a product. Order items referencing it keep their snapshots.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete every product. Used when re-seeding the menu.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM products")
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Total and available product counts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn counts(&self) -> Result<ProductCounts, RepositoryError> {
        let counts = sqlx::query_as::<_, ProductCounts>(
            "SELECT COUNT(*) AS total, COUNT(*) FILTER (WHERE available) AS available \
             FROM products",
        )
        .fetch_one(self.pool)
        .await?;
        Ok(counts)
    }
}
