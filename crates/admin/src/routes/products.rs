//! Product management route handlers.
//!
//! The storefront caches its menu for a short while, so changes made here
//! can take up to a minute to appear there.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use tracing::instrument;

use chowline_core::ProductId;
use chowline_db::ProductRepository;
use chowline_db::models::{InputError, NewProduct, ProductUpdate};

use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::RequireAdmin;
use crate::models::AdminProduct;
use crate::state::AppState;

fn invalid(err: InputError) -> AppError {
    AppError::BadRequest(err.to_string())
}

/// Every product, unavailable ones included.
#[instrument(skip(state, _admin))]
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<AdminProduct>>> {
    let products = ProductRepository::new(state.pool()).list(true).await?;
    Ok(Json(
        products
            .into_iter()
            .map(|p| AdminProduct::new(p, state.images()))
            .collect(),
    ))
}

/// Create a product.
#[instrument(skip(state, admin, product), fields(admin_id = %admin.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiJson(product): ApiJson<NewProduct>,
) -> Result<(StatusCode, Json<AdminProduct>)> {
    let product = product.validate().map_err(invalid)?;
    let created = ProductRepository::new(state.pool()).create(&product).await?;
    tracing::info!(product_id = %created.id, "product created");

    Ok((
        StatusCode::CREATED,
        Json(AdminProduct::new(created, state.images())),
    ))
}

/// Update some fields of a product.
#[instrument(skip(state, admin, update), fields(admin_id = %admin.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<i32>,
    ApiJson(update): ApiJson<ProductUpdate>,
) -> Result<Json<AdminProduct>> {
    let update = update.validate().map_err(invalid)?;
    let updated = ProductRepository::new(state.pool())
        .update(ProductId::new(id), &update)
        .await?;
    tracing::info!(product_id = %updated.id, "product updated");

    Ok(Json(AdminProduct::new(updated, state.images())))
}

/// Delete a product. Past orders keep the item name and price.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<i32>,
) -> Result<StatusCode> {
    ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await?;
    tracing::info!(product_id = id, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}
