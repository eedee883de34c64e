//! Menu route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use chowline_core::ProductId;
use chowline_db::ProductRepository;

use crate::error::{AppError, Result};
use crate::extract::{ApiPath, ApiQuery};
use crate::models::ProductView;
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Include unavailable products (shown with a "sold out" badge).
    #[serde(default)]
    pub all: bool,
}

/// List the menu.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Vec<ProductView>>> {
    let products = state.menu().products(state.pool(), query.all).await?;
    let currency = state.config().currency;

    Ok(Json(
        products
            .iter()
            .map(|p| ProductView::new(p, state.images(), currency))
            .collect(),
    ))
}

/// Show one product.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ProductView>> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

    Ok(Json(ProductView::new(
        &product,
        state.images(),
        state.config().currency,
    )))
}
