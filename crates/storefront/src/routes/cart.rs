//! Cart route handlers.
//!
//! The cart is kept in the session. Each line stores a name and price
//! snapshot for display; checkout re-prices from the product records.

use axum::{Json, extract::State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use chowline_core::ProductId;
use chowline_core::cart::CartLine;
use chowline_db::ProductRepository;

use crate::error::{AppError, Result};
use crate::extract::ApiJson;
use crate::models::CartView;
use crate::services::cart::{load_cart, save_cart};
use crate::services::orders::MAX_ITEM_QUANTITY;
use crate::state::AppState;

/// Add-to-cart request.
#[derive(Debug, Deserialize)]
pub struct AddToCart {
    pub product_id: ProductId,
    /// Defaults to 1.
    #[serde(default)]
    pub quantity: Option<u32>,
}

/// Quantity update request. A quantity of zero removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateCart {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Remove-line request.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCart {
    pub product_id: ProductId,
}

fn check_quantity(quantity: u32) -> Result<()> {
    if quantity > MAX_ITEM_QUANTITY {
        return Err(AppError::BadRequest(format!(
            "quantity must be at most {MAX_ITEM_QUANTITY}"
        )));
    }
    Ok(())
}

/// Show the cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartView::new(&cart, state.config().currency)))
}

/// Add a product to the cart, merging with an existing line.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    ApiJson(request): ApiJson<AddToCart>,
) -> Result<Json<CartView>> {
    let quantity = request.quantity.unwrap_or(1);
    if quantity == 0 {
        return Err(AppError::BadRequest("quantity must be at least 1".to_string()));
    }

    let product = ProductRepository::new(state.pool())
        .get(request.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;
    if !product.available {
        return Err(AppError::BadRequest(format!(
            "{} is currently unavailable",
            product.name
        )));
    }

    let mut cart = load_cart(&session).await?;
    let in_cart = cart
        .lines()
        .iter()
        .find(|l| l.product_id == product.id)
        .map_or(0, |l| l.quantity);
    check_quantity(in_cart.saturating_add(quantity))?;

    cart.add(CartLine {
        product_id: product.id,
        name: product.name,
        unit_price: Some(product.price),
        quantity,
    });
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::new(&cart, state.config().currency)))
}

/// Set the quantity of a line.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    ApiJson(request): ApiJson<UpdateCart>,
) -> Result<Json<CartView>> {
    check_quantity(request.quantity)?;

    let mut cart = load_cart(&session).await?;
    if !cart.set_quantity(request.product_id, request.quantity) {
        return Err(AppError::NotFound("Cart item".to_string()));
    }
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::new(&cart, state.config().currency)))
}

/// Remove a line. Removing a product that is not in the cart is a no-op.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    ApiJson(request): ApiJson<RemoveFromCart>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    if cart.remove(request.product_id) {
        save_cart(&session, &cart).await?;
    }
    Ok(Json(CartView::new(&cart, state.config().currency)))
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.clear();
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::new(&cart, state.config().currency)))
}
