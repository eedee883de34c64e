//! Session cart persistence.

use tower_sessions::Session;

use chowline_core::cart::Cart;

use crate::models::session_keys;

/// Load the cart from the session. A missing cart is empty.
///
/// # Errors
///
/// Returns an error if the session store fails or the stored cart cannot be
/// decoded.
pub async fn load_cart(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Store the cart in the session. An empty cart removes the key.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_cart(
    session: &Session,
    cart: &Cart,
) -> Result<(), tower_sessions::session::Error> {
    if cart.is_empty() {
        session.remove::<Cart>(session_keys::CART).await?;
        return Ok(());
    }
    session.insert(session_keys::CART, cart).await
}
