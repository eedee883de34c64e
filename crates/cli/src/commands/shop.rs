//! Storefront commands.
//!
//! Talk to a running storefront the way a customer's browser does.
//!
//! ```bash
//! chow-cli shop --url http://localhost:3000 menu
//! chow-cli shop login -e diner@example.com -p 'hunter2hunter2'
//! ```

use crate::client::{ClientError, StorefrontClient};
use crate::retry::RetryPolicy;

fn client(base_url: &str) -> Result<StorefrontClient, ClientError> {
    StorefrontClient::new(base_url, RetryPolicy::default())
}

/// Sign in and report the account.
///
/// # Errors
///
/// Returns `ClientError` if the storefront rejects the login or cannot be
/// reached.
pub async fn login(base_url: &str, email: &str, password: &str) -> Result<(), ClientError> {
    let account = client(base_url)?.login(email, password).await?;
    tracing::info!(
        "Signed in as {} <{}> (ID {})",
        account.username,
        account.email,
        account.id
    );
    Ok(())
}

/// Register a customer account.
///
/// # Errors
///
/// Returns `ClientError` if the storefront rejects the registration or
/// cannot be reached.
pub async fn register(
    base_url: &str,
    email: &str,
    username: &str,
    password: &str,
) -> Result<(), ClientError> {
    let account = client(base_url)?
        .register(email, username, password)
        .await?;
    tracing::info!(
        "Registered {} <{}> (ID {})",
        account.username,
        account.email,
        account.id
    );
    Ok(())
}

/// Print the menu.
///
/// # Errors
///
/// Returns `ClientError` if the storefront cannot be reached.
pub async fn menu(base_url: &str) -> Result<(), ClientError> {
    let items = client(base_url)?.menu().await?;

    tracing::info!("{} menu items", items.len());
    for item in items {
        let badge = if item.available { "" } else { " (sold out)" };
        tracing::info!("  #{:<4} {:<40} {}{badge}", item.id, item.name, item.price_display);
    }
    Ok(())
}
