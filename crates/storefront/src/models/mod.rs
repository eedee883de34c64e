//! Request and response models for the storefront.

pub mod session;
pub mod views;

pub use session::{CurrentUser, keys as session_keys};
pub use views::{CartLineView, CartView, ProductView};
