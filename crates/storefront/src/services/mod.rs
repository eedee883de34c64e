//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Registration, password login and password reset
//! - `cart` - Session cart persistence
//! - `email` - Transactional email (password reset)
//! - `menu` - Cached product listing
//! - `orders` - Order placement with server-side pricing

pub mod auth;
pub mod cart;
pub mod email;
pub mod menu;
pub mod orders;
