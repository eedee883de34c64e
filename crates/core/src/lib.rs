//! Chowline Core - Shared types and pure computations.
//!
//! This crate provides the types and calculations used across all Chowline
//! components:
//! - `storefront` - Public menu, cart, checkout and customer dashboard
//! - `admin` - Back-office order/product management and reporting
//! - `cli` - Command-line tools for migrations, seeding and smoke checks
//!
//! # Architecture
//!
//! The core crate contains only types, traits and arithmetic - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses
//! - [`cart`] - Cart lines and total computation
//! - [`revenue`] - Revenue aggregation by day, week or month
//! - [`image`] - Product image URL normalization and fallbacks

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod image;
pub mod revenue;
pub mod types;

pub use types::*;
