//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Password sign-in restricted to admin accounts
//! - `stats` - Dashboard figures gathered concurrently
//! - `uploads` - Product image validation and storage

pub mod auth;
pub mod stats;
pub mod uploads;

pub use auth::{AdminAuthError, AdminAuthService};
pub use stats::DashboardStats;
pub use uploads::{UploadError, UploadStore};
