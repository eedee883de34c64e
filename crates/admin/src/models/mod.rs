//! Types owned by the admin service.

pub mod product;
pub mod session;

pub use product::AdminProduct;
pub use session::{CurrentAdmin, keys as session_keys};
