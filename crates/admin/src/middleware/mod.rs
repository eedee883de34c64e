//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions, separate table from the storefront)
//! 5. Security headers
//!
//! Authorization is enforced per handler by the [`RequireAdmin`] extractor.

pub mod auth;
pub mod headers;
pub mod session;

pub use auth::{RequireAdmin, clear_current_admin, set_current_admin};
pub use headers::{request_id, security_headers};
pub use session::{SESSION_TABLE, create_session_layer, session_store};
