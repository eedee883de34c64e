//! Admin authentication service.
//!
//! Admins and customers share the `users` table. Sign-in checks the
//! password first and the role second, so the role of an account is never
//! revealed to someone without its password.

mod error;

pub use error::AdminAuthError;

use sqlx::PgPool;

use chowline_core::Email;
use chowline_db::UserRepository;
use chowline_db::password::verify_password;

use crate::models::CurrentAdmin;

/// Admin authentication service.
pub struct AdminAuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new admin authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AdminAuthError::InvalidCredentials` if the email/password is wrong.
    /// Returns `AdminAuthError::NotAdmin` if the account is a customer.
    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentAdmin, AdminAuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AdminAuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        CurrentAdmin::from_user(&user).ok_or_else(|| {
            tracing::warn!(user_id = %user.id, "non-admin account attempted admin sign-in");
            AdminAuthError::NotAdmin
        })
    }
}
