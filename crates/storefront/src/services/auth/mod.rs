//! Authentication service.
//!
//! Provides password registration, login and the forgot/reset password flow.

mod error;

pub use error::AuthError;

use serde::Deserialize;
use sqlx::PgPool;

use chowline_core::{Email, UserId};
use chowline_db::RepositoryError;
use chowline_db::models::{NewUser, User};
use chowline_db::password::{hash_password, validate_new_password, validate_password, verify_password};
use chowline_db::password_resets::IssuedResetToken;
use chowline_db::{PasswordResetRepository, UserRepository};

/// Registration form.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Authentication service.
///
/// Handles user registration, login and password resets.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    resets: PasswordResetRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
            resets: PasswordResetRepository::new(pool),
        }
    }

    /// Register a new customer with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::InvalidInput` if the username is blank.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(&self, form: Registration) -> Result<User, AuthError> {
        let email = Email::parse(&form.email)?;
        let new_user = NewUser::customer(email, &form.username, form.phone, form.address)?;

        validate_password(&form.password)?;
        let password_hash = hash_password(&form.password)?;

        let user = self
            .users
            .create(&new_user, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "customer registered");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Issue a reset token for the account with this email.
    ///
    /// Returns `None` when no account matches; callers should respond the
    /// same way in both cases.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn request_password_reset(
        &self,
        email: &str,
    ) -> Result<Option<(User, IssuedResetToken)>, AuthError> {
        let email = Email::parse(email)?;

        let Some(user) = self.users.get_by_email(&email).await? else {
            tracing::info!("password reset requested for unknown email");
            return Ok(None);
        };

        let token = self.resets.issue(user.id).await?;
        tracing::info!(user_id = %user.id, "password reset token issued");
        Ok(Some((user, token)))
    }

    /// Set a new password using a single-use reset token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the password is invalid or does
    /// not match its confirmation.
    /// Returns `AuthError::InvalidResetToken` if the token is unknown, used or expired.
    pub async fn reset_password(
        &self,
        token: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<UserId, AuthError> {
        validate_new_password(password, password_confirm)?;
        let password_hash = hash_password(password)?;

        let user_id = self
            .resets
            .reset_password(token, &password_hash)
            .await?
            .ok_or(AuthError::InvalidResetToken)?;

        tracing::info!(user_id = %user_id, "password reset completed");
        Ok(user_id)
    }
}
