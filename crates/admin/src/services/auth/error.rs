//! Admin authentication error types.

use thiserror::Error;

use chowline_db::RepositoryError;
use chowline_db::password::PasswordError;

/// Errors that can occur during admin sign-in.
#[derive(Debug, Error)]
pub enum AdminAuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] chowline_core::EmailError),

    /// Unknown email or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The password was right but the account is not an admin.
    #[error("account is not an admin")]
    NotAdmin,

    /// Stored hash could not be processed.
    #[error("password hashing failed")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<PasswordError> for AdminAuthError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::Hash => Self::PasswordHash,
            _ => Self::InvalidCredentials,
        }
    }
}
