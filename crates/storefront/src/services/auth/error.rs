//! Authentication error types.

use thiserror::Error;

use chowline_db::RepositoryError;
use chowline_db::models::InputError;
use chowline_db::password::PasswordError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] chowline_core::EmailError),

    /// Invalid profile input (e.g., blank username).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or confirmation mismatch.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Reset token unknown, expired or already used.
    #[error("invalid or expired reset token")]
    InvalidResetToken,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::Hash => Self::PasswordHash,
            PasswordError::Invalid => Self::InvalidCredentials,
            PasswordError::TooShort | PasswordError::TooLong | PasswordError::Mismatch => {
                Self::WeakPassword(err.to_string())
            }
        }
    }
}
