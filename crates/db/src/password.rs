//! Password hashing with Argon2id.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length accepted before hashing.
pub const MAX_PASSWORD_LENGTH: usize = 256;

/// Password validation and hashing errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("password must be at least {} characters", MIN_PASSWORD_LENGTH)]
    TooShort,
    #[error("password must be at most {} characters", MAX_PASSWORD_LENGTH)]
    TooLong,
    #[error("passwords do not match")]
    Mismatch,
    #[error("password hashing failed")]
    Hash,
    #[error("invalid password")]
    Invalid,
}

/// Check password length requirements.
///
/// # Errors
///
/// Returns `PasswordError::TooShort` or `PasswordError::TooLong`.
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort);
    }
    if len > MAX_PASSWORD_LENGTH {
        return Err(PasswordError::TooLong);
    }
    Ok(())
}

/// Validate a new password and its confirmation.
///
/// # Errors
///
/// Returns `PasswordError::Mismatch` if the two differ, otherwise the result
/// of [`validate_password`].
pub fn validate_new_password(password: &str, confirmation: &str) -> Result<(), PasswordError> {
    if password != confirmation {
        return Err(PasswordError::Mismatch);
    }
    validate_password(password)
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `PasswordError::Hash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| PasswordError::Hash)
}

/// Verify a password against a stored hash.
///
/// # Errors
///
/// Returns `PasswordError::Invalid` if the password does not match or the
/// stored hash cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::Invalid)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::Invalid)
}
