//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a new admin (password prompted from the environment)
//! CHOWLINE_ADMIN_PASSWORD=... chow-cli admin create -e admin@example.com -u "Kitchen Lead"
//!
//! # Grant admin access to an existing customer account
//! chow-cli admin promote -e manager@example.com
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string
//! - `CHOWLINE_ADMIN_PASSWORD` - Password for `admin create` when `--password` is omitted

use chowline_core::{Email, UserRole};
use chowline_db::models::NewUser;
use chowline_db::password::{PasswordError, hash_password, validate_password};
use chowline_db::{RepositoryError, UserRepository};
use thiserror::Error;

use super::{CommandError, connect};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Connection or configuration problem.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Invalid username.
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    /// Password rejected or hashing failed.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// User already exists.
    #[error("A user already exists with email: {0}")]
    UserExists(String),

    /// No user has the email.
    #[error("No user found with email: {0}")]
    UserNotFound(String),

    /// Repository failure.
    #[error(transparent)]
    Repository(RepositoryError),
}

/// Check the inputs for `admin create` before touching the database.
fn prepare(email: &str, username: &str, password: &str) -> Result<NewUser, AdminError> {
    let email = Email::parse(email).map_err(|_| AdminError::InvalidEmail(email.to_owned()))?;
    validate_password(password)?;
    NewUser::admin(email, username).map_err(|e| AdminError::InvalidUsername(e.to_string()))
}

/// Create a new admin user.
///
/// # Returns
///
/// The ID of the created admin user.
///
/// # Errors
///
/// Returns `AdminError` for invalid input, an existing email, or a database
/// failure.
pub async fn create_user(email: &str, username: &str, password: &str) -> Result<i32, AdminError> {
    let new_user = prepare(email, username, password)?;
    let password_hash = hash_password(password)?;

    let pool = connect().await?;

    tracing::info!("Creating admin user: {}", new_user.email);

    let user = UserRepository::new(&pool)
        .create(&new_user, &password_hash)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AdminError::UserExists(email.to_owned()),
            other => AdminError::Repository(other),
        })?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}",
        user.id,
        user.email
    );

    Ok(user.id.as_i32())
}

/// Give an existing account the admin role.
///
/// # Errors
///
/// Returns `AdminError::UserNotFound` if no account has the email.
pub async fn promote(email: &str) -> Result<(), AdminError> {
    let parsed = Email::parse(email).map_err(|_| AdminError::InvalidEmail(email.to_owned()))?;

    let pool = connect().await?;

    let user = UserRepository::new(&pool)
        .set_role(&parsed, UserRole::Admin)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AdminError::UserNotFound(email.to_owned()),
            other => AdminError::Repository(other),
        })?;

    tracing::info!("{} ({}) is now an admin", user.username, user.email);
    Ok(())
}
