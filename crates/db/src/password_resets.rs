//! Password reset tokens.
//!
//! A reset token is a random string mailed to the user. Only its SHA-256
//! digest is stored, and a token can be consumed once before it expires.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use sqlx::PgPool;

use chowline_core::UserId;

use crate::RepositoryError;

/// How long a reset token stays valid.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 60;

/// Number of random bytes in a reset token.
const TOKEN_BYTES: usize = 32;

/// A freshly issued token. `token` is the only copy of the plaintext.
#[derive(Debug, Clone)]
pub struct IssuedResetToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Generate a URL-safe random token.
#[must_use]
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Hex-encoded SHA-256 of a token, as stored in the database.
#[must_use]
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.trim().as_bytes()))
}

/// Repository for password reset tokens.
pub struct PasswordResetRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PasswordResetRepository<'a> {
    /// Create a new reset token repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Issue a token for a user, invalidating any earlier unused tokens.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn issue(&self, user_id: UserId) -> Result<IssuedResetToken, RepositoryError> {
        let token = generate_token();
        let expires_at = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE password_reset_tokens SET used_at = now() \
             WHERE user_id = $1 AND used_at IS NULL",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO password_reset_tokens (user_id, token_hash, expires_at) \
             VALUES ($1, $2, $3)",
        )
        .bind(user_id)
        .bind(hash_token(&token))
        .bind(expires_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(IssuedResetToken { token, expires_at })
    }

    /// Consume a token and store the new password hash in one transaction.
    ///
    /// Returns `None` if the token is unknown, expired or already used. If
    /// the password update fails the token stays usable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the token's user no longer exists.
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn reset_password(
        &self,
        token: &str,
        password_hash: &str,
    ) -> Result<Option<UserId>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let user_id: Option<UserId> = sqlx::query_scalar(
            "UPDATE password_reset_tokens SET used_at = now() \
             WHERE token_hash = $1 AND used_at IS NULL AND expires_at > now() \
             RETURNING user_id",
        )
        .bind(hash_token(token))
        .fetch_optional(&mut *tx)
        .await?;

        let Some(user_id) = user_id else {
            return Ok(None);
        };

        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1",
        )
        .bind(user_id)
        .bind(password_hash)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;
        Ok(Some(user_id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_tokens_are_url_safe_and_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
        assert!(
            a.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_hash_is_stable_hex_sha256() {
        assert_eq!(
            hash_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(hash_token(" abc\n"), hash_token("abc"));
    }
}
