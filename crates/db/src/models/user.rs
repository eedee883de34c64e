//! User accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chowline_core::{Email, UserId, UserRole};

use super::{InputError, optional_text, required_text};

/// Maximum length of a username.
pub const MAX_USERNAME_LENGTH: usize = 64;

/// A customer or admin account. The password hash is never loaded into this
/// type.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub username: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether the account may use the back-office.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Data for a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub username: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: UserRole,
}

impl NewUser {
    /// Build a customer account, normalizing the free-text fields.
    ///
    /// # Errors
    ///
    /// Returns `InputError` if the username is blank or too long.
    pub fn customer(
        email: Email,
        username: &str,
        phone: Option<String>,
        address: Option<String>,
    ) -> Result<Self, InputError> {
        Ok(Self {
            email,
            username: required_text("username", username, MAX_USERNAME_LENGTH)?,
            phone: optional_text(phone),
            address: optional_text(address),
            role: UserRole::Customer,
        })
    }

    /// Build an admin account.
    ///
    /// # Errors
    ///
    /// Returns `InputError` if the username is blank or too long.
    pub fn admin(email: Email, username: &str) -> Result<Self, InputError> {
        Ok(Self {
            email,
            username: required_text("username", username, MAX_USERNAME_LENGTH)?,
            phone: None,
            address: None,
            role: UserRole::Admin,
        })
    }
}

/// Partial profile update from the customer dashboard.
///
/// `None` leaves a field unchanged. An empty phone or address clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl ProfileUpdate {
    /// Trim fields and reject a blank username.
    ///
    /// # Errors
    ///
    /// Returns `InputError` if a provided username is blank or too long.
    pub fn validate(self) -> Result<Self, InputError> {
        let username = self
            .username
            .map(|u| required_text("username", &u, MAX_USERNAME_LENGTH))
            .transpose()?;

        Ok(Self {
            username,
            phone: self.phone.map(|p| p.trim().to_string()),
            address: self.address.map(|a| a.trim().to_string()),
        })
    }

    /// Whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.username.is_none() && self.phone.is_none() && self.address.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_trims_fields() {
        let email = Email::parse("ada@example.com").unwrap();
        let user = NewUser::customer(email, "  ada ", Some("  ".into()), Some(" 1 Marina ".into()))
            .unwrap();
        assert_eq!(user.username, "ada");
        assert_eq!(user.phone, None);
        assert_eq!(user.address.as_deref(), Some("1 Marina"));
        assert_eq!(user.role, UserRole::Customer);
    }

    #[test]
    fn test_blank_username_is_rejected() {
        let email = Email::parse("ada@example.com").unwrap();
        let err = NewUser::customer(email, "   ", None, None).unwrap_err();
        assert_eq!(err.to_string(), "username is required");
    }

    #[test]
    fn test_profile_update_keeps_empty_phone_for_clearing() {
        let update = ProfileUpdate {
            username: None,
            phone: Some("  ".into()),
            address: None,
        }
        .validate()
        .unwrap();
        assert_eq!(update.phone.as_deref(), Some(""));
        assert!(!update.is_empty());
    }

    #[test]
    fn test_profile_update_rejects_blank_username() {
        let result = ProfileUpdate {
            username: Some(String::new()),
            ..ProfileUpdate::default()
        }
        .validate();
        assert!(result.is_err());
    }
}
