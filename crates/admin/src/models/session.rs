//! Session-related types for admin authentication.

use serde::{Deserialize, Serialize};

use chowline_core::{Email, UserId};
use chowline_db::models::User;

/// Session-stored admin identity.
///
/// Only written after the role check at login, so holding one implies the
/// account was an admin when it signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub id: UserId,
    pub email: Email,
    pub username: String,
}

impl CurrentAdmin {
    /// Build the session identity for an admin account.
    ///
    /// Returns `None` for any other role.
    #[must_use]
    pub fn from_user(user: &User) -> Option<Self> {
        user.is_admin().then(|| Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
        })
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use chowline_core::UserRole;

    use super::*;

    fn user(role: UserRole) -> User {
        User {
            id: UserId::new(4),
            email: Email::parse("chef@chowline.test").unwrap(),
            username: "Chef".to_string(),
            phone: None,
            address: None,
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_only_admins_get_a_session_identity() {
        let admin = CurrentAdmin::from_user(&user(UserRole::Admin)).unwrap();
        assert_eq!(admin.id, UserId::new(4));
        assert_eq!(admin.username, "Chef");

        assert!(CurrentAdmin::from_user(&user(UserRole::Customer)).is_none());
    }
}
