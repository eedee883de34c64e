//! Password reset against a migrated database.
//!
//! Requires `DATABASE_URL`; run with `--ignored`.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use secrecy::SecretString;
use sqlx::PgPool;

use chowline_core::Email;
use chowline_db::models::NewUser;
use chowline_db::password::{hash_password, verify_password};
use chowline_db::{PasswordResetRepository, UserRepository};
use chowline_integration_tests::unique_email;

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    chowline_db::create_pool(&SecretString::from(url))
        .await
        .expect("Failed to connect to database")
}

async fn stored_hash(pool: &PgPool, email: &Email) -> String {
    UserRepository::new(pool)
        .get_password_hash(email)
        .await
        .unwrap()
        .map(|(_, hash)| hash)
        .expect("user exists")
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_reset_updates_password_and_burns_token() {
    let pool = pool().await;
    let email = Email::parse(&unique_email()).unwrap();
    let user = NewUser::customer(email.clone(), "Ada", None, None).unwrap();
    let created = UserRepository::new(&pool)
        .create(&user, &hash_password("OldPassw0rd!").unwrap())
        .await
        .unwrap();

    let resets = PasswordResetRepository::new(&pool);
    let issued = resets.issue(created.id).await.unwrap();

    let reset = resets
        .reset_password(&issued.token, &hash_password("NewPassw0rd!").unwrap())
        .await
        .unwrap();
    assert_eq!(reset, Some(created.id));
    assert!(verify_password("NewPassw0rd!", &stored_hash(&pool, &email).await).is_ok());

    // A replayed token must not touch the password.
    let replay = resets
        .reset_password(&issued.token, &hash_password("Replay0Passw!").unwrap())
        .await
        .unwrap();
    assert_eq!(replay, None);
    assert!(verify_password("NewPassw0rd!", &stored_hash(&pool, &email).await).is_ok());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_superseded_token_leaves_password_unchanged() {
    let pool = pool().await;
    let email = Email::parse(&unique_email()).unwrap();
    let user = NewUser::customer(email.clone(), "Ada", None, None).unwrap();
    let created = UserRepository::new(&pool)
        .create(&user, &hash_password("OldPassw0rd!").unwrap())
        .await
        .unwrap();

    let resets = PasswordResetRepository::new(&pool);
    let first = resets.issue(created.id).await.unwrap();
    let second = resets.issue(created.id).await.unwrap();

    let stale = resets
        .reset_password(&first.token, &hash_password("NewPassw0rd!").unwrap())
        .await
        .unwrap();
    assert_eq!(stale, None);
    assert!(verify_password("OldPassw0rd!", &stored_hash(&pool, &email).await).is_ok());

    let fresh = resets
        .reset_password(&second.token, &hash_password("NewPassw0rd!").unwrap())
        .await
        .unwrap();
    assert_eq!(fresh, Some(created.id));
}
