//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! chow-cli migrate
//! ```
//!
//! Applies the embedded schema migrations, then creates the session tables
//! for both services (`tower_sessions.session` for the storefront and
//! `tower_sessions.admin_session` for the admin service).

use tower_sessions_sqlx_store::PostgresStore;

use super::connect;

/// Run schema migrations and create the session tables.
///
/// # Errors
///
/// Returns an error if the connection or any migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;

    tracing::info!("Running schema migrations...");
    chowline_db::MIGRATOR.run(&pool).await?;

    tracing::info!("Creating storefront session table...");
    PostgresStore::new(pool.clone()).migrate().await?;

    tracing::info!("Creating admin session table...");
    chowline_admin::middleware::session_store(&pool).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
