//! Chowline CLI - Database and storefront management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations (schema and session tables)
//! chow-cli migrate
//!
//! # Create an admin user
//! chow-cli admin create -e admin@example.com -u "Kitchen Lead" --password '...'
//!
//! # Promote an existing account
//! chow-cli admin promote -e manager@example.com
//!
//! # Load the menu
//! chow-cli seed menu menu.yaml --replace
//!
//! # Talk to a running storefront
//! chow-cli shop menu
//! chow-cli shop login -e diner@example.com -p '...'
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `admin` - Create and promote admin users
//! - `seed menu` - Insert products from a YAML file
//! - `shop` - Storefront login, registration and menu

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod client;
mod commands;
mod retry;

#[derive(Parser)]
#[command(name = "chow-cli")]
#[command(author, version, about = "Chowline CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Use a running storefront
    Shop {
        /// Storefront base URL
        #[arg(long, env = "STOREFRONT_BASE_URL", default_value = "http://localhost:3000")]
        url: String,

        #[command(subcommand)]
        action: ShopAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin display name
        #[arg(short, long)]
        username: String,

        /// Admin password
        #[arg(long, env = "CHOWLINE_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Give an existing account the admin role
    Promote {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert products from a YAML file
    Menu {
        /// Path to the menu file
        file: String,

        /// Delete existing products first
        #[arg(long)]
        replace: bool,
    },
}

#[derive(Subcommand)]
enum ShopAction {
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Register a customer account
    Register {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },
    /// List the menu
    Menu,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                username,
                password,
            } => {
                commands::admin::create_user(&email, &username, &password).await?;
            }
            AdminAction::Promote { email } => commands::admin::promote(&email).await?,
        },
        Commands::Seed { target } => match target {
            SeedTarget::Menu { file, replace } => commands::seed::menu(&file, replace).await?,
        },
        Commands::Shop { url, action } => match action {
            ShopAction::Login { email, password } => {
                commands::shop::login(&url, &email, &password).await?;
            }
            ShopAction::Register {
                email,
                username,
                password,
            } => commands::shop::register(&url, &email, &username, &password).await?,
            ShopAction::Menu => commands::shop::menu(&url).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_seed_menu_args() {
        let cli = Cli::try_parse_from(["chow-cli", "seed", "menu", "menu.yaml", "--replace"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Seed {
                target: SeedTarget::Menu { replace: true, .. }
            })
        ));
    }
}
