//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `CHOWLINE_ASSET_ORIGIN` - Origin for product images (default: base URL)
//! - `CHOWLINE_UPLOADS_DIR` - Directory holding uploaded images (default: uploads)
//! - `CHOWLINE_CURRENCY` - Store currency (default: NGN)
//! - `SMTP_HOST`, `SMTP_PORT`, `SMTP_USERNAME`, `SMTP_PASSWORD`, `SMTP_FROM` -
//!   Outgoing mail for password resets. Either all of host, username, password
//!   and from are set, or none.
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use chowline_core::CurrencyCode;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Origin used to build absolute product image URLs
    pub asset_origin: String,
    /// Directory uploaded images are served from
    pub uploads_dir: PathBuf,
    /// Store currency
    pub currency: CurrencyCode,
    /// Outgoing mail; password reset links are only logged when unset
    pub smtp: Option<SmtpConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

/// SMTP relay configuration.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    pub from_address: String,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let database_url = env.database_url("STOREFRONT_DATABASE_URL")?;
        let host = env.parsed_or("STOREFRONT_HOST", "127.0.0.1")?;
        let port = env.parsed_or("STOREFRONT_PORT", "3000")?;
        let base_url = env.url("STOREFRONT_BASE_URL")?;
        let asset_origin = match env.optional("CHOWLINE_ASSET_ORIGIN") {
            Some(_) => env.url("CHOWLINE_ASSET_ORIGIN")?,
            None => base_url.clone(),
        };
        let uploads_dir = PathBuf::from(env.or_default("CHOWLINE_UPLOADS_DIR", "uploads"));
        let currency = env.parsed_or("CHOWLINE_CURRENCY", "NGN")?;
        let smtp = SmtpConfig::from_env(&env)?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            asset_origin,
            uploads_dir,
            currency,
            smtp,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.parsed_or("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: env.parsed_or("SENTRY_TRACES_SAMPLE_RATE", "0.1")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl SmtpConfig {
    fn from_env(env: &Env<'_>) -> Result<Option<Self>, ConfigError> {
        let Some(host) = env.optional("SMTP_HOST") else {
            return Ok(None);
        };

        Ok(Some(Self {
            host,
            port: env.parsed_or("SMTP_PORT", "587")?,
            username: env.required("SMTP_USERNAME")?,
            password: SecretString::from(env.required("SMTP_PASSWORD")?),
            from_address: env.required("SMTP_FROM")?,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with the usual required/optional/default helpers.
struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional variable; blank counts as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parsed_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Get a required absolute http(s) URL without a trailing slash.
    fn url(&self, key: &str) -> Result<String, ConfigError> {
        let raw = self.required(key)?;
        let parsed = Url::parse(raw.trim())
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                "must be an http or https URL".to_string(),
            ));
        }
        Ok(raw.trim().trim_end_matches('/').to_string())
    }

    /// Get database URL with fallback to generic `DATABASE_URL`.
    fn database_url(&self, primary_key: &str) -> Result<SecretString, ConfigError> {
        self.optional(primary_key)
            .or_else(|| self.optional("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| map.get(key).cloned())
    }

    const MINIMAL: &[(&str, &str)] = &[
        ("STOREFRONT_DATABASE_URL", "postgres://localhost/chowline"),
        ("STOREFRONT_BASE_URL", "https://shop.chowline.test/"),
    ];

    #[test]
    fn test_defaults() {
        let config = load(MINIMAL).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host.to_string(), "127.0.0.1");
        assert_eq!(config.base_url, "https://shop.chowline.test");
        assert_eq!(config.asset_origin, config.base_url);
        assert_eq!(config.uploads_dir, PathBuf::from("uploads"));
        assert_eq!(config.currency, CurrencyCode::NGN);
        assert!(config.smtp.is_none());
        assert!(config.is_secure());
    }

    #[test]
    fn test_database_url_falls_back_to_generic() {
        let config = load(&[
            ("DATABASE_URL", "postgres://fallback/db"),
            ("STOREFRONT_BASE_URL", "http://localhost:3000"),
        ])
        .unwrap();
        assert_eq!(config.database_url.expose_secret(), "postgres://fallback/db");
        assert!(!config.is_secure());
    }

    #[test]
    fn test_missing_base_url() {
        let err = load(&[("STOREFRONT_DATABASE_URL", "postgres://x/y")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "STOREFRONT_BASE_URL"));
    }

    #[test]
    fn test_invalid_port() {
        let mut vars = MINIMAL.to_vec();
        vars.push(("STOREFRONT_PORT", "eighty"));
        let err = load(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "STOREFRONT_PORT"));
    }

    #[test]
    fn test_asset_origin_must_be_http() {
        let mut vars = MINIMAL.to_vec();
        vars.push(("CHOWLINE_ASSET_ORIGIN", "ftp://files.example.com"));
        assert!(load(&vars).is_err());
    }

    #[test]
    fn test_partial_smtp_config_is_rejected() {
        let mut vars = MINIMAL.to_vec();
        vars.push(("SMTP_HOST", "smtp.example.com"));
        let err = load(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "SMTP_USERNAME"));
    }

    #[test]
    fn test_smtp_debug_redacts_password() {
        let mut vars = MINIMAL.to_vec();
        vars.extend([
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_USERNAME", "mailer"),
            ("SMTP_PASSWORD", "hunter2-but-longer"),
            ("SMTP_FROM", "Chowline <orders@chowline.test>"),
        ]);
        let config = load(&vars).unwrap();
        let smtp = config.smtp.unwrap();
        assert_eq!(smtp.port, 587);
        let debug = format!("{smtp:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }
}
