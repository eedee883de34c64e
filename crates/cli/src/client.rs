//! HTTP client for a running storefront.
//!
//! Keeps the session cookie between calls so a login is followed by
//! authenticated requests. Sign-in calls go through [`RetryPolicy`].

use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::retry::{RetryPolicy, Timeout};

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from storefront calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The storefront answered with an error status.
    #[error("storefront returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    /// The base URL could not be used.
    #[error("invalid storefront URL: {0}")]
    InvalidUrl(String),
}

impl Timeout for ClientError {
    fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }
}

/// Signed-in account as reported by the storefront.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub id: i32,
    pub email: String,
    pub username: String,
}

/// A menu entry as listed by the storefront.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuItem {
    pub id: i32,
    pub name: String,
    pub price_display: String,
    pub available: bool,
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct NewAccount<'a> {
    email: &'a str,
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Storefront API client.
pub struct StorefrontClient {
    client: reqwest::Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl StorefrontClient {
    /// Create a client for the storefront at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUrl` for an unparsable or non-http URL.
    /// Returns `ClientError::Http` if the HTTP client fails to build.
    pub fn new(base_url: &str, retry: RetryPolicy) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "{base_url}: scheme must be http or https"
            )));
        }

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url,
            retry,
        })
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(format!("{path}: {e}")))
    }

    /// Sign in. Timeouts are retried per the client's policy.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` for rejected credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<Account, ClientError> {
        let url = &self.url("/auth/login")?;
        let body = &Credentials { email, password };
        self.retry
            .run(move || async move {
                let response = self.client.post(url.clone()).json(body).send().await?;
                read_json(response).await
            })
            .await
    }

    /// Register a customer account. Timeouts are retried per the client's
    /// policy.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` for invalid input or a taken email.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<Account, ClientError> {
        let url = &self.url("/auth/register")?;
        let body = &NewAccount {
            email,
            username,
            password,
        };
        self.retry
            .run(move || async move {
                let response = self.client.post(url.clone()).json(body).send().await?;
                read_json(response).await
            })
            .await
    }

    /// List the menu, including sold-out items.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the request fails.
    pub async fn menu(&self) -> Result<Vec<MenuItem>, ClientError> {
        let url = self.url("/api/products?all=true")?;
        let response = self.client.get(url).send().await?;
        read_json(response).await
    }
}

/// Decode a success body, or turn an error status into `ClientError::Api`.
async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text).map_or(text, |body| body.error);
    Err(ClientError::Api { status, message })
}
