//! Email service for password reset messages.
//!
//! Uses SMTP via lettre for delivery with Askama templates.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::SmtpConfig;

/// HTML template for the password reset email.
#[derive(Template)]
#[template(path = "email/password_reset.html")]
struct PasswordResetEmailHtml<'a> {
    username: &'a str,
    reset_url: &'a str,
    valid_minutes: i64,
}

/// Plain text template for the password reset email.
#[derive(Template)]
#[template(path = "email/password_reset.txt")]
struct PasswordResetEmailText<'a> {
    username: &'a str,
    reset_url: &'a str,
    valid_minutes: i64,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Build the link a customer follows to choose a new password.
#[must_use]
pub fn reset_url(base_url: &str, token: &str) -> String {
    format!(
        "{}/reset-password?token={token}",
        base_url.trim_end_matches('/')
    )
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &SmtpConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.username.clone(),
            config.password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Send the password reset link.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_password_reset(
        &self,
        to: &str,
        username: &str,
        reset_url: &str,
        valid_minutes: i64,
    ) -> Result<(), EmailError> {
        let html = PasswordResetEmailHtml {
            username,
            reset_url,
            valid_minutes,
        }
        .render()?;
        let text = PasswordResetEmailText {
            username,
            reset_url,
            valid_minutes,
        }
        .render()?;

        self.send_multipart_email(to, "Reset your Chowline password", &text, &html)
            .await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(subject = %subject, "Email sent successfully");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_url() {
        assert_eq!(
            reset_url("https://shop.chowline.test/", "abc_123"),
            "https://shop.chowline.test/reset-password?token=abc_123"
        );
    }

    #[test]
    fn test_templates_render_link() {
        let text = PasswordResetEmailText {
            username: "Ada",
            reset_url: "https://shop.chowline.test/reset-password?token=t",
            valid_minutes: 60,
        }
        .render()
        .unwrap();
        assert!(text.contains("Hi Ada"));
        assert!(text.contains("https://shop.chowline.test/reset-password?token=t"));
        assert!(text.contains("60 minutes"));

        let html = PasswordResetEmailHtml {
            username: "<Ada>",
            reset_url: "https://shop.chowline.test/reset-password?token=t",
            valid_minutes: 60,
        }
        .render()
        .unwrap();
        assert!(html.contains("&#60;Ada&#62;") || html.contains("&lt;Ada&gt;"));
    }
}
