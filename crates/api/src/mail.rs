//! Confirmation-code mail delivery.
//!
//! [`SmtpMailer`] wraps the `lettre` async SMTP transport. When `SMTP_HOST`
//! is not set, [`SmtpConfig::from_env`] returns `None` and [`from_env`] falls
//! back to [`LogMailer`], which writes the message to the log instead. The
//! state holds the mailer as `Arc<dyn Mailer>` so tests can record mail.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for mail delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// Message and template
// ---------------------------------------------------------------------------

/// A plain-text message ready to hand to a [`Mailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Subject and body prefix for confirmation-code mail.
#[derive(Debug, Clone)]
pub struct MailTemplate {
    pub subject: String,
    /// Text placed directly before the code.
    pub text: String,
}

const DEFAULT_MAIL_SUBJECT: &str = "Confirmation code";
const DEFAULT_MAIL_TEXT: &str = "Your confirmation code: ";

impl Default for MailTemplate {
    fn default() -> Self {
        Self {
            subject: DEFAULT_MAIL_SUBJECT.to_string(),
            text: DEFAULT_MAIL_TEXT.to_string(),
        }
    }
}

impl MailTemplate {
    /// Load from `MAIL_SUBJECT` / `MAIL_TEXT`, falling back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            subject: std::env::var("MAIL_SUBJECT").unwrap_or(defaults.subject),
            text: std::env::var("MAIL_TEXT").unwrap_or(defaults.text),
        }
    }

    /// Build the message carrying `code` to `to`.
    pub fn confirmation(&self, to: &str, code: &str) -> OutgoingMail {
        OutgoingMail {
            to: to.to_string(),
            subject: self.subject.clone(),
            body: format!("{}{}", self.text, code),
        }
    }
}

// ---------------------------------------------------------------------------
// Mailer trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

/// Build the mailer for this process: SMTP when configured, the log otherwise.
pub fn from_env() -> Result<Arc<dyn Mailer>, MailError> {
    match SmtpConfig::from_env() {
        Some(config) => {
            tracing::info!(host = %config.smtp_host, port = config.smtp_port, "SMTP mail delivery enabled");
            Ok(Arc::new(SmtpMailer::new(config)?))
        }
        None => {
            tracing::warn!("SMTP_HOST not set; confirmation codes will be written to the log");
            Ok(Arc::new(LogMailer))
        }
    }
}

// ---------------------------------------------------------------------------
// SMTP
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@yamdb.local";

/// Configuration for the SMTP transport.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub smtp_host: String,
    /// Defaults to 587.
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl SmtpConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set.
    ///
    /// | Variable        | Required | Default               |
    /// |-----------------|----------|-----------------------|
    /// | `SMTP_HOST`     | yes      | --                    |
    /// | `SMTP_PORT`     | no       | `587`                 |
    /// | `SMTP_FROM`     | no       | `noreply@yamdb.local` |
    /// | `SMTP_USER`     | no       | --                    |
    /// | `SMTP_PASSWORD` | no       | --                    |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

/// Sends mail through an SMTP relay over STARTTLS.
pub struct SmtpMailer {
    from_address: String,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Result<Self, MailError> {
        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (config.smtp_user, config.smtp_password) {
            transport_builder = transport_builder.credentials(Credentials::new(user, pass));
        }

        Ok(Self {
            from_address: config.from_address,
            transport: transport_builder.build(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from_address.parse()?)
            .to(mail.to.parse()?)
            .subject(mail.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body)
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.transport.send(message).await?;

        tracing::info!(to = %mail.to, "Confirmation email sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Log fallback
// ---------------------------------------------------------------------------

/// Writes messages to the log. Used when SMTP is not configured.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        tracing::info!(to = %mail.to, subject = %mail.subject, body = %mail.body, "Mail (not sent)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_returns_none_without_smtp_host() {
        std::env::remove_var("SMTP_HOST");
        assert!(SmtpConfig::from_env().is_none());
    }

    #[test]
    fn confirmation_mail_appends_code_to_text() {
        let template = MailTemplate::default();
        let mail = template.confirmation("a@b.com", "abc-123");
        assert_eq!(mail.to, "a@b.com");
        assert_eq!(mail.subject, "Confirmation code");
        assert_eq!(mail.body, "Your confirmation code: abc-123");
    }

    #[test]
    fn mail_error_display_build() {
        let err = MailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }

    #[tokio::test]
    async fn log_mailer_always_succeeds() {
        let mail = MailTemplate::default().confirmation("a@b.com", "code");
        assert!(LogMailer.send(mail).await.is_ok());
    }
}
