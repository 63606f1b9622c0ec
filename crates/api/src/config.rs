use yamdb_core::confirmation::DEFAULT_CODE_TTL_SECS;

use crate::auth::jwt::JwtConfig;
use crate::mail::MailTemplate;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have sensible defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Confirmation-code signing.
    pub confirmation: ConfirmationConfig,
    /// Subject and text of confirmation mail.
    pub mail: MailTemplate,
    /// When set, this address is ensured to hold the admin role at startup.
    pub bootstrap_admin_email: Option<String>,
}

/// Secret and lifetime for emailed confirmation codes.
#[derive(Debug, Clone)]
pub struct ConfirmationConfig {
    pub secret: String,
    pub code_ttl_secs: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                    |
    /// |------------------------------|----------------------------|
    /// | `HOST`                       | `0.0.0.0`                  |
    /// | `PORT`                       | `3000`                     |
    /// | `CORS_ORIGINS`               | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                       |
    /// | `CONFIRMATION_SECRET`        | value of `JWT_SECRET`      |
    /// | `CONFIRMATION_CODE_TTL_SECS` | `259200` (3 days)          |
    /// | `MAIL_SUBJECT`               | `Confirmation code`        |
    /// | `MAIL_TEXT`                  | `Your confirmation code: ` |
    /// | `BOOTSTRAP_ADMIN_EMAIL`      | unset                      |
    ///
    /// JWT variables are documented on [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();

        let confirmation = ConfirmationConfig {
            secret: std::env::var("CONFIRMATION_SECRET")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| jwt.secret.clone()),
            code_ttl_secs: std::env::var("CONFIRMATION_CODE_TTL_SECS")
                .unwrap_or_else(|_| DEFAULT_CODE_TTL_SECS.to_string())
                .parse()
                .expect("CONFIRMATION_CODE_TTL_SECS must be a valid i64"),
        };

        let bootstrap_admin_email = std::env::var("BOOTSTRAP_ADMIN_EMAIL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            confirmation,
            mail: MailTemplate::from_env(),
            bootstrap_admin_email,
        }
    }
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
