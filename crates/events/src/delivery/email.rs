//! Alert email delivery via SMTP.
//!
//! [`EmailDelivery`] wraps the `lettre` async SMTP transport to send HTML
//! alert emails. Configuration comes from environment variables; if the
//! sender, credential, or recipients are missing, [`EmailConfig::from_env`]
//! returns `None` and the notifier runs in not-configured mode.

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
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
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP relay when `SMTP_SERVER` is not set.
const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Configuration for the SMTP alert email channel.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// RFC 5322 "From" address, also the SMTP login.
    pub sender: String,
    /// SMTP credential for the sender account.
    pub password: String,
    /// Alert recipients; never empty.
    pub recipients: Vec<String>,
    /// SMTP server hostname.
    pub smtp_server: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if the sender, password, or recipient list is absent
    /// or empty — alerting then degrades to a reported no-op, never an
    /// error that blocks the measurement write.
    ///
    /// | Variable           | Required | Default          |
    /// |--------------------|----------|------------------|
    /// | `EMAIL_SENDER`     | yes      | —                |
    /// | `EMAIL_PASSWORD`   | yes      | —                |
    /// | `EMAIL_RECIPIENTS` | yes      | — (comma-separated) |
    /// | `SMTP_SERVER`      | no       | `smtp.gmail.com` |
    /// | `SMTP_PORT`        | no       | `587`            |
    pub fn from_env() -> Option<Self> {
        let sender = non_empty(std::env::var("EMAIL_SENDER").ok()?)?;
        let password = non_empty(std::env::var("EMAIL_PASSWORD").ok()?)?;
        let recipients = parse_recipients(&std::env::var("EMAIL_RECIPIENTS").ok()?);
        if recipients.is_empty() {
            return None;
        }
        Some(Self {
            sender,
            password,
            recipients,
            smtp_server: std::env::var("SMTP_SERVER")
                .unwrap_or_else(|_| DEFAULT_SMTP_SERVER.to_string()),
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

/// Split a comma-separated recipient list, dropping empty items.
pub fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// EmailDelivery
// ---------------------------------------------------------------------------

/// Sends HTML alert emails to every configured recipient via SMTP.
pub struct EmailDelivery {
    config: EmailConfig,
}

impl EmailDelivery {
    /// Create a new delivery channel with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Send `html_body` to every configured recipient.
    ///
    /// The first transport failure aborts the remaining recipients and is
    /// surfaced to the caller; there is no retry or backoff.
    pub async fn deliver(&self, subject: &str, html_body: &str) -> Result<(), EmailError> {
        use lettre::{
            message::header::ContentType, transport::smtp::authentication::Credentials,
            AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        };

        let mailer: AsyncSmtpTransport<Tokio1Executor> =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_server)?
                .port(self.config.smtp_port)
                .credentials(Credentials::new(
                    self.config.sender.clone(),
                    self.config.password.clone(),
                ))
                .build();

        for recipient in &self.config.recipients {
            let email = Message::builder()
                .from(self.config.sender.parse()?)
                .to(recipient.parse()?)
                .subject(subject)
                .header(ContentType::TEXT_HTML)
                .body(html_body.to_string())
                .map_err(|e| EmailError::Build(e.to_string()))?;

            mailer.send(email).await?;
            tracing::info!(to = %recipient, subject, "Alert email sent");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
