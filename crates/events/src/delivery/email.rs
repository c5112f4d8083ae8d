//! Transactional email delivery.
//!
//! [`TransactionalEmailTransport`] is the seam the dispatcher sends through.
//! [`SmtpEmailTransport`] wraps the `lettre` async SMTP transport; when
//! `SMTP_HOST` is not set [`EmailConfig::from_env`] returns `None` and the
//! process runs with [`UnconfiguredEmailTransport`], whose every attempt is
//! recorded as a failure in the audit log.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Serialize;
use studioflow_core::notification::NotificationEvent;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@studioflow.local";

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set.
    ///
    /// | Variable        | Required | Default                     |
    /// |-----------------|----------|-----------------------------|
    /// | `SMTP_HOST`     | yes      |                             |
    /// | `SMTP_PORT`     | no       | `587`                       |
    /// | `SMTP_FROM`     | no       | `noreply@studioflow.local`  |
    /// | `SMTP_USER`     | no       |                             |
    /// | `SMTP_PASSWORD` | no       |                             |
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

// ---------------------------------------------------------------------------
// Transport seam
// ---------------------------------------------------------------------------

/// Result of one send attempt, as recorded in the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailOutcome {
    pub success: bool,
    /// Provider message id, when the provider returns one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EmailOutcome {
    pub fn sent(id: Option<String>) -> Self {
        Self {
            success: true,
            id,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            id: None,
            error: Some(error.into()),
        }
    }
}

/// Sends one HTML email. Implementations report failure in the outcome
/// instead of returning an error, so a broken provider can never abort the
/// caller.
#[async_trait]
pub trait TransactionalEmailTransport: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> EmailOutcome;
}

// ---------------------------------------------------------------------------
// SMTP
// ---------------------------------------------------------------------------

pub struct SmtpEmailTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpEmailTransport {
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (config.smtp_user, config.smtp_password) {
            builder = builder.credentials(Credentials::new(user, pass));
        }

        Ok(Self {
            mailer: builder.build(),
            from_address: config.from_address,
        })
    }

    async fn try_send(&self, to: &str, subject: &str, html: &str) -> Result<Option<String>, EmailError> {
        let email = Message::builder()
            .from(self.from_address.parse()?)
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let response = self.mailer.send(email).await?;
        Ok(response.first_line().map(str::to_string))
    }
}

#[async_trait]
impl TransactionalEmailTransport for SmtpEmailTransport {
    async fn send(&self, to: &str, subject: &str, html: &str) -> EmailOutcome {
        match self.try_send(to, subject, html).await {
            Ok(id) => {
                tracing::info!(to, subject, "Notification email sent");
                EmailOutcome::sent(id)
            }
            Err(e) => EmailOutcome::failed(e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Unconfigured
// ---------------------------------------------------------------------------

/// Stand-in used when no SMTP server is configured.
#[derive(Debug, Default)]
pub struct UnconfiguredEmailTransport;

#[async_trait]
impl TransactionalEmailTransport for UnconfiguredEmailTransport {
    async fn send(&self, _to: &str, _subject: &str, _html: &str) -> EmailOutcome {
        EmailOutcome::failed("Email transport not configured")
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Subject and HTML body for an event's email.
pub fn render_email(event: &NotificationEvent) -> (String, String) {
    let subject = format!("[{}] {}", event.project_id, event.title);
    let link = event
        .kind
        .url()
        .map(|url| {
            format!(
                "<p><a href=\"{href}\">{text}</a></p>",
                href = escape_html(url),
                text = escape_html(url)
            )
        })
        .unwrap_or_default();
    let html = format!(
        "<html><body><h2>{title}</h2><p>{body}</p>{link}</body></html>",
        title = escape_html(&event.title),
        body = escape_html(&event.body),
    );
    (subject, html)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
