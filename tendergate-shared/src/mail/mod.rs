/// Confirmation mail delivery
///
/// The notification channel is an external collaborator; the only mail this
/// core sends itself is the email-verification message, so the seam is a
/// single-method trait. Production uses an SMTP transport over rustls;
/// tests and local development use [`NoopMailer`], which logs instead of
/// sending.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Error type for mail delivery
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// Address or message could not be constructed
    #[error("failed to build mail message: {0}")]
    Build(String),

    /// SMTP delivery failed
    #[error("mail delivery failed: {0}")]
    Transport(String),
}

/// Delivery seam for the confirmation mail
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends the email-verification message containing `confirm_url`
    async fn send_confirmation(&self, to: &str, confirm_url: &str) -> Result<(), MailError>;
}

/// SMTP configuration for the production mailer
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// SMTP relay host
    pub smtp_host: String,

    /// SMTP username (empty disables authentication, e.g. a local relay)
    pub smtp_username: String,

    /// SMTP password
    pub smtp_password: String,

    /// Sender address, e.g. `"Tendergate <no-reply@tendergate.example>"`
    pub from_address: String,
}

/// Mailer backed by an async SMTP transport (rustls)
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Builds the transport from configuration
    ///
    /// # Errors
    ///
    /// Returns `MailError::Build` if the relay host or sender address is
    /// invalid.
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| MailError::Build(e.to_string()))?;

        if !config.smtp_username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ));
        }

        let from = config
            .from_address
            .parse::<Mailbox>()
            .map_err(|e| MailError::Build(format!("invalid sender address: {}", e)))?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_confirmation(&self, to: &str, confirm_url: &str) -> Result<(), MailError> {
        let to = to
            .parse::<Mailbox>()
            .map_err(|e| MailError::Build(format!("invalid recipient address: {}", e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject("Confirm your Tendergate email address")
            .body(format!(
                "Welcome to Tendergate!\n\n\
                 Confirm your email address to continue setting up your account:\n\n\
                 {}\n\n\
                 If you did not register, you can ignore this message.\n",
                confirm_url
            ))
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        Ok(())
    }
}

/// Mailer that only logs, for tests and local development
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send_confirmation(&self, to: &str, confirm_url: &str) -> Result<(), MailError> {
        tracing::info!(recipient = %to, url = %confirm_url, "confirmation mail suppressed (noop mailer)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_mailer_always_succeeds() {
        let mailer = NoopMailer;
        mailer
            .send_confirmation("someone@example.com", "https://example.com/confirm?token=t")
            .await
            .unwrap();
    }

    #[test]
    fn test_smtp_mailer_rejects_bad_sender() {
        let config = MailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_address: "not an address".to_string(),
        };

        assert!(matches!(SmtpMailer::new(&config), Err(MailError::Build(_))));
    }
}
