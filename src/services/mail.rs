//! Outbound mail transport
//!
//! Plain-text emails over SMTP using lettre's tokio transport.

use std::time::Duration;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;
use crate::config::settings::MailConfig;
use crate::utils::errors::{EventDeskError, MailError, MailResult, Result};

/// Something that can deliver a plain-text email
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> MailResult<()>;
}

/// SMTP mailer
#[derive(Clone, Debug)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    timeout: Duration,
}

impl SmtpMailer {
    /// Create a new SmtpMailer instance
    pub fn new(config: &MailConfig) -> Result<Self> {
        let from_address: Address = config
            .from_address
            .parse()
            .map_err(|e| EventDeskError::Config(format!("Invalid mail.from_address: {}", e)))?;
        let from = Mailbox::new(Some(config.from_name.clone()), from_address);

        let mut builder = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| EventDeskError::Config(format!("Invalid SMTP relay {}: {}", config.host, e)))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };
        let timeout = Duration::from_secs(config.timeout_seconds);
        builder = builder.port(config.port).timeout(Some(timeout));

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            timeout,
        })
    }

    fn build_message(&self, to: &str, subject: &str, body: &str) -> MailResult<Message> {
        let to: Mailbox = to
            .trim()
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("{}: {}", to, e)))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> MailResult<()> {
        let message = self.build_message(to, subject, body)?;

        // lettre's timeout covers the connect; this one covers a server that stalls mid-dialogue
        let response = tokio::time::timeout(self.timeout, self.transport.send(message))
            .await
            .map_err(|_| MailError::Transport(format!("SMTP send timed out after {:?}", self.timeout)))?
            .map_err(|e| MailError::Transport(e.to_string()))?;

        debug!(to = to, code = %response.code(), "SMTP server accepted message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn config() -> MailConfig {
        MailConfig {
            host: "localhost".to_string(),
            port: 2525,
            username: None,
            password: None,
            from_address: "no-reply@eventdesk.local".to_string(),
            from_name: "EventDesk".to_string(),
            starttls: false,
            timeout_seconds: 10,
        }
    }

    #[tokio::test]
    async fn test_invalid_recipient() {
        let mailer = SmtpMailer::new(&config()).unwrap();
        assert_matches!(
            mailer.send("not an address", "Subject", "Body").await,
            Err(MailError::InvalidAddress(_))
        );
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        // Accepts the TCP connection but never sends a greeting
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let mut config = config();
        config.host = "127.0.0.1".to_string();
        config.port = port;
        config.timeout_seconds = 1;

        let mailer = SmtpMailer::new(&config).unwrap();
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            mailer.send("ana@example.com", "Subject", "Body"),
        )
        .await
        .expect("send should give up on its own");
        assert_matches!(result, Err(MailError::Transport(_)));
        drop(listener);
    }

    #[test]
    fn test_invalid_sender_rejected() {
        let mut config = config();
        config.from_address = "nobody".to_string();
        assert_matches!(SmtpMailer::new(&config), Err(EventDeskError::Config(_)));
    }

    #[test]
    fn test_message_headers() {
        let mailer = SmtpMailer::new(&config()).unwrap();
        let message = mailer
            .build_message("ana@example.com", "Your booking has been approved - Lindy Fest", "Hi Ana")
            .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("To: ana@example.com"));
        assert!(raw.contains("Subject: Your booking has been approved - Lindy Fest"));
        assert!(raw.contains("Content-Type: text/plain"));
    }
}
