use super::{IMailer, MailerError, OutgoingEmail};
use crate::config::SmtpConfig;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::time::Duration;
use tracing::info;

const SMTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends emails through an SMTP relay
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig, from: &str) -> Result<Self, MailerError> {
        let from = from
            .parse::<Mailbox>()
            .map_err(|e| MailerError::InvalidMessage(format!("EMAIL_FROM: {}", e)))?;

        let builder = match config.port {
            587 => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| MailerError::Transport(e.to_string()))?,
            465 => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| MailerError::Transport(e.to_string()))?,
            _ => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host),
        };
        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        Ok(Self { transport, from })
    }

    fn build_message(&self, email: &OutgoingEmail) -> Result<Message, MailerError> {
        let to = email
            .to
            .parse::<Mailbox>()
            .map_err(|e| MailerError::InvalidMessage(format!("{}: {}", email.to, e)))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| MailerError::InvalidMessage(e.to_string()))
    }
}

#[async_trait::async_trait]
impl IMailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError> {
        let message = self.build_message(email)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| MailerError::Transport(e.to_string()))?;

        info!("Email sent successfully to {}", email.to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(port: u16) -> SmtpConfig {
        SmtpConfig {
            host: "localhost".into(),
            port,
            username: "mailer".into(),
            password: "secret".into(),
        }
    }

    fn email(to: &str) -> OutgoingEmail {
        OutgoingEmail {
            to: to.into(),
            subject: "Upcoming subscription renewal: Netflix".into(),
            body: "Hello".into(),
        }
    }

    #[tokio::test]
    async fn builds_plain_text_messages() {
        let mailer = SmtpMailer::new(&config(587), "SubTrack <noreply@subtrack.app>")
            .expect("Valid smtp config");
        let message = mailer
            .build_message(&email("jane@example.com"))
            .expect("Valid message");
        let formatted = String::from_utf8(message.formatted()).expect("Utf8 message");

        assert!(formatted.contains("To: jane@example.com"));
        assert!(formatted.contains("Subject: Upcoming subscription renewal: Netflix"));
        assert!(formatted.contains("text/plain"));
    }

    #[tokio::test]
    async fn rejects_invalid_addresses_without_connecting() {
        assert!(SmtpMailer::new(&config(2525), "not an address").is_err());

        let mailer = SmtpMailer::new(&config(465), "noreply@subtrack.app").expect("Valid config");
        match mailer.send(&email("not an address")).await {
            Err(MailerError::InvalidMessage(_)) => {}
            other => panic!("Expected an invalid message error, got {:?}", other),
        }
    }
}
