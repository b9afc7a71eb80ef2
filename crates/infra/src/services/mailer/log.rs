use super::{IMailer, MailerError, OutgoingEmail};
use tracing::warn;

/// Development mailer that only writes emails to the log
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: String) -> Self {
        Self { from }
    }
}

#[async_trait::async_trait]
impl IMailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError> {
        warn!(
            from = %self.from,
            to = %email.to,
            subject = %email.subject,
            body = %email.body,
            "Email provider not configured, email was logged instead of sent"
        );
        Ok(())
    }
}
