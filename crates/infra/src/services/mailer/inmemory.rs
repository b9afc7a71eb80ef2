use super::{IMailer, MailerError, OutgoingEmail};
use std::sync::{Mutex, MutexGuard};

/// Keeps every email in memory instead of sending it.
/// Recipients registered with `fail_for` get a transport error.
#[derive(Default)]
pub struct InMemoryMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    failing_recipients: Mutex<Vec<String>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn fail_for(&self, recipient: &str) {
        lock(&self.failing_recipients).push(recipient.to_string());
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        lock(&self.sent).clone()
    }
}

#[async_trait::async_trait]
impl IMailer for InMemoryMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError> {
        if lock(&self.failing_recipients).contains(&email.to) {
            return Err(MailerError::Transport(format!(
                "Connection refused while sending to {}",
                email.to
            )));
        }
        lock(&self.sent).push(email.clone());
        Ok(())
    }
}
