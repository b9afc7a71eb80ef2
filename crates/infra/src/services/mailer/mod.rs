mod http;
mod inmemory;
mod log;
mod smtp;

pub use self::http::HttpMailer;
pub use self::inmemory::InMemoryMailer;
pub use self::log::LogMailer;
pub use self::smtp::SmtpMailer;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Error, Debug)]
pub enum MailerError {
    #[error("Email provider could not be reached: {0}")]
    Transport(String),
    #[error("Email provider rejected the email with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("Email could not be built: {0}")]
    InvalidMessage(String),
}

/// Outbound email capability. Implementations report failure through the
/// returned error and never panic.
#[async_trait::async_trait]
pub trait IMailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError>;
}
