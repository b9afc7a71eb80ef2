use super::{IMailer, MailerError, OutgoingEmail};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text_body: &'a str,
}

/// Sends emails through a transactional email HTTP API by posting
/// JSON to `api_url`
pub struct HttpMailer {
    client: Client,
    api_url: String,
    api_key: Option<String>,
    from: String,
}

impl HttpMailer {
    pub fn new(api_url: String, api_key: Option<String>, from: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            api_url,
            api_key,
            from,
        }
    }
}

#[async_trait::async_trait]
impl IMailer for HttpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError> {
        let body = SendEmailRequest {
            from: &self.from,
            to: &email.to,
            subject: &email.subject,
            text_body: &email.body,
        };

        let mut req = self.client.post(&self.api_url).json(&body);
        if let Some(api_key) = &self.api_key {
            req = req.bearer_auth(api_key);
        }

        let res = req
            .send()
            .await
            .map_err(|e| MailerError::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let message = res.text().await.unwrap_or_default();
            return Err(MailerError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        info!("Email sent successfully to {}", email.to);
        Ok(())
    }
}
