mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, EmailConfig, ReminderConfig, SmtpConfig};
pub use repos::{ISubscriptionRepo, IUserRepo, Repos};
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys};
use tracing::{info, warn};

#[derive(Clone)]
pub struct SubtrackContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub mailer: Arc<dyn IMailer>,
}

struct ContextParams {
    pub postgres_connection_string: Option<String>,
}

impl SubtrackContext {
    async fn create(params: ContextParams) -> Self {
        let config = Config::new();
        let repos = match params.postgres_connection_string {
            Some(connection_string) => {
                Repos::create_postgres(&connection_string, config.reminders.timezone)
                    .await
                    .expect("Postgres credentials must be set and valid")
            }
            None => {
                warn!("DATABASE_URL is not set. Falling back to inmemory repositories, nothing will be persisted.");
                Repos::create_inmemory()
            }
        };
        let mailer = create_mailer(&config);

        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            mailer,
        }
    }

    /// Context without any external dependencies. Emails are kept in an
    /// `InMemoryMailer` and the config is not read from the environment.
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config {
                port: 0,
                internal_api_key: None,
                reminders: Default::default(),
                email: Default::default(),
            },
            sys: Arc::new(RealSys {}),
            mailer: Arc::new(InMemoryMailer::new()),
        }
    }
}

fn create_mailer(config: &Config) -> Arc<dyn IMailer> {
    let email = &config.email;
    if let Some(smtp) = &email.smtp {
        match SmtpMailer::new(smtp, &email.from) {
            Ok(mailer) => {
                info!("Emails will be delivered through SMTP at {}:{}", smtp.host, smtp.port);
                return Arc::new(mailer);
            }
            Err(e) => warn!("Unable to set up the SMTP mailer: {}", e),
        }
    }

    match &email.api_url {
        Some(api_url) => {
            info!("Emails will be delivered through {}", api_url);
            Arc::new(HttpMailer::new(
                api_url.clone(),
                email.api_key.clone(),
                email.from.clone(),
            ))
        }
        None => Arc::new(LogMailer::new(email.from.clone())),
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> SubtrackContext {
    SubtrackContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

fn get_psql_connection_string() -> Option<String> {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .ok()
        .filter(|s| !s.trim().is_empty())
}
