use chrono::NaiveTime;
use std::str::FromStr;
use subtrack_domain::{ReminderWindow, Tz};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Shared secret the internal endpoints are protected with. When it is
    /// not set the internal endpoints refuse every request.
    pub internal_api_key: Option<String>,
    pub reminders: ReminderConfig,
    pub email: EmailConfig,
}

#[derive(Debug, Clone)]
pub struct ReminderConfig {
    /// Timezone that decides what "today" is for a sweep and how stored
    /// timestamps without offset are read
    pub timezone: Tz,
    /// Whether the in-process daily job should run sweeps at all.
    /// Deployments triggering the internal endpoint from an external cron
    /// usually turn it off.
    pub scheduler_enabled: bool,
    /// Local time (in `timezone`) at which the daily job runs
    pub run_at: NaiveTime,
    /// Lookahead used by the daily job
    pub within: ReminderWindow,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub from: String,
    /// Preferred transport when configured
    pub smtp: Option<SmtpConfig>,
    /// Endpoint of the transactional email HTTP API. Emails are only logged
    /// when neither this nor `smtp` is set.
    pub api_url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    /// STARTTLS is used on 587, implicit TLS on 465 and plain text otherwise
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl SmtpConfig {
    pub const DEFAULT_PORT: u16 = 587;

    fn from_env() -> Option<Self> {
        match (
            env_var("SMTP_HOST"),
            env_var("SMTP_USERNAME"),
            env_var("SMTP_PASSWORD"),
        ) {
            (Some(host), Some(username), Some(password)) => Some(Self {
                host,
                port: parse_env_or("SMTP_PORT", Self::DEFAULT_PORT),
                username,
                password,
            }),
            (None, None, None) => None,
            _ => {
                warn!("SMTP_HOST, SMTP_USERNAME and SMTP_PASSWORD must all be set to send emails over SMTP. Ignoring the SMTP configuration.");
                None
            }
        }
    }
}

fn env_var(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(val) if !val.trim().is_empty() => Some(val),
        _ => None,
    }
}

fn parse_env_or<T: FromStr + std::fmt::Display>(key: &str, default: T) -> T {
    match env_var(key) {
        Some(val) => match val.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    key, val, default
                );
                default
            }
        },
        None => default,
    }
}

impl Config {
    pub fn new() -> Self {
        let port = parse_env_or("PORT", 5000_usize);

        let internal_api_key = env_var("INTERNAL_API_KEY");
        if internal_api_key.is_none() {
            warn!("Did not find INTERNAL_API_KEY environment variable. Internal endpoints will be disabled.");
        }

        Self {
            port,
            internal_api_key,
            reminders: ReminderConfig::from_env(),
            email: EmailConfig::from_env(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl ReminderConfig {
    fn from_env() -> Self {
        let timezone = match env_var("REMINDER_TIMEZONE") {
            Some(tz) => match tz.parse::<Tz>() {
                Ok(tz) => tz,
                Err(_) => {
                    warn!(
                        "The given REMINDER_TIMEZONE: {} is not a valid IANA timezone, falling back to UTC.",
                        tz
                    );
                    Tz::UTC
                }
            },
            None => Tz::UTC,
        };

        let hour = parse_env_or("REMINDER_SCHEDULE_HOUR", 9_u32);
        let minute = parse_env_or("REMINDER_SCHEDULE_MINUTE", 0_u32);
        let run_at = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_else(|| {
            warn!(
                "REMINDER_SCHEDULE_HOUR: {} and REMINDER_SCHEDULE_MINUTE: {} is not a valid time of day, falling back to 09:00.",
                hour, minute
            );
            Self::default_run_at()
        });

        let within = ReminderWindow::new(parse_env_or(
            "REMINDER_WITHIN_DAYS",
            ReminderWindow::DEFAULT_DAYS,
        ));

        Self {
            timezone,
            scheduler_enabled: parse_env_or("REMINDER_SCHEDULER_ENABLED", true),
            run_at,
            within,
        }
    }

    fn default_run_at() -> NaiveTime {
        NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            scheduler_enabled: true,
            run_at: Self::default_run_at(),
            within: Default::default(),
        }
    }
}

impl EmailConfig {
    fn from_env() -> Self {
        let from = env_var("EMAIL_FROM").unwrap_or_else(|| "noreply@subtrack.app".into());
        let smtp = SmtpConfig::from_env();
        let api_url = match env_var("EMAIL_API_URL") {
            Some(url) if Self::is_valid_api_url(&url) => Some(url),
            Some(url) => {
                warn!("The given EMAIL_API_URL: {} is not a valid http(s) url.", url);
                None
            }
            None => None,
        };
        if smtp.is_none() && api_url.is_none() {
            info!("Neither SMTP nor an email API is configured. Emails will only be logged.");
        }

        Self {
            from,
            smtp,
            api_url,
            api_key: env_var("EMAIL_API_KEY"),
        }
    }

    pub fn is_valid_api_url(url: &str) -> bool {
        match url::Url::parse(url) {
            Ok(parsed) => ["https", "http"].contains(&parsed.scheme()),
            Err(_) => false,
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            from: "noreply@subtrack.app".into(),
            smtp: None,
            api_url: None,
            api_key: None,
        }
    }
}
