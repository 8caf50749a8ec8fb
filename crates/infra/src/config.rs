use tracing::{info, log::warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Base url of the storefront, used for the return-to-cart link
    /// in reminder emails
    pub frontend_url: String,
    /// How often the abandoned cart sweep runs, in seconds
    pub reminder_sweep_interval_secs: u64,
    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// Address the reminders are sent from, also used as the smtp username
    pub from_address: String,
    pub password: String,
}

const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

impl Config {
    pub fn new() -> Self {
        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or_else(|_| default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };

        let frontend_url = match std::env::var("FRONTEND_URL") {
            Ok(url) => url,
            Err(_) => {
                let url = "http://localhost:3000".to_string();
                info!(
                    "Did not find FRONTEND_URL environment variable. Cart links in reminder emails will point to: {}",
                    url
                );
                url
            }
        };

        let reminder_sweep_interval_secs = match std::env::var("REMINDER_SWEEP_INTERVAL_SECS") {
            Ok(secs) => secs.parse::<u64>().unwrap_or_else(|_| {
                warn!(
                    "The given REMINDER_SWEEP_INTERVAL_SECS: {} is not valid, falling back to: {}.",
                    secs, DEFAULT_SWEEP_INTERVAL_SECS
                );
                DEFAULT_SWEEP_INTERVAL_SECS
            }),
            Err(_) => DEFAULT_SWEEP_INTERVAL_SECS,
        };

        Self {
            port,
            frontend_url,
            reminder_sweep_interval_secs,
            smtp: SmtpConfig::new(),
        }
    }
}

impl SmtpConfig {
    pub fn new() -> Self {
        let host = std::env::var("SMTP_HOST").unwrap_or_else(|_| {
            warn!("Did not find SMTP_HOST environment variable. Falling back to smtp.office365.com.");
            "smtp.office365.com".into()
        });
        let default_port = 587;
        let port = match std::env::var("SMTP_PORT") {
            Ok(port) => port.parse::<u16>().unwrap_or_else(|_| {
                warn!(
                    "The given SMTP_PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port
            }),
            Err(_) => default_port,
        };
        let from_address = std::env::var("SMTP_FROM").unwrap_or_else(|_| {
            warn!("Did not find SMTP_FROM environment variable. Sending reminder emails will fail.");
            Default::default()
        });
        let password = std::env::var("SMTP_PASSWORD").unwrap_or_else(|_| {
            warn!(
                "Did not find SMTP_PASSWORD environment variable. Sending reminder emails will fail."
            );
            Default::default()
        });

        Self {
            host,
            port,
            from_address,
            password,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self::new()
    }
}
