use std::env;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings read from the process environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub admin_jwt_secret: String,
    pub admin_email: Option<String>,
    pub mail_from: String,
    pub shop_name: String,
    pub notification_poll: Duration,
    /// `smtp://` or `smtps://` transport URL; unset means mail is only logged.
    pub smtp_url: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(get("PORT"), "PORT", 8080)?,
            admin_jwt_secret: required("ADMIN_JWT_SECRET")?,
            admin_email: get("ADMIN_EMAIL"),
            mail_from: get("MAIL_FROM").unwrap_or_else(|| "no-reply@localhost".to_string()),
            shop_name: get("SHOP_NAME").unwrap_or_else(|| "Storefront".to_string()),
            notification_poll: poll_interval(get("NOTIFICATION_POLL_SECS"))?,
            smtp_url: get("SMTP_URL"),
        })
    }
}

/// The relay ticks on this interval, so it has to be at least one second.
fn poll_interval(value: Option<String>) -> Result<Duration, ConfigError> {
    let name = "NOTIFICATION_POLL_SECS";
    match parse_or::<u64>(value, name, 5)? {
        0 => Err(ConfigError::Invalid {
            name,
            value: "0".to_string(),
        }),
        secs => Ok(Duration::from_secs(secs)),
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
