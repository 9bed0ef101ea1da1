use std::env::var;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;
use thiserror::Error;

use crate::{
    application::handlers::notification_dispatcher::DispatchConfig,
    domain::value_objects::{DEFAULT_MAX_ATTEMPTS, RetryPolicy},
    infrastructure::messaging::{
        automation_webhook::AutomationWebhookConfig, chat_webhook::ChatWebhookConfig,
    },
};

const DEFAULT_CHAT_USERNAME: &str = "Voyage Notifier";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("An error occured while getting {0} env param")]
    Missing(&'static str),
    #[error("An error occured while parsing {name} env param: {value:?}")]
    Invalid { name: &'static str, value: String },
}

pub struct Config {
    pub port: u16,
    pub scheme: String,
    pub host: String,
    pub chat_webhook: ChatWebhookConfig,
    pub automation_webhook: AutomationWebhookConfig,
    pub dispatch_interval: Duration,
    pub dispatch: DispatchConfig,
    pub http_timeout: Duration,
    pub retry_policy: RetryPolicy,
}

impl Config {
    pub fn try_parse() -> Result<Config, ConfigError> {
        let _ = dotenv();

        let http_timeout = Duration::from_secs(parse_or("HTTP_TIMEOUT_SECONDS", 15)?);
        let retry_policy = RetryPolicy {
            max_attempts: parse_or("MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?.max(1),
            dead_letter_on_permanent_failure: parse_or("DEAD_LETTER_ON_PERMANENT_FAILURE", false)?,
            ..RetryPolicy::default()
        };

        Ok(Config {
            port: required("PORT")?,
            scheme: required("SCHEME")?,
            host: required("HOST")?,
            chat_webhook: ChatWebhookConfig {
                enabled: parse_or("CHAT_WEBHOOK_ENABLED", false)?,
                url: optional("CHAT_WEBHOOK_URL"),
                default_username: optional("CHAT_WEBHOOK_USERNAME")
                    .unwrap_or_else(|| DEFAULT_CHAT_USERNAME.to_string()),
            },
            automation_webhook: AutomationWebhookConfig {
                enabled: parse_or("AUTOMATION_WEBHOOK_ENABLED", false)?,
                url: optional("AUTOMATION_WEBHOOK_URL"),
            },
            dispatch_interval: Duration::from_secs(
                parse_or("DISPATCH_INTERVAL_SECONDS", 5)?.max(1),
            ),
            dispatch: DispatchConfig {
                max_concurrency: parse_or("DISPATCH_MAX_CONCURRENCY", 4)?,
                attempt_timeout: http_timeout,
            },
            http_timeout,
            retry_policy,
        })
    }

    pub fn server_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}

fn optional(name: &'static str) -> Option<String> {
    var(name).ok().filter(|value| !value.trim().is_empty())
}

fn required<T: FromStr>(name: &'static str) -> Result<T, ConfigError> {
    let value = optional(name).ok_or(ConfigError::Missing(name))?;
    parse(name, value)
}

fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match optional(name) {
        Some(value) => parse(name, value),
        None => Ok(default),
    }
}

fn parse<T: FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::Invalid { name, value })
}
