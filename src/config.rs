use std::collections::HashMap;

use thiserror::Error;

use crate::types::{Config, InvocationInput};

/// Threshold applied in input-driven mode when `DAYS` is unset.
pub const DEFAULT_THRESHOLD_DAYS: i64 = 28;

/// Trait for abstracting environment variable access
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Production implementation using std::env
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Mock implementation for testing
#[derive(Debug, Default)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

impl MockEnvironment {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    pub fn set_var<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn with_var<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.set_var(key, value);
        self
    }
}

impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SLACK_URL must be set to the webhook URL")]
    MissingWebhookUrl,
    #[error("fqdn_list is empty")]
    EmptyHostList,
    #[error("FQDN_LIST env var must be set (comma-separated)")]
    MissingHostList,
    #[error("DAYS env var must be set")]
    MissingThreshold,
    #[error("invalid DAYS value: {0}")]
    InvalidThreshold(String),
}

impl ConfigError {
    /// Error category reported in the `type` field of an error notification.
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigError::MissingWebhookUrl => "missing webhook url",
            ConfigError::EmptyHostList | ConfigError::MissingHostList => "missing host list",
            ConfigError::MissingThreshold | ConfigError::InvalidThreshold(_) => {
                "invalid threshold"
            }
        }
    }
}

/// Webhook URL resolution, separated out so the runner can build a notifier
/// before the rest of the configuration is known to be valid.
pub fn resolve_webhook_url<E: EnvironmentProvider>(env: &E) -> Result<String, ConfigError> {
    match env.get_var("SLACK_URL") {
        Some(url) if !url.trim().is_empty() => Ok(url),
        _ => Err(ConfigError::MissingWebhookUrl),
    }
}

/// Resolve one normalized `Config` from whichever source is present.
///
/// An invocation input selects input-driven mode: hostnames come from its
/// `fqdn_list` and `DAYS` defaults to 28. Without an input the run is
/// environment-driven: `FQDN_LIST` (comma-separated) and `DAYS` are both
/// mandatory. The two modes are never mixed within a run.
pub fn resolve_config<E: EnvironmentProvider>(
    input: Option<&InvocationInput>,
    env: &E,
) -> Result<Config, ConfigError> {
    let webhook_url = resolve_webhook_url(env)?;

    let (hostnames, threshold_days) = match input {
        Some(input) => {
            let hostnames = input.fqdn_list.clone();
            if hostnames.is_empty() {
                return Err(ConfigError::EmptyHostList);
            }
            let threshold_days = match env.get_var("DAYS") {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidThreshold(raw))?,
                None => DEFAULT_THRESHOLD_DAYS,
            };
            (hostnames, threshold_days)
        }
        None => {
            let raw_list = env.get_var("FQDN_LIST").unwrap_or_default();
            let hostnames: Vec<String> = raw_list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if hostnames.is_empty() {
                return Err(ConfigError::MissingHostList);
            }
            let raw_days = env.get_var("DAYS").ok_or(ConfigError::MissingThreshold)?;
            let threshold_days = raw_days
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidThreshold(raw_days))?;
            (hostnames, threshold_days)
        }
    };

    Ok(Config {
        webhook_url,
        threshold_days,
        hostnames,
    })
}
