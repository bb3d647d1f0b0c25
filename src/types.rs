use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized configuration for one invocation. Resolved once, immutable after.
#[derive(Debug, Clone)]
pub struct Config {
    pub webhook_url: String,
    pub threshold_days: i64,
    pub hostnames: Vec<String>,
}

/// Invocation input for input-driven runs: `{"fqdn_list": ["example.com", ...]}`.
/// A missing `fqdn_list` key deserializes to an empty list, which is then
/// reported as a configuration error.
#[derive(Debug, Clone, Deserialize)]
pub struct InvocationInput {
    #[serde(default)]
    pub fqdn_list: Vec<String>,
}

/// Outcome of probing one hostname. `expiry_timestamp` is `None` when the
/// handshake failed or the certificate could not be parsed.
#[derive(Debug, Clone)]
pub struct HostCheckResult {
    pub hostname: String,
    pub expiry_timestamp: Option<DateTime<Utc>>,
}

/// A host selected for an expiry warning. Remaining days only exists once the
/// filter has computed it from a known expiry, so it lives here rather than on
/// `HostCheckResult`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationTarget {
    pub hostname: String,
    pub expiry_timestamp: DateTime<Utc>,
    pub remaining_days: i64,
}

/// Completion marker returned to the invoking scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub status_code: u16,
    pub body: String,
}

impl Completion {
    pub fn done() -> Self {
        Self {
            status_code: 200,
            body: "done".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SlackPayload {
    pub icon_emoji: String,
    pub text: String,
    pub attachments: Vec<SlackAttachment>,
}

#[derive(Debug, Serialize)]
pub struct SlackAttachment {
    pub fallback: String,
    pub fields: Vec<SlackField>,
    pub color: String,
}

#[derive(Debug, Serialize)]
pub struct SlackField {
    pub title: String,
    pub value: String,
    pub short: bool,
}
