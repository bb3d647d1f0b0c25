use anyhow::{anyhow, Context, Result};
use tracing::error;

use crate::parsing::format_expiry_date;
use crate::types::{NotificationTarget, SlackAttachment, SlackField, SlackPayload};

const ICON_EMOJI: &str = ":eye-in-speech-bubble:";
const EXPIRY_TEXT: &str =
    "Certificate expiry is approaching but automatic renewal appears to have failed";
const ERROR_TEXT: &str = "error occurred";

pub fn build_expiry_payload(target: &NotificationTarget) -> SlackPayload {
    SlackPayload {
        icon_emoji: ICON_EMOJI.to_string(),
        text: EXPIRY_TEXT.to_string(),
        attachments: vec![SlackAttachment {
            fallback: EXPIRY_TEXT.to_string(),
            fields: vec![
                SlackField {
                    title: "FQDN".to_string(),
                    value: target.hostname.clone(),
                    short: true,
                },
                SlackField {
                    title: "expiry date".to_string(),
                    value: format_expiry_date(target.expiry_timestamp),
                    short: true,
                },
                SlackField {
                    title: "remaining".to_string(),
                    value: format!("{} days", target.remaining_days),
                    short: true,
                },
            ],
            color: "warning".to_string(),
        }],
    }
}

pub fn build_error_payload(description: &str, error_kind: &str, hostname: &str) -> SlackPayload {
    SlackPayload {
        icon_emoji: ICON_EMOJI.to_string(),
        text: ERROR_TEXT.to_string(),
        attachments: vec![SlackAttachment {
            fallback: ERROR_TEXT.to_string(),
            fields: vec![
                SlackField {
                    title: "error".to_string(),
                    value: description.to_string(),
                    short: false,
                },
                SlackField {
                    title: "type".to_string(),
                    value: error_kind.to_string(),
                    short: true,
                },
                SlackField {
                    title: "FQDN".to_string(),
                    value: hostname.to_string(),
                    short: true,
                },
            ],
            color: "danger".to_string(),
        }],
    }
}

/// Fire-and-forget webhook delivery. One POST per notification, no retries;
/// the caller decides whether a delivery failure is logged or propagated.
pub struct Notifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl Notifier {
    pub fn new(webhook_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url,
        }
    }

    pub async fn notify_expiry(&self, target: &NotificationTarget) -> Result<()> {
        self.send(&build_expiry_payload(target)).await
    }

    pub async fn notify_error(
        &self,
        description: &str,
        error_kind: &str,
        hostname: &str,
    ) -> Result<()> {
        self.send(&build_error_payload(description, error_kind, hostname))
            .await
    }

    /// POST `payload=<serialized JSON>` as a form-encoded body, the webhook's
    /// legacy payload contract.
    async fn send(&self, payload: &SlackPayload) -> Result<()> {
        let body = serde_json::to_string(payload).context("Failed to serialize Slack payload")?;
        let res = self
            .client
            .post(&self.webhook_url)
            .form(&[("payload", body)])
            .send()
            .await
            .context("Failed to send Slack request")?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            error!("Slack webhook failed: {} - {}", status, body);
            return Err(anyhow!("Slack webhook returned non-success status"));
        }
        Ok(())
    }
}
