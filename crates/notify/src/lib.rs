//! Slack webhook notifications for pipeline runs.
//!
//! Notification failures never fail the run: every send degrades to a
//! log line when the webhook is unset or the POST fails.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info, warn};

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Incoming webhook URL. When absent, notifications only log.
    pub webhook_url: Option<String>,
    /// Label shown in the message context line
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

fn default_app_name() -> String {
    "GA4 ETL".to_string()
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            app_name: default_app_name(),
        }
    }
}

/// Run status determining the message emoji.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Info,
    Success,
    Error,
}

impl RunStatus {
    fn emoji(self) -> &'static str {
        match self {
            RunStatus::Info => ":information_source:",
            RunStatus::Success => ":white_check_mark:",
            RunStatus::Error => ":x:",
        }
    }
}

/// Slack webhook sender.
pub struct Notifier {
    config: NotifyConfig,
    http: reqwest::Client,
}

impl Notifier {
    pub fn new(config: NotifyConfig) -> Self {
        if config.webhook_url.is_none() {
            warn!("No webhook URL configured, notifications will only be logged");
        }
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Sends one message. Returns whether delivery succeeded; a
    /// disabled or failing webhook is reported as `false`, never as an
    /// error.
    pub async fn send(&self, status: RunStatus, message: &str, details: Option<&str>) -> bool {
        let url = match self.config.webhook_url {
            Some(ref url) => url,
            None => {
                info!(message = message, "Notification (webhook disabled)");
                return false;
            }
        };

        let payload = self.build_payload(status, message, details);

        match self.http.post(url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                info!(message = message, "Sent notification");
                true
            }
            Ok(response) => {
                error!(
                    status = %response.status(),
                    message = message,
                    "Notification delivery rejected"
                );
                false
            }
            Err(e) => {
                error!(error = %e, message = message, "Notification delivery failed");
                false
            }
        }
    }

    fn build_payload(&self, status: RunStatus, message: &str, details: Option<&str>) -> Value {
        let now = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let mut blocks = vec![
            json!({
                "type": "section",
                "text": {
                    "type": "mrkdwn",
                    "text": format!("{} *{}*", status.emoji(), self.config.app_name),
                }
            }),
            json!({
                "type": "section",
                "text": { "type": "mrkdwn", "text": message }
            }),
            json!({
                "type": "context",
                "elements": [{
                    "type": "mrkdwn",
                    "text": format!("Run time: {}", now),
                }]
            }),
            json!({ "type": "divider" }),
        ];

        if let Some(details) = details {
            blocks.push(json!({
                "type": "section",
                "text": { "type": "mrkdwn", "text": details }
            }));
        }

        json!({
            "text": format!("{}: {}", self.config.app_name, message),
            "blocks": blocks,
        })
    }

    /// Announces the start of a run.
    pub async fn notify_start(&self, description: &str) -> bool {
        self.send(
            RunStatus::Info,
            &format!("Pipeline run started. {}", description),
            None,
        )
        .await
    }

    /// Announces a completed run with per-stage row counts.
    pub async fn notify_success(&self, description: &str, stats: &BTreeMap<String, u64>) -> bool {
        let details = if stats.is_empty() {
            None
        } else {
            let mut text = String::from("*Run statistics:*\n");
            for (key, value) in stats {
                text.push_str(&format!("- {}: {}\n", key, value));
            }
            Some(text)
        };
        self.send(
            RunStatus::Success,
            &format!("Pipeline run completed. {}", description),
            details.as_deref(),
        )
        .await
    }

    /// Announces a failed run with the error text.
    pub async fn notify_failure(&self, description: &str, error_message: &str) -> bool {
        let details = format!("*Error details:*\n```{}```", error_message);
        self.send(
            RunStatus::Error,
            &format!("Pipeline run failed. {}", description),
            Some(&details),
        )
        .await
    }
}
