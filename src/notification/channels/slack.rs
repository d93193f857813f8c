//! Slack channel - one webhook POST per configured target
//!
//! Preconditions (at least one target, every URL valid) are checked before
//! any network call; a violation aborts the whole channel as a configuration
//! error. Each target then gets `{"text": message}` POSTed independently; a
//! transport failure is logged and recorded without touching the remaining
//! targets. Chat delivery is lower stakes than mail, so failures log at
//! `warn` rather than `error`.

use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use tracing::{debug, warn};
use url::Url;

use crate::config::SlackSettings;
use crate::error::ConfigError;
use crate::notification::channel::{DeliveryOutcome, DeliveryReport, NotificationChannel};
use crate::notification::composer::ComposedNotification;

/// Seam to the HTTP client. The production implementation is
/// `HttpWebhookTransport`; tests substitute a recording mock.
pub trait WebhookTransport: Send + Sync {
    fn post_json(&self, url: &Url, payload: &serde_json::Value) -> Result<()>;
}

/// Slack webhook notification channel.
pub struct SlackChannel {
    settings: SlackSettings,
    transport: Arc<dyn WebhookTransport>,
}

impl SlackChannel {
    pub fn new(settings: SlackSettings, transport: Arc<dyn WebhookTransport>) -> Self {
        Self {
            settings,
            transport,
        }
    }

    /// Resolve webhook targets, rejecting a misconfigured channel before any
    /// network call.
    fn checked_targets(&self) -> Result<Vec<(String, Url)>, ConfigError> {
        if self.settings.post_to.is_empty() {
            return Err(ConfigError::NoWebhookTargets);
        }

        let mut targets = Vec::with_capacity(self.settings.post_to.len());
        for target in &self.settings.post_to {
            let url = Url::parse(&target.webhook_url).map_err(|_| {
                ConfigError::InvalidWebhookUrl {
                    name: target.name.clone(),
                }
            })?;
            targets.push((target.name.clone(), url));
        }

        Ok(targets)
    }
}

impl NotificationChannel for SlackChannel {
    fn name(&self) -> &'static str {
        "slack"
    }

    fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    fn send(&self, notification: &ComposedNotification) -> Result<DeliveryReport, ConfigError> {
        let targets = self.checked_targets()?;
        let payload = json!({ "text": notification.chat_message });
        let mut report = DeliveryReport::new(self.name());

        for (name, url) in targets {
            match self.transport.post_json(&url, &payload) {
                Ok(()) => {
                    debug!(channel = "slack", target = %name, "Notification posted to webhook");
                    report.record(name, DeliveryOutcome::Sent);
                }
                Err(e) => {
                    warn!(channel = "slack", target = %name, error = %e, "Could not send message to Slack webhook");
                    report.record(name, DeliveryOutcome::Failed(e.to_string()));
                }
            }
        }

        Ok(report)
    }
}

/// Webhook transport backed by a blocking reqwest client.
///
/// The client is built without a call-level timeout: delivery is
/// fire-and-forget and defers to connection-level and OS defaults.
pub struct HttpWebhookTransport {
    client: reqwest::blocking::Client,
}

impl HttpWebhookTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<std::time::Duration>)
            .build()?;
        Ok(Self { client })
    }
}

impl WebhookTransport for HttpWebhookTransport {
    fn post_json(&self, url: &Url, payload: &serde_json::Value) -> Result<()> {
        let response = self.client.post(url.clone()).json(payload).send()?;
        response.error_for_status()?;
        Ok(())
    }
}
