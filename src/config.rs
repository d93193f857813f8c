//! Typed notifier settings
//!
//! Settings are loaded once (per process or per invocation context) from a
//! JSON file and are immutable during a dispatch cycle. `validate()` runs the
//! full precondition pass so that a misconfigured deployment is surfaced at
//! startup rather than on the first publish.
//!
//! Key names follow the configuration surface of the host system, hence the
//! camelCase serde renames.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lettre::Address;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;
use crate::notification::composer::placeholder_count;

/// Root settings object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub notify: NotifySettings,
    pub email: EmailSettings,
    pub slack: SlackSettings,
    pub http: HttpSettings,
}

/// Decision flags consumed by the gate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotifySettings {
    /// Notify on changes to the public (live) workspace.
    pub public_workspace: bool,
    pub internal_workspace: InternalWorkspaceRules,
}

/// Optional refinement for internal workspaces. Only consulted when the host
/// injects a `ChangeTracker`; both flags default to on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InternalWorkspaceRules {
    pub on_first_change: bool,
    pub on_additional_change: bool,
}

impl Default for InternalWorkspaceRules {
    fn default() -> Self {
        Self {
            on_first_change: true,
            on_additional_change: true,
        }
    }
}

/// Email channel configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailSettings {
    pub enabled: bool,
    /// Sender address. Required when enabled.
    pub sender_address: String,
    /// Sender display name, may be empty.
    pub sender_name: String,
    /// Subject template, 1 `%s` value: actor.
    pub subject: String,
    /// Body template, 3 `%s` values: actor, workspace, review URL.
    pub body: String,
    /// Recipients. Required non-empty when enabled.
    pub notify_emails: Vec<String>,
    pub smtp: SmtpSettings,
}

/// SMTP relay used by the lettre transport. Not part of the channel
/// preconditions; a wrong relay shows up as per-recipient delivery failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub use_tls: bool,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 587,
            username: None,
            password: None,
            use_tls: true,
        }
    }
}

/// Slack webhook channel configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlackSettings {
    pub enabled: bool,
    /// Message template, 3 `%s` values: actor, workspace, review URL.
    pub message: String,
    /// Webhook targets. Required non-empty when enabled.
    pub post_to: Vec<SlackTarget>,
}

/// One named webhook destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlackTarget {
    pub name: String,
    pub webhook_url: String,
}

/// Host HTTP settings, used to build review URLs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpSettings {
    pub base_uri: String,
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("Cannot parse config file {}", path.display()))?;
        Ok(settings)
    }

    /// Default config location: `~/.config/publish-notifier/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config/publish-notifier/config.json"))
    }

    /// Full precondition pass over every enabled channel.
    ///
    /// The channels re-check their own preconditions at send time; running
    /// this at startup reports a broken deployment before any event arrives.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.email.enabled || self.slack.enabled {
            Url::parse(&self.http.base_uri)
                .map_err(|_| ConfigError::InvalidBaseUri(self.http.base_uri.clone()))?;
        }

        if self.email.enabled {
            if self.email.sender_address.is_empty() {
                return Err(ConfigError::MissingSenderAddress);
            }
            if self.email.sender_address.parse::<Address>().is_err() {
                return Err(ConfigError::InvalidSenderAddress(
                    self.email.sender_address.clone(),
                ));
            }
            if self.email.notify_emails.is_empty() {
                return Err(ConfigError::NoRecipients);
            }
            for email in &self.email.notify_emails {
                if email.parse::<Address>().is_err() {
                    return Err(ConfigError::InvalidRecipient(email.clone()));
                }
            }
            check_template("email.subject", &self.email.subject, 1)?;
            check_template("email.body", &self.email.body, 3)?;
        }

        if self.slack.enabled {
            if self.slack.post_to.is_empty() {
                return Err(ConfigError::NoWebhookTargets);
            }
            for target in &self.slack.post_to {
                if Url::parse(&target.webhook_url).is_err() {
                    return Err(ConfigError::InvalidWebhookUrl {
                        name: target.name.clone(),
                    });
                }
            }
            check_template("slack.message", &self.slack.message, 3)?;
        }

        Ok(())
    }
}

/// A template may use fewer values than available, never more: leftover `%s`
/// markers would leak into outbound text.
fn check_template(
    field: &'static str,
    template: &str,
    available: usize,
) -> Result<(), ConfigError> {
    let found = placeholder_count(template);
    if found > available {
        return Err(ConfigError::TemplateArity {
            field,
            expected: available,
            found,
        });
    }
    Ok(())
}
