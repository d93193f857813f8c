//! Configuration error taxonomy
//!
//! Configuration errors are fatal to the current dispatch and surface to the
//! caller; delivery failures never do (they are logged and recorded in the
//! channel's `DeliveryReport`). Keeping the former in their own type lets
//! callers tell the two apart without string matching.

use thiserror::Error;

/// A misconfigured deployment. Raised synchronously, never swallowed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("email.senderAddress must be set when the email channel is enabled")]
    MissingSenderAddress,

    #[error("email.senderAddress `{0}` is not a valid address")]
    InvalidSenderAddress(String),

    #[error("email.notifyEmails must contain at least one address when the email channel is enabled")]
    NoRecipients,

    #[error("email.notifyEmails entry `{0}` is not a valid address")]
    InvalidRecipient(String),

    #[error("slack.postTo must contain at least one target when the slack channel is enabled")]
    NoWebhookTargets,

    #[error("slack.postTo target `{name}` requires a valid webhookUrl")]
    InvalidWebhookUrl { name: String },

    #[error("http.baseUri `{0}` is not a valid URL")]
    InvalidBaseUri(String),

    #[error("{field} template has {found} `%s` placeholders but only {expected} values are available")]
    TemplateArity {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("smtp relay `{host}` rejected the transport configuration: {reason}")]
    SmtpTransport { host: String, reason: String },
}
