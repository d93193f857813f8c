//! Outbound delivery channels
//!
//! - Email over SMTP, one mail per recipient
//! - Slack incoming webhooks, one POST per target

mod email;
mod slack;

pub use email::{EmailChannel, MailTransport, OutboundMail, SmtpMailTransport};
pub use slack::{HttpWebhookTransport, SlackChannel, WebhookTransport};
