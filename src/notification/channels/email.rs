//! Email channel - one plain-text mail per recipient
//!
//! Preconditions (sender set and valid, recipient list non-empty and valid)
//! are checked before any mail leaves; a violation aborts the whole channel
//! as a configuration error. Past that point each recipient is independent:
//! a transport failure is logged and recorded, and the remaining recipients
//! are still attempted. No retries, no batching.

use std::sync::Arc;

use anyhow::Result;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, Message, SmtpTransport, Transport};
use tracing::{debug, error};

use crate::config::{EmailSettings, SmtpSettings};
use crate::error::ConfigError;
use crate::notification::channel::{DeliveryOutcome, DeliveryReport, NotificationChannel};
use crate::notification::composer::ComposedNotification;

/// One outbound mail for one recipient.
#[derive(Debug, Clone)]
pub struct OutboundMail {
    pub from: Mailbox,
    pub to: Mailbox,
    pub subject: String,
    pub body: String,
}

/// Seam to the mail library. The production implementation is
/// `SmtpMailTransport`; tests substitute a recording mock.
pub trait MailTransport: Send + Sync {
    fn send(&self, mail: &OutboundMail) -> Result<()>;
}

/// Email notification channel.
pub struct EmailChannel {
    settings: EmailSettings,
    transport: Arc<dyn MailTransport>,
}

impl EmailChannel {
    pub fn new(settings: EmailSettings, transport: Arc<dyn MailTransport>) -> Self {
        Self {
            settings,
            transport,
        }
    }

    /// Resolve sender and recipients, rejecting a misconfigured channel
    /// before any send attempt.
    fn checked_mailboxes(&self) -> Result<(Mailbox, Vec<Mailbox>), ConfigError> {
        if self.settings.sender_address.is_empty() {
            return Err(ConfigError::MissingSenderAddress);
        }
        let sender: Address = self
            .settings
            .sender_address
            .parse()
            .map_err(|_| ConfigError::InvalidSenderAddress(self.settings.sender_address.clone()))?;
        let sender_name =
            (!self.settings.sender_name.is_empty()).then(|| self.settings.sender_name.clone());
        let from = Mailbox::new(sender_name, sender);

        if self.settings.notify_emails.is_empty() {
            return Err(ConfigError::NoRecipients);
        }
        let mut recipients = Vec::with_capacity(self.settings.notify_emails.len());
        for email in &self.settings.notify_emails {
            let address: Address = email
                .parse()
                .map_err(|_| ConfigError::InvalidRecipient(email.clone()))?;
            recipients.push(Mailbox::new(None, address));
        }

        Ok((from, recipients))
    }
}

impl NotificationChannel for EmailChannel {
    fn name(&self) -> &'static str {
        "email"
    }

    fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    fn send(&self, notification: &ComposedNotification) -> Result<DeliveryReport, ConfigError> {
        let (from, recipients) = self.checked_mailboxes()?;
        let mut report = DeliveryReport::new(self.name());

        for to in recipients {
            let target = to.email.to_string();
            let mail = OutboundMail {
                from: from.clone(),
                to,
                subject: notification.subject.clone(),
                body: notification.body.clone(),
            };

            match self.transport.send(&mail) {
                Ok(()) => {
                    debug!(channel = "email", recipient = %target, "Notification mail handed to transport");
                    report.record(target, DeliveryOutcome::Sent);
                }
                Err(e) => {
                    error!(channel = "email", recipient = %target, error = %e, "Could not send notification mail");
                    report.record(target, DeliveryOutcome::Failed(e.to_string()));
                }
            }
        }

        Ok(report)
    }
}

/// SMTP transport backed by lettre.
pub struct SmtpMailTransport {
    transport: SmtpTransport,
}

impl SmtpMailTransport {
    pub fn new(settings: &SmtpSettings) -> Result<Self, ConfigError> {
        let mut builder = if settings.use_tls {
            SmtpTransport::relay(&settings.host).map_err(|e| ConfigError::SmtpTransport {
                host: settings.host.clone(),
                reason: e.to_string(),
            })?
        } else {
            SmtpTransport::builder_dangerous(&settings.host)
        };
        builder = builder.port(settings.port);

        if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

impl MailTransport for SmtpMailTransport {
    fn send(&self, mail: &OutboundMail) -> Result<()> {
        let message = Message::builder()
            .from(mail.from.clone())
            .to(mail.to.clone())
            .subject(mail.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body.clone())?;
        self.transport.send(&message)?;
        Ok(())
    }
}
