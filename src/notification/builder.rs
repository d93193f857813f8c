//! Dispatcher wiring - builds a ready dispatcher from validated settings
//!
//! Channels are registered in their fixed dispatch order, email before
//! slack. Transports default to the production implementations (lettre SMTP,
//! blocking reqwest) and can be swapped for the host's own, or for mocks.

use std::sync::Arc;

use anyhow::Result;

use crate::config::Settings;
use crate::notification::channels::{
    EmailChannel, HttpWebhookTransport, MailTransport, SlackChannel, SmtpMailTransport,
    WebhookTransport,
};
use crate::notification::composer::MessageComposer;
use crate::notification::dispatcher::{ChangeTracker, NotificationDispatcher};

/// Builds a `NotificationDispatcher` from settings.
pub struct NotifierBuilder {
    settings: Settings,
    mail_transport: Option<Arc<dyn MailTransport>>,
    webhook_transport: Option<Arc<dyn WebhookTransport>>,
    change_tracker: Option<Arc<dyn ChangeTracker>>,
    dry_run: bool,
}

impl NotifierBuilder {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            mail_transport: None,
            webhook_transport: None,
            change_tracker: None,
            dry_run: false,
        }
    }

    /// Replace the default SMTP transport.
    pub fn mail_transport(mut self, transport: Arc<dyn MailTransport>) -> Self {
        self.mail_transport = Some(transport);
        self
    }

    /// Replace the default HTTP webhook transport.
    pub fn webhook_transport(mut self, transport: Arc<dyn WebhookTransport>) -> Self {
        self.webhook_transport = Some(transport);
        self
    }

    pub fn change_tracker(mut self, tracker: Arc<dyn ChangeTracker>) -> Self {
        self.change_tracker = Some(tracker);
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Validate the settings and assemble the dispatcher.
    pub fn build(self) -> Result<NotificationDispatcher> {
        self.settings.validate()?;

        let composer = MessageComposer::from_settings(&self.settings)?;
        let mut dispatcher = NotificationDispatcher::new(self.settings.notify.clone(), composer)
            .with_dry_run(self.dry_run);
        if let Some(tracker) = self.change_tracker {
            dispatcher = dispatcher.with_change_tracker(tracker);
        }

        if self.settings.email.enabled {
            let transport = match self.mail_transport {
                Some(transport) => transport,
                None => Arc::new(SmtpMailTransport::new(&self.settings.email.smtp)?),
            };
            dispatcher.register_channel(Arc::new(EmailChannel::new(
                self.settings.email.clone(),
                transport,
            )));
        }

        if self.settings.slack.enabled {
            let transport = match self.webhook_transport {
                Some(transport) => transport,
                None => Arc::new(HttpWebhookTransport::new()?),
            };
            dispatcher.register_channel(Arc::new(SlackChannel::new(
                self.settings.slack.clone(),
                transport,
            )));
        }

        Ok(dispatcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EmailSettings, HttpSettings, SlackSettings, SlackTarget};
    use crate::error::ConfigError;
    use crate::notification::channels::OutboundMail;
    use url::Url;

    struct NullMail;
    impl MailTransport for NullMail {
        fn send(&self, _mail: &OutboundMail) -> Result<()> {
            Ok(())
        }
    }

    struct NullWebhook;
    impl WebhookTransport for NullWebhook {
        fn post_json(&self, _url: &Url, _payload: &serde_json::Value) -> Result<()> {
            Ok(())
        }
    }

    fn settings(email_enabled: bool, slack_enabled: bool) -> Settings {
        Settings {
            email: EmailSettings {
                enabled: email_enabled,
                sender_address: "noreply@example.com".to_string(),
                subject: "%s published".to_string(),
                body: "%s %s %s".to_string(),
                notify_emails: vec!["a@example.com".to_string()],
                ..Default::default()
            },
            slack: SlackSettings {
                enabled: slack_enabled,
                message: "%s %s %s".to_string(),
                post_to: vec![SlackTarget {
                    name: "editorial".to_string(),
                    webhook_url: "https://hooks.slack.com/services/T0/B0/x".to_string(),
                }],
            },
            http: HttpSettings {
                base_uri: "https://cms.example.com".to_string(),
            },
            ..Default::default()
        }
    }

    fn builder(settings: Settings) -> NotifierBuilder {
        NotifierBuilder::new(settings)
            .mail_transport(Arc::new(NullMail))
            .webhook_transport(Arc::new(NullWebhook))
    }

    #[test]
    fn test_registers_enabled_channels_in_order() {
        let dispatcher = builder(settings(true, true)).build().unwrap();
        assert_eq!(dispatcher.channel_names(), vec!["email", "slack"]);
    }

    #[test]
    fn test_skips_disabled_channels() {
        let dispatcher = builder(settings(false, true)).build().unwrap();
        assert_eq!(dispatcher.channel_names(), vec!["slack"]);

        let dispatcher = builder(settings(false, false)).build().unwrap();
        assert_eq!(dispatcher.channel_count(), 0);
    }

    #[test]
    fn test_build_rejects_invalid_settings() {
        let mut bad = settings(true, false);
        bad.email.notify_emails.clear();

        let err = builder(bad).build().unwrap_err();
        assert_eq!(
            err.downcast::<ConfigError>().unwrap(),
            ConfigError::NoRecipients
        );
    }
}
