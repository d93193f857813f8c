//! Publish Notifier - relay workspace publish events to email and Slack

pub mod config;
pub mod error;
pub mod hook;
pub mod notification;
pub mod workspace;

pub use config::{
    EmailSettings, HttpSettings, InternalWorkspaceRules, NotifySettings, Settings, SlackSettings,
    SlackTarget, SmtpSettings,
};
pub use error::ConfigError;
pub use hook::{ActorSource, PublishEvent, WorkspaceDirectory, WorkspacePublishHook};
pub use notification::channels::{
    EmailChannel, HttpWebhookTransport, MailTransport, OutboundMail, SlackChannel,
    SmtpMailTransport, WebhookTransport,
};
pub use notification::{
    ChangeTracker, ComposedNotification, DeliveryOutcome, DeliveryReport, DispatchCycle,
    DispatchOutcome, MessageComposer, NotificationChannel, NotificationDispatcher,
    NotifierBuilder, SkipReason,
};
pub use workspace::{ActorName, WorkspaceClassification, WorkspaceRef};
