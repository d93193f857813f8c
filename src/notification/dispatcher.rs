//! Notification dispatcher - routes one composed message to all channels
//!
//! One `notify` call handles one publish event: consult the decision rules,
//! render the message once, then invoke every enabled channel. Channels are
//! independent; a failure in one never prevents another from being
//! attempted. The dispatch cycle is consumed once an attempt was made,
//! success or not, which caps a batch of events at one notification.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::config::NotifySettings;
use crate::error::ConfigError;
use crate::notification::channel::{DeliveryOutcome, DeliveryReport, NotificationChannel};
use crate::notification::composer::MessageComposer;
use crate::notification::cycle::DispatchCycle;
use crate::notification::gate;
use crate::workspace::{ActorName, WorkspaceClassification, WorkspaceRef};

/// Host-supplied capability: did the workspace already hold pending changes
/// before this publish? Only consulted for internal workspaces, and only
/// when the host injects an implementation.
pub trait ChangeTracker: Send + Sync {
    fn has_prior_changes(&self, workspace: &WorkspaceRef) -> bool;
}

/// Why a notify call did not dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// This cycle already produced a dispatch.
    AlreadyNotified,
    /// The decision rules said no for this workspace.
    Declined,
}

/// Result of one notify call.
#[derive(Debug)]
pub enum DispatchOutcome {
    Skipped(SkipReason),
    Dispatched(Vec<DeliveryReport>),
}

/// Orchestrates decision, composition and per-channel delivery.
pub struct NotificationDispatcher {
    settings: NotifySettings,
    composer: MessageComposer,
    /// Channels in configured dispatch order.
    channels: Vec<Arc<dyn NotificationChannel>>,
    change_tracker: Option<Arc<dyn ChangeTracker>>,
    dry_run: bool,
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("settings", &self.settings)
            .field("channels", &self.channel_count())
            .field("change_tracker", &self.change_tracker.is_some())
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl NotificationDispatcher {
    pub fn new(settings: NotifySettings, composer: MessageComposer) -> Self {
        Self {
            settings,
            composer,
            channels: Vec::new(),
            change_tracker: None,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_change_tracker(mut self, tracker: Arc<dyn ChangeTracker>) -> Self {
        self.change_tracker = Some(tracker);
        self
    }

    pub fn register_channel(&mut self, channel: Arc<dyn NotificationChannel>) {
        info!(channel = channel.name(), "Registering notification channel");
        self.channels.push(channel);
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    /// Handle one publish event.
    ///
    /// Delivery failures are contained per channel and reported in the
    /// outcome; configuration errors propagate after every enabled channel
    /// was given its attempt. Either way the cycle is consumed.
    pub fn notify(
        &self,
        workspace: &WorkspaceRef,
        actor: &ActorName,
        cycle: &mut DispatchCycle,
    ) -> Result<DispatchOutcome, ConfigError> {
        if cycle.is_notified() {
            debug!(workspace = %workspace.name, "Cycle already produced a notification, skipping");
            return Ok(DispatchOutcome::Skipped(SkipReason::AlreadyNotified));
        }

        let first_change = match (workspace.classification, &self.change_tracker) {
            (WorkspaceClassification::Internal, Some(tracker)) => {
                Some(!tracker.has_prior_changes(workspace))
            }
            _ => None,
        };
        if !gate::should_notify_with_history(workspace.classification, &self.settings, first_change)
        {
            debug!(
                workspace = %workspace.name,
                classification = %workspace.classification,
                "Workspace does not qualify for a notification"
            );
            return Ok(DispatchOutcome::Skipped(SkipReason::Declined));
        }

        let notification = self.composer.compose(actor, workspace);
        info!(workspace = %workspace.name, actor = %actor, "Dispatching publish notification");

        let mut reports = Vec::new();
        let mut first_config_error: Option<ConfigError> = None;

        for channel in self.channels.iter().filter(|c| c.is_enabled()) {
            if self.dry_run {
                eprintln!("[DRY-RUN] Would send to channel: {}", channel.name());
                let mut report = DeliveryReport::new(channel.name());
                report.record(channel.name(), DeliveryOutcome::Skipped("dry-run".to_string()));
                reports.push(report);
                continue;
            }

            match channel.send(&notification) {
                Ok(report) => {
                    info!(
                        channel = channel.name(),
                        sent = report.sent_count(),
                        failed = report.failed_count(),
                        "Channel dispatch finished"
                    );
                    reports.push(report);
                }
                Err(e) => {
                    error!(channel = channel.name(), error = %e, "Channel rejected its configuration");
                    if first_config_error.is_none() {
                        first_config_error = Some(e);
                    }
                }
            }
        }

        // An attempt was made, so the cycle is spent even on a config error.
        cycle.mark_notified();

        match first_config_error {
            Some(e) => Err(e),
            None => Ok(DispatchOutcome::Dispatched(reports)),
        }
    }
}
