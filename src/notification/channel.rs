//! Notification channel trait and delivery reporting

use crate::error::ConfigError;
use crate::notification::composer::ComposedNotification;

/// Outcome for one recipient or webhook destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Handed to the transport.
    Sent,
    /// Not attempted (e.g. dry-run).
    Skipped(String),
    /// The transport failed; already logged, never propagated.
    Failed(String),
}

/// One delivery attempt, in configured list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Recipient address or webhook target name.
    pub target: String,
    pub outcome: DeliveryOutcome,
}

/// Per-target outcomes of one channel invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub channel: &'static str,
    pub deliveries: Vec<Delivery>,
}

impl DeliveryReport {
    pub fn new(channel: &'static str) -> Self {
        Self {
            channel,
            deliveries: Vec::new(),
        }
    }

    pub fn record(&mut self, target: impl Into<String>, outcome: DeliveryOutcome) {
        self.deliveries.push(Delivery {
            target: target.into(),
            outcome,
        });
    }

    pub fn sent_count(&self) -> usize {
        self.deliveries
            .iter()
            .filter(|d| d.outcome == DeliveryOutcome::Sent)
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.deliveries
            .iter()
            .filter(|d| matches!(d.outcome, DeliveryOutcome::Failed(_)))
            .count()
    }
}

/// An outbound delivery mechanism for a composed notification.
///
/// Implementations check their own preconditions before touching the network
/// and return a `ConfigError` without attempting any delivery when those
/// fail. A transport failure for one target must not abort the remaining
/// targets; it is logged and recorded in the report instead.
pub trait NotificationChannel: Send + Sync {
    /// Channel name, used for logs and reports.
    fn name(&self) -> &'static str;

    /// Whether configuration enables this channel.
    fn is_enabled(&self) -> bool;

    /// Deliver the notification to every configured target.
    fn send(&self, notification: &ComposedNotification) -> Result<DeliveryReport, ConfigError>;
}
