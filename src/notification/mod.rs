//! Publish notification core
//!
//! # Design
//! 1. One decision: `gate` holds the pure workspace-qualification rules
//! 2. One composition: `composer` renders the message once per cycle
//! 3. Independent channels: every channel implements `NotificationChannel`
//!    and contains its own failures
//! 4. At most once: `DispatchCycle` caps a batch of events at a single
//!    dispatched notification
//!
//! # Example
//! ```ignore
//! use publish_notifier::{NotifierBuilder, DispatchCycle, WorkspaceRef, WorkspaceClassification, ActorName};
//!
//! let dispatcher = NotifierBuilder::new(settings).build()?;
//! let workspace = WorkspaceRef::new("review-1", WorkspaceClassification::Internal);
//! let mut cycle = DispatchCycle::new();
//! dispatcher.notify(&workspace, &ActorName::new("Bob"), &mut cycle)?;
//! ```

pub mod builder;
pub mod channel;
pub mod channels;
pub mod composer;
pub mod cycle;
pub mod dispatcher;
pub mod gate;

pub use builder::NotifierBuilder;
pub use channel::{Delivery, DeliveryOutcome, DeliveryReport, NotificationChannel};
pub use composer::{ComposedNotification, MessageComposer};
pub use cycle::DispatchCycle;
pub use dispatcher::{ChangeTracker, DispatchOutcome, NotificationDispatcher, SkipReason};
pub use gate::{should_notify, should_notify_with_history};
