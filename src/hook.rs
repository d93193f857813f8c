//! Catch-up hook - translates publish events into dispatcher invocations
//!
//! The host's projection loop delivers domain events strictly in order. The
//! hook owns one `DispatchCycle` per batch: `begin_batch` opens a fresh
//! scope, `on_event` feeds each event through the dispatcher. Workspace
//! lookup and actor resolution stay behind traits the host implements.

use std::sync::Arc;

use tracing::warn;

use crate::error::ConfigError;
use crate::notification::cycle::DispatchCycle;
use crate::notification::dispatcher::NotificationDispatcher;
use crate::workspace::{ActorName, WorkspaceRef};

/// The two inbound event kinds. Partial publishes carry no distinct
/// semantics here; both variants take the same path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishEvent {
    WorkspacePublished { target_workspace: String },
    WorkspacePartiallyPublished { target_workspace: String },
}

impl PublishEvent {
    pub fn target_workspace(&self) -> &str {
        match self {
            PublishEvent::WorkspacePublished { target_workspace }
            | PublishEvent::WorkspacePartiallyPublished { target_workspace } => target_workspace,
        }
    }
}

/// Read-only workspace lookup, owned by the content repository.
pub trait WorkspaceDirectory: Send + Sync {
    fn find_by_name(&self, name: &str) -> Option<WorkspaceRef>;
}

/// Resolves the user behind the current publish, when one is authenticated.
pub trait ActorSource: Send + Sync {
    fn current_actor(&self) -> Option<ActorName>;
}

/// Receives workspace publish events from the host's catch-up run.
pub struct WorkspacePublishHook {
    dispatcher: NotificationDispatcher,
    workspaces: Arc<dyn WorkspaceDirectory>,
    actors: Arc<dyn ActorSource>,
    cycle: DispatchCycle,
}

impl WorkspacePublishHook {
    pub fn new(
        dispatcher: NotificationDispatcher,
        workspaces: Arc<dyn WorkspaceDirectory>,
        actors: Arc<dyn ActorSource>,
    ) -> Self {
        Self {
            dispatcher,
            workspaces,
            actors,
            cycle: DispatchCycle::new(),
        }
    }

    /// Open a fresh at-most-once scope for the next batch of events.
    pub fn begin_batch(&mut self) {
        self.cycle = DispatchCycle::new();
    }

    /// Current batch scope, mainly for the host to inspect.
    pub fn cycle(&self) -> &DispatchCycle {
        &self.cycle
    }

    /// Handle one domain event of the current batch.
    pub fn on_event(&mut self, event: &PublishEvent) -> Result<(), ConfigError> {
        match event {
            PublishEvent::WorkspacePublished { .. }
            | PublishEvent::WorkspacePartiallyPublished { .. } => {
                self.dispatch(event.target_workspace())
            }
        }
    }

    fn dispatch(&mut self, workspace_name: &str) -> Result<(), ConfigError> {
        let Some(workspace) = self.workspaces.find_by_name(workspace_name) else {
            // A lookup miss loses the notification, nothing else.
            warn!(workspace = %workspace_name, "Publish event for unknown workspace, skipping notification");
            return Ok(());
        };

        let actor = self
            .actors
            .current_actor()
            .unwrap_or_else(ActorName::unknown);

        self.dispatcher.notify(&workspace, &actor, &mut self.cycle)?;
        Ok(())
    }
}
