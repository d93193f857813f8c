//! Decision function: does a publish to this workspace warrant a notification?

use crate::config::NotifySettings;
use crate::workspace::WorkspaceClassification;

/// Whether a publish to a workspace of the given classification should
/// produce a notification at all. Pure, no side effects.
///
/// Rules in order, first match wins:
/// 1. personal workspace: never
/// 2. public workspace: only when explicitly enabled
/// 3. anything else (internal): always
pub fn should_notify(
    classification: WorkspaceClassification,
    public_workspace_enabled: bool,
) -> bool {
    match classification {
        WorkspaceClassification::Personal => false,
        WorkspaceClassification::Public => public_workspace_enabled,
        WorkspaceClassification::Internal => true,
    }
}

/// `should_notify` plus the optional internal-workspace refinement.
///
/// `first_change` is `Some` only when the host supplied a change tracker:
/// `Some(true)` means this is the first pending change in the workspace,
/// `Some(false)` a follow-up change. With `None` the base rules apply
/// unchanged.
pub fn should_notify_with_history(
    classification: WorkspaceClassification,
    settings: &NotifySettings,
    first_change: Option<bool>,
) -> bool {
    if !should_notify(classification, settings.public_workspace) {
        return false;
    }

    if classification == WorkspaceClassification::Internal {
        match first_change {
            Some(true) if !settings.internal_workspace.on_first_change => return false,
            Some(false) if !settings.internal_workspace.on_additional_change => return false,
            _ => {}
        }
    }

    true
}
