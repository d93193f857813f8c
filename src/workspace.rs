//! Workspace domain model as seen by the notifier
//!
//! The content repository owns these; the notifier only reads them. A
//! `WorkspaceRef` is resolved once per event and is immutable for the
//! duration of one notification decision.

use serde::{Deserialize, Serialize};

/// How a workspace is shared, derived from its metadata at lookup time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceClassification {
    /// Per-user draft workspace.
    Personal,
    /// Shared draft workspace.
    Internal,
    /// Live workspace.
    Public,
}

impl WorkspaceClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkspaceClassification::Personal => "personal",
            WorkspaceClassification::Internal => "internal",
            WorkspaceClassification::Public => "public",
        }
    }
}

impl std::fmt::Display for WorkspaceClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Read-only reference to the workspace a publish targeted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceRef {
    /// Stable workspace identifier.
    pub name: String,
    /// Human-readable title, when the repository has one.
    pub title: Option<String>,
    pub classification: WorkspaceClassification,
}

impl WorkspaceRef {
    pub fn new(
        name: impl Into<String>,
        classification: WorkspaceClassification,
    ) -> Self {
        Self {
            name: name.into(),
            title: None,
            classification,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Title when present, name otherwise. Used in message text; the review
    /// URL always uses the name.
    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

/// Display name of the user who triggered the publish.
///
/// Resolved once per cycle. When no authenticated user is available the
/// sentinel `unknown` is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorName(String);

impl ActorName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn unknown() -> Self {
        Self("unknown".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ActorName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ActorName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_title() {
        let ws = WorkspaceRef::new("review-1", WorkspaceClassification::Internal)
            .with_title("Review changes");
        assert_eq!(ws.display_name(), "Review changes");
    }

    #[test]
    fn test_display_name_falls_back_to_name() {
        let ws = WorkspaceRef::new("review-1", WorkspaceClassification::Internal);
        assert_eq!(ws.display_name(), "review-1");
    }

    #[test]
    fn test_actor_sentinel() {
        assert_eq!(ActorName::unknown().as_str(), "unknown");
        assert_eq!(format!("{}", ActorName::new("Alice")), "Alice");
    }

    #[test]
    fn test_classification_serialization() {
        let json = serde_json::to_string(&WorkspaceClassification::Internal).unwrap();
        assert_eq!(json, "\"internal\"");
        let back: WorkspaceClassification = serde_json::from_str("\"public\"").unwrap();
        assert_eq!(back, WorkspaceClassification::Public);
    }
}
