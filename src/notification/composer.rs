//! Message composition - renders the outbound notification text
//!
//! Templates come from configuration and use positional `%s` markers,
//! replaced left to right: subject takes the actor, body and chat message
//! take actor, workspace and review URL. Template arity is checked at
//! configuration load, not here.

use url::Url;

use crate::config::Settings;
use crate::error::ConfigError;
use crate::workspace::{ActorName, WorkspaceClassification, WorkspaceRef};

/// The one message rendered per dispatch cycle. Channels read the fields
/// they need; the chat channel ignores the subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedNotification {
    pub subject: String,
    pub body: String,
    pub chat_message: String,
}

/// Renders `ComposedNotification`s from the configured templates.
pub struct MessageComposer {
    base_uri: Url,
    email_subject: String,
    email_body: String,
    slack_message: String,
}

impl MessageComposer {
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let base_uri = Url::parse(&settings.http.base_uri)
            .map_err(|_| ConfigError::InvalidBaseUri(settings.http.base_uri.clone()))?;

        Ok(Self {
            base_uri,
            email_subject: settings.email.subject.clone(),
            email_body: settings.email.body.clone(),
            slack_message: settings.slack.message.clone(),
        })
    }

    /// Apply the substitution values to all configured templates.
    pub fn compose(&self, actor: &ActorName, workspace: &WorkspaceRef) -> ComposedNotification {
        let review_url = self.review_url(workspace).to_string();
        let values = [actor.as_str(), workspace.display_name(), review_url.as_str()];

        ComposedNotification {
            subject: format_positional(&self.email_subject, &values[..1]),
            body: format_positional(&self.email_body, &values),
            chat_message: format_positional(&self.slack_message, &values),
        }
    }

    /// Deep link to the workspace review module. The public workspace has no
    /// single-workspace view, so it degrades to the workspace listing.
    pub fn review_url(&self, workspace: &WorkspaceRef) -> Url {
        let mut url = self.base_uri.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["neos", "management", "workspaces"]);
        }

        if workspace.classification != WorkspaceClassification::Public {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.push("show");
            }
            url.query_pairs_mut()
                .append_pair("moduleArguments[workspace][__identity]", &workspace.name);
        }

        url
    }
}

/// Replace successive `%s` markers with the given values, left to right.
/// Markers beyond the value list are left in place.
pub fn format_positional(template: &str, values: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut values = values.iter();
    let mut rest = template;

    while let Some(idx) = rest.find("%s") {
        out.push_str(&rest[..idx]);
        match values.next() {
            Some(value) => out.push_str(value),
            None => out.push_str("%s"),
        }
        rest = &rest[idx + 2..];
    }
    out.push_str(rest);
    out
}

/// Number of `%s` markers in a template.
pub fn placeholder_count(template: &str) -> usize {
    template.matches("%s").count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EmailSettings, HttpSettings, SlackSettings};

    fn composer() -> MessageComposer {
        let settings = Settings {
            email: EmailSettings {
                subject: "%s published a workspace".to_string(),
                body: "%s published changes in %s.\n\nReview them here: %s".to_string(),
                ..Default::default()
            },
            slack: SlackSettings {
                message: "%s published changes in *%s*. <%s|Review>".to_string(),
                ..Default::default()
            },
            http: HttpSettings {
                base_uri: "https://cms.example.com".to_string(),
            },
            ..Default::default()
        };
        MessageComposer::from_settings(&settings).unwrap()
    }

    #[test]
    fn test_format_positional_single() {
        assert_eq!(format_positional("Hi %s", &["Alice"]), "Hi Alice");
    }

    #[test]
    fn test_format_positional_three_values() {
        assert_eq!(
            format_positional("%s / %s / %s", &["a", "b", "c"]),
            "a / b / c"
        );
    }

    #[test]
    fn test_format_positional_fewer_markers_than_values() {
        assert_eq!(format_positional("by %s", &["a", "b", "c"]), "by a");
    }

    #[test]
    fn test_format_positional_no_markers() {
        assert_eq!(format_positional("static text", &["a"]), "static text");
    }

    #[test]
    fn test_placeholder_count() {
        assert_eq!(placeholder_count(""), 0);
        assert_eq!(placeholder_count("%s"), 1);
        assert_eq!(placeholder_count("%s and %s and %s"), 3);
        assert_eq!(placeholder_count("100%"), 0);
    }

    #[test]
    fn test_compose_substitutes_all_fields() {
        let workspace = WorkspaceRef::new("review-1", WorkspaceClassification::Internal)
            .with_title("Review 1");
        let note = composer().compose(&ActorName::new("Bob"), &workspace);

        assert_eq!(note.subject, "Bob published a workspace");
        assert!(note.body.starts_with("Bob published changes in Review 1."));
        assert!(note.body.contains("review-1"));
        assert!(note.chat_message.contains("*Review 1*"));
        assert!(note.chat_message.contains("https://cms.example.com/neos/management/workspaces/show"));
    }

    #[test]
    fn test_review_url_internal_workspace_deep_link() {
        let workspace = WorkspaceRef::new("review-1", WorkspaceClassification::Internal);
        let url = composer().review_url(&workspace);

        assert_eq!(url.path(), "/neos/management/workspaces/show");
        assert!(url
            .query_pairs()
            .any(|(k, v)| k == "moduleArguments[workspace][__identity]" && v == "review-1"));
    }

    #[test]
    fn test_review_url_public_workspace_listing() {
        let workspace = WorkspaceRef::new("live", WorkspaceClassification::Public);
        let url = composer().review_url(&workspace);

        assert_eq!(url.path(), "/neos/management/workspaces");
        assert!(url.query().is_none());
    }

    #[test]
    fn test_review_url_base_with_trailing_slash() {
        let settings = Settings {
            http: HttpSettings {
                base_uri: "https://cms.example.com/".to_string(),
            },
            ..Default::default()
        };
        let composer = MessageComposer::from_settings(&settings).unwrap();
        let workspace = WorkspaceRef::new("live", WorkspaceClassification::Public);
        assert_eq!(
            composer.review_url(&workspace).as_str(),
            "https://cms.example.com/neos/management/workspaces"
        );
    }

    #[test]
    fn test_from_settings_rejects_bad_base_uri() {
        let settings = Settings {
            http: HttpSettings {
                base_uri: "not a url".to_string(),
            },
            ..Default::default()
        };
        assert!(matches!(
            MessageComposer::from_settings(&settings),
            Err(ConfigError::InvalidBaseUri(_))
        ));
    }

    #[test]
    fn test_compose_unknown_actor() {
        let workspace = WorkspaceRef::new("review-2", WorkspaceClassification::Internal);
        let note = composer().compose(&ActorName::unknown(), &workspace);
        assert_eq!(note.subject, "unknown published a workspace");
    }
}
