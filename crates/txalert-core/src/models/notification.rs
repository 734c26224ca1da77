//! Notification events as delivered by the notification source.

use serde::{Deserialize, Serialize};

/// A notification posted by some application.
///
/// Missing text fields deserialize to empty strings, which is also how the
/// classifier treats them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationEvent {
    /// Package name of the posting application.
    pub source_app: String,

    /// Notification title.
    pub title: String,

    /// Collapsed notification body.
    pub short_body: String,

    /// Expanded ("big text") notification body.
    pub expanded_body: String,
}

impl NotificationEvent {
    /// Create an event from its four text parts.
    pub fn new(
        source_app: impl Into<String>,
        title: impl Into<String>,
        short_body: impl Into<String>,
        expanded_body: impl Into<String>,
    ) -> Self {
        Self {
            source_app: source_app.into(),
            title: title.into(),
            short_body: short_body.into(),
            expanded_body: expanded_body.into(),
        }
    }

    /// Join title, short body and expanded body with `separator`.
    ///
    /// Empty parts are kept, so the separator count is always two.
    pub fn combined_text(&self, separator: &str) -> String {
        let mut text = String::with_capacity(
            self.title.len() + self.short_body.len() + self.expanded_body.len() + 2 * separator.len(),
        );
        text.push_str(&self.title);
        text.push_str(separator);
        text.push_str(&self.short_body);
        text.push_str(separator);
        text.push_str(&self.expanded_body);
        text
    }
}
