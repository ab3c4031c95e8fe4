use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Bot,
}

/// One entry in the conversation transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    #[serde(rename = "type")]
    pub role: MessageRole,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self::stamped(text, MessageRole::User)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::stamped(text, MessageRole::Bot)
    }

    fn stamped(text: impl Into<String>, role: MessageRole) -> Self {
        Self {
            text: text.into(),
            role,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// The unit of persistence: everything the widget restores after a
/// navigation.
///
/// `position` is `None` until the user first drags the launcher; while
/// `None` the configured anchor corner applies. Once set it is always
/// clamped viewport coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetState {
    pub is_open: bool,
    #[serde(default)]
    pub position: Option<Point>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl WidgetState {
    /// Append to the transcript. The list is append-only and unbounded;
    /// there is deliberately no eviction.
    pub fn push_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }
}
