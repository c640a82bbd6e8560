//! Chat transcript and session status types for PersonaChat.
//!
//! These types model a single conversation between a user and a bot:
//! the messages of the transcript and the status of the session as a whole.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

// Re-export MessageRole from llm module (it's used in both chat and llm contexts).
pub use crate::llm::MessageRole;

/// Text placed into a model message when its exchange fails before any
/// fragment arrived.
pub const CONNECTION_ERROR_MARKER: &str = "⚠️ Connection error. Please try again.";

/// Identifier of a message, unique within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single message within a chat transcript.
///
/// `role` never changes after creation. Only the model message that is the
/// session's active streaming target ever has text appended to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: MessageRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// A user message with the given text, stamped now.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role: MessageRole::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// An empty model message awaiting streamed fragments.
    pub fn model_placeholder() -> Self {
        Self {
            id: MessageId::new(),
            role: MessageRole::Model,
            text: String::new(),
            timestamp: Utc::now(),
        }
    }

    /// Whether the message carries no visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Status of a chat session (not of any single message).
///
/// - Idle: ready for input
/// - Loading: a submit was accepted, the request is being prepared
/// - Streaming: the model service is returning fragments
/// - Error: the last exchange failed; the next submit retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatStatus {
    Idle,
    Loading,
    Streaming,
    Error,
}

impl ChatStatus {
    /// Whether an exchange is in flight. New submits are rejected while busy.
    pub fn is_busy(&self) -> bool {
        matches!(self, ChatStatus::Loading | ChatStatus::Streaming)
    }

    /// Presence label shown under the bot name in a chat header.
    pub fn presence_label(&self) -> &'static str {
        if self.is_busy() { "typing..." } else { "online" }
    }
}

impl fmt::Display for ChatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatStatus::Idle => write!(f, "idle"),
            ChatStatus::Loading => write!(f, "loading"),
            ChatStatus::Streaming => write!(f, "streaming"),
            ChatStatus::Error => write!(f, "error"),
        }
    }
}

impl FromStr for ChatStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(ChatStatus::Idle),
            "loading" => Ok(ChatStatus::Loading),
            "streaming" => Ok(ChatStatus::Streaming),
            "error" => Ok(ChatStatus::Error),
            other => Err(format!("invalid chat status: '{other}'")),
        }
    }
}

impl Default for ChatStatus {
    fn default() -> Self {
        ChatStatus::Idle
    }
}
