use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Opaque identifier for a bot.
///
/// Locally created bots get a UUID v7 string (time-sortable). Bots decoded
/// from a share token keep whatever identifier the token carried, so the
/// inner value is not required to be a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BotId(pub String);

impl BotId {
    /// Create a new BotId using UUID v7 (time-sortable, random tail).
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Default for BotId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BotId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("bot id cannot be empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl From<&str> for BotId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A conversational persona: a name, an avatar and a free-text instruction
/// that becomes the system directive for the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bot {
    pub id: BotId,
    /// Display name shown in listings and the chat header.
    pub name: String,
    /// System instruction sent to the model with every exchange.
    pub persona: String,
    /// Avatar image URL. Not validated.
    pub avatar_url: String,
    pub created_at: DateTime<Utc>,
}

/// Request to create a new bot. `name` and `persona` are required;
/// a missing avatar gets a generated placeholder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBotRequest {
    pub name: String,
    pub persona: String,
    pub avatar_url: Option<String>,
}
