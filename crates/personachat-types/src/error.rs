use thiserror::Error;

use crate::chat::{ChatStatus, MessageId};

/// A share token could not be turned back into a bot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("share token is empty")]
    Empty,

    #[error("share token is not valid base64url: {0}")]
    Encoding(String),

    #[error("share payload is malformed: {0}")]
    Payload(String),

    #[error("share payload is missing required field '{0}'")]
    MissingField(&'static str),
}

/// Errors related to bot operations.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("bot not found")]
    NotFound,

    #[error("invalid bot name: {0}")]
    InvalidName(String),

    #[error("invalid persona: {0}")]
    InvalidPersona(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from the local "my bots" collection.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read stored bots: {0}")]
    Read(String),

    #[error("failed to write stored bots: {0}")]
    Write(String),

    #[error("stored bots are corrupt: {0}")]
    Corrupt(String),
}

/// Errors from key-value substrate operations (used by trait definitions in personachat-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),
}

/// A chat session rejected an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("an exchange is already in flight (status: {0})")]
    Busy(ChatStatus),

    #[error("message text is empty")]
    EmptyInput,

    #[error("message '{0}' is not in the transcript")]
    UnknownMessage(MessageId),

    #[error("message '{0}' is not the active streaming target")]
    NotActiveTarget(MessageId),

    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition { from: ChatStatus, to: ChatStatus },
}

/// Errors loading configuration or credentials.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(String),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("API key not found in environment variable '{0}'")]
    MissingApiKey(String),
}
