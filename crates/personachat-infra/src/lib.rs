//! Infrastructure layer for PersonaChat.
//!
//! Contains implementations of the port traits defined in `personachat-core`:
//! the SQLite key-value substrate, the OpenAI-compatible model provider, and
//! configuration loading.

pub mod config;
pub mod llm;
pub mod sqlite;
